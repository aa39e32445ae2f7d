#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the econ-pulse dashboard.
//!
//! Serves the chart view models as JSON for the frontend, plus the
//! selection catalogs (countries, indicators, COICOP categories) and the
//! dataset load reports. Datasets are loaded through the mtime-memoized
//! [`econ_pulse_dataset::store::DatasetStore`], so touching a CSV on disk
//! is picked up on the next request without a restart.

mod handlers;

use std::path::Path;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use econ_pulse_dataset::store::{DatasetStore, open_store};

/// Environment variable naming the data directory (default: `data`).
pub const DATA_DIR_ENV: &str = "ECON_PULSE_DATA_DIR";

/// Shared application state.
pub struct AppState {
    /// Memoized dataset store. `DatasetStore::datasets` needs `&mut self`
    /// for cache bookkeeping, so it sits behind a `Mutex`; the lock is
    /// held only for the cache check on warm requests.
    pub store: Mutex<DatasetStore>,
}

/// Resolves the data directory from the environment.
#[must_use]
pub fn data_dir_from_env() -> String {
    std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| "data".to_string())
}

/// Starts the econ-pulse API server.
///
/// Loads the dataset registry, binds to `BIND_ADDR`/`PORT` (default
/// `127.0.0.1:8080`), and serves the API plus frontend static files.
/// This is a regular async function — the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the dataset registry exists but cannot be parsed.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let data_dir = data_dir_from_env();

    log::info!("Opening dataset store in {data_dir}...");
    let store = open_store(Path::new(&data_dir)).expect("Failed to load dataset registry");

    let state = web::Data::new(AppState {
        store: Mutex::new(store),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(api_scope())
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// The `/api` route tree, shared by the server binary and tests.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health))
        .route("/countries", web::get().to(handlers::countries))
        .route("/coicop", web::get().to(handlers::coicop))
        .route("/reports", web::get().to(handlers::reports))
        .route("/cpi/series", web::get().to(handlers::cpi_series))
        .route("/cpi/yoy", web::get().to(handlers::cpi_yoy))
        .route("/cpi/stability", web::get().to(handlers::cpi_stability))
        .route("/cpi/categories", web::get().to(handlers::cpi_categories))
        .route("/cpi/detail", web::get().to(handlers::cpi_detail))
        .route("/nha/indicators", web::get().to(handlers::nha_indicators))
        .route("/nha/trend", web::get().to(handlers::nha_trend))
        .route("/nha/scatter", web::get().to(handlers::nha_scatter))
        .route("/nha/by-country", web::get().to(handlers::nha_by_country))
        .route("/population/trend", web::get().to(handlers::population_trend))
        .route(
            "/population/overview",
            web::get().to(handlers::population_overview),
        )
        .route(
            "/population/projection",
            web::get().to(handlers::population_projection),
        )
}
