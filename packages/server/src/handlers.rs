//! HTTP handler functions for the econ-pulse API.

use std::collections::BTreeSet;
use std::sync::Arc;

use actix_web::{HttpResponse, web};
use econ_pulse_aggregate::AggregateError;
use econ_pulse_aggregate_models::StdDevMode;
use econ_pulse_dashboard::{DashboardError, categories, cpi, nha, population};
use econ_pulse_dataset::store::Datasets;
use econ_pulse_server_models::{
    ApiCoicopEntry, ApiError, ApiHealth, CategoryParams, CountriesParams, NhaParams,
    PopulationParams, ProjectionParams, StabilityParams, split_csv, split_years,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/countries`
///
/// Lists the countries present in the aggregate CPI data.
pub async fn countries(state: web::Data<AppState>) -> HttpResponse {
    match load(&state) {
        Ok(datasets) => HttpResponse::Ok().json(cpi::available_countries(&datasets)),
        Err(response) => response,
    }
}

/// `GET /api/coicop`
///
/// Lists the loaded COICOP categories with display labels.
pub async fn coicop(state: web::Data<AppState>) -> HttpResponse {
    match load(&state) {
        Ok(datasets) => {
            let entries: Vec<ApiCoicopEntry> = categories::available_categories(&datasets)
                .into_iter()
                .map(|(code, label)| ApiCoicopEntry { code, label })
                .collect();
            HttpResponse::Ok().json(entries)
        }
        Err(response) => response,
    }
}

/// `GET /api/reports`
///
/// Returns the per-dataset load reports (row counts, rejects).
pub async fn reports(state: web::Data<AppState>) -> HttpResponse {
    match load(&state) {
        Ok(datasets) => HttpResponse::Ok().json(&datasets.reports),
        Err(response) => response,
    }
}

/// `GET /api/cpi/series`
///
/// Aligned CPI level lines for the requested countries.
pub async fn cpi_series(
    state: web::Data<AppState>,
    params: web::Query<CountriesParams>,
) -> HttpResponse {
    let selection = cpi::CpiSelection {
        countries: country_set(params.countries.as_deref()),
        ..cpi::CpiSelection::default()
    };

    match load(&state).and_then(|d| cpi::render_cpi(&d, &selection).map_err(error_response)) {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({ "lines": view.lines })),
        Err(response) => response,
    }
}

/// `GET /api/cpi/yoy`
///
/// Year-over-year change for the requested countries, including the
/// indeterminate-period annotations.
pub async fn cpi_yoy(
    state: web::Data<AppState>,
    params: web::Query<CountriesParams>,
) -> HttpResponse {
    let selection = cpi::CpiSelection {
        countries: country_set(params.countries.as_deref()),
        ..cpi::CpiSelection::default()
    };

    match load(&state).and_then(|d| cpi::render_cpi(&d, &selection).map_err(error_response)) {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({ "yoy": view.yoy })),
        Err(response) => response,
    }
}

/// `GET /api/cpi/stability`
///
/// Stability ranking across the country universe, optionally restricted
/// by latest population.
pub async fn cpi_stability(
    state: web::Data<AppState>,
    params: web::Query<StabilityParams>,
) -> HttpResponse {
    let population_range = match (params.population_min, params.population_max) {
        (None, None) => None,
        (min, max) => Some(min.unwrap_or(0.0)..=max.unwrap_or(f64::MAX)),
    };
    let selection = cpi::CpiSelection {
        countries: BTreeSet::new(),
        mode: params.mode.unwrap_or(StdDevMode::Population),
        top_n: params.top_n.unwrap_or(10),
        population_range,
    };

    match load(&state).and_then(|d| cpi::render_cpi(&d, &selection).map_err(error_response)) {
        Ok(view) => HttpResponse::Ok().json(view.stability),
        Err(response) => response,
    }
}

/// `GET /api/cpi/categories`
///
/// COICOP category breakdown for up to two countries.
pub async fn cpi_categories(
    state: web::Data<AppState>,
    params: web::Query<CategoryParams>,
) -> HttpResponse {
    let selection = categories::CategorySelection {
        countries: country_set(params.countries.as_deref()),
        categories: split_csv(params.categories.as_deref()).into_iter().collect(),
    };

    match load(&state)
        .and_then(|d| categories::render_categories(&d, &selection).map_err(error_response))
    {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(response) => response,
    }
}

/// `GET /api/cpi/detail`
///
/// Per-period detail rows (CPI, YoY, population) for one country.
pub async fn cpi_detail(
    state: web::Data<AppState>,
    params: web::Query<CountriesParams>,
) -> HttpResponse {
    let requested = country_set(params.countries.as_deref());
    let Some(country) = requested.iter().next() else {
        return HttpResponse::BadRequest().json(ApiError {
            error: "countries parameter is required".to_string(),
        });
    };

    match load(&state).and_then(|d| cpi::country_detail(&d, country).map_err(error_response)) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(response) => response,
    }
}

/// `GET /api/nha/indicators`
pub async fn nha_indicators(state: web::Data<AppState>) -> HttpResponse {
    match load(&state) {
        Ok(datasets) => HttpResponse::Ok().json(nha::available_indicators(&datasets)),
        Err(response) => response,
    }
}

/// `GET /api/nha/trend`
///
/// Indicator trend lines for the requested countries.
pub async fn nha_trend(state: web::Data<AppState>, params: web::Query<NhaParams>) -> HttpResponse {
    let selection = nha::NhaSelection {
        indicator: params.indicator.clone(),
        countries: country_set(params.countries.as_deref()),
        second_indicator: None,
        year: params.year,
    };

    match load(&state).and_then(|d| nha::render_nha(&d, &selection).map_err(error_response)) {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({
            "indicator": view.indicator,
            "trend": view.trend,
        })),
        Err(response) => response,
    }
}

/// `GET /api/nha/scatter`
///
/// Two-indicator scatter; `secondIndicator` is required here.
pub async fn nha_scatter(state: web::Data<AppState>, params: web::Query<NhaParams>) -> HttpResponse {
    let Some(second) = params.second_indicator.clone() else {
        return HttpResponse::BadRequest().json(ApiError {
            error: "secondIndicator parameter is required".to_string(),
        });
    };

    let selection = nha::NhaSelection {
        indicator: params.indicator.clone(),
        countries: country_set(params.countries.as_deref()),
        second_indicator: Some(second),
        year: params.year,
    };

    match load(&state).and_then(|d| nha::render_nha(&d, &selection).map_err(error_response)) {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({
            "indicator": view.indicator,
            "scatter": view.scatter,
        })),
        Err(response) => response,
    }
}

/// `GET /api/nha/by-country`
///
/// Indicator value per country for one year, descending.
pub async fn nha_by_country(
    state: web::Data<AppState>,
    params: web::Query<NhaParams>,
) -> HttpResponse {
    let selection = nha::NhaSelection {
        indicator: params.indicator.clone(),
        countries: BTreeSet::new(),
        second_indicator: None,
        year: params.year,
    };

    match load(&state).and_then(|d| nha::render_nha(&d, &selection).map_err(error_response)) {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({
            "indicator": view.indicator,
            "snapshotYear": view.snapshot_year,
            "byCountry": view.by_country,
        })),
        Err(response) => response,
    }
}

/// `GET /api/population/trend`
pub async fn population_trend(
    state: web::Data<AppState>,
    params: web::Query<CountriesParams>,
) -> HttpResponse {
    let selection = population::PopulationSelection {
        countries: country_set(params.countries.as_deref()),
        ..population::PopulationSelection::default()
    };

    match load(&state)
        .and_then(|d| population::render_population(&d, &selection).map_err(error_response))
    {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({ "trends": view.trends })),
        Err(response) => response,
    }
}

/// `GET /api/population/overview`
///
/// Top-N, density scatter, world share, and growth bars for one year.
pub async fn population_overview(
    state: web::Data<AppState>,
    params: web::Query<PopulationParams>,
) -> HttpResponse {
    let selection = population::PopulationSelection {
        countries: country_set(params.countries.as_deref()),
        exclude: country_set(params.exclude.as_deref()),
        year: params.year,
        top_n: params.top_n.unwrap_or(10),
        share_threshold_pct: params.share_threshold_pct.unwrap_or(1.0),
        iqr_multiplier: params.iqr_multiplier,
        projection: None,
    };

    match load(&state)
        .and_then(|d| population::render_population(&d, &selection).map_err(error_response))
    {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(response) => response,
    }
}

/// `GET /api/population/projection`
///
/// Compound-growth projection for one country.
pub async fn population_projection(
    state: web::Data<AppState>,
    params: web::Query<ProjectionParams>,
) -> HttpResponse {
    let selection = population::PopulationSelection {
        projection: Some(population::ProjectionRequest {
            country: params.country.clone(),
            future_years: split_years(params.future_years.as_deref()),
            backcast_years: split_years(params.backcast_years.as_deref()),
        }),
        ..population::PopulationSelection::default()
    };

    match load(&state)
        .and_then(|d| population::render_population(&d, &selection).map_err(error_response))
    {
        Ok(view) => HttpResponse::Ok().json(view.projection),
        Err(response) => response,
    }
}

/// Loads datasets through the memoized store, mapping failures to a 500.
fn load(state: &web::Data<AppState>) -> Result<Arc<Datasets>, HttpResponse> {
    let mut store = match state.store.lock() {
        Ok(store) => store,
        Err(poisoned) => {
            log::error!("dataset store mutex poisoned");
            drop(poisoned);
            return Err(HttpResponse::InternalServerError().json(ApiError {
                error: "dataset store unavailable".to_string(),
            }));
        }
    };

    store.datasets().map_err(|e| {
        log::error!("failed to load datasets: {e}");
        HttpResponse::InternalServerError().json(ApiError {
            error: "failed to load datasets".to_string(),
        })
    })
}

/// Maps a dashboard error to its HTTP response.
///
/// Unknown countries and indicators are the caller's selection being out
/// of date — 404 with the offending names. Selection-shape problems are
/// 400. Nothing here is a server fault.
fn error_response(error: DashboardError) -> HttpResponse {
    match &error {
        DashboardError::Aggregate(AggregateError::UnknownCountry { .. })
        | DashboardError::UnknownIndicator { .. } => HttpResponse::NotFound().json(ApiError {
            error: error.to_string(),
        }),
        DashboardError::TooManyCountries { .. } => HttpResponse::BadRequest().json(ApiError {
            error: error.to_string(),
        }),
    }
}

/// Parses the comma-separated countries parameter into a set.
fn country_set(raw: Option<&str>) -> BTreeSet<String> {
    split_csv(raw).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use econ_pulse_dataset::store::DatasetStore;
    use econ_pulse_dataset_models::{DatasetKind, DatasetRegistry, DatasetSpec};
    use std::path::PathBuf;
    use std::sync::Mutex;

    const CPI_CSV: &str = "\
COUNTRY,COICOP_1999,TIME_PERIOD,OBS_VALUE
PRT,_T,2020-Q1,100.0
PRT,_T,2021-Q1,105.0
PRT,_T,2022-Q1,110.0
ESP,_T,2020-Q1,100.0
ESP,_T,2021-Q1,103.0
";

    fn test_state() -> web::Data<AppState> {
        let dir = std::env::temp_dir().join(format!("econ-pulse-server-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cpi.csv"), CPI_CSV).unwrap();

        let registry = DatasetRegistry {
            datasets: vec![DatasetSpec {
                id: "cpi_quarterly".to_string(),
                kind: DatasetKind::CpiQuarterly,
                path: "cpi.csv".to_string(),
                url: None,
            }],
        };
        let store = DatasetStore::new(registry, PathBuf::from(dir));

        web::Data::new(AppState {
            store: Mutex::new(store),
        })
    }

    #[actix_web::test]
    async fn health_reports_healthy() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(crate::api_scope()))
                .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], serde_json::json!(true));
    }

    #[actix_web::test]
    async fn countries_lists_loaded_countries() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(crate::api_scope()))
                .await;

        let req = test::TestRequest::get().uri("/api/countries").to_request();
        let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, vec!["Portugal".to_string(), "Spain".to_string()]);
    }

    #[actix_web::test]
    async fn unknown_country_is_a_404_naming_it() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(crate::api_scope()))
                .await;

        let req = test::TestRequest::get()
            .uri("/api/cpi/series?countries=Atlantis")
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Atlantis"));
    }

    #[actix_web::test]
    async fn yoy_endpoint_returns_expected_points() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(crate::api_scope()))
                .await;

        let req = test::TestRequest::get()
            .uri("/api/cpi/yoy?countries=Portugal")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let points = body["yoy"][0]["points"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["period"], serde_json::json!("2021-Q1"));
        assert!((points[0]["percent"].as_f64().unwrap() - 5.0).abs() < 1e-10);
    }

    #[actix_web::test]
    async fn stability_endpoint_ranks_ascending() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(crate::api_scope()))
                .await;

        let req = test::TestRequest::get()
            .uri("/api/cpi/stability?mode=population")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        // Both countries have a single YoY point per year pair; Portugal
        // has two YoY points, Spain only one (insufficient).
        let ranked = body["ranked"].as_array().unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0]["country"], serde_json::json!("Portugal"));

        let insufficient = body["insufficient"].as_array().unwrap();
        assert_eq!(insufficient[0]["country"], serde_json::json!("Spain"));
    }
}
