#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the econ-pulse toolchain.
//!
//! With a subcommand it behaves like a normal batch tool (start the
//! server, fetch datasets, print a stability report, render a page view
//! model as JSON). Without one it drops into an interactive selector.

mod commands;

use clap::{Parser, Subcommand};
use dialoguer::Select;

#[derive(Parser)]
#[command(name = "econ-pulse", about = "Country economics dashboard toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Download registered datasets that are missing from the data directory
    Fetch,
    /// Print the CPI stability ranking
    Stability {
        /// Standard deviation definition: "population" or "sample"
        #[arg(long, default_value = "population")]
        mode: String,
        /// How many countries to print
        #[arg(long, default_value = "10")]
        top_n: usize,
    },
    /// Print the per-dataset load reports
    Reports,
    /// Render a dashboard page view model as JSON
    Render {
        /// Page to render: "cpi", "categories", "nha", or "population"
        #[arg(long)]
        page: String,
        /// Comma-separated country display names
        #[arg(long)]
        countries: Option<String>,
        /// NHA indicator (required for the nha page)
        #[arg(long)]
        indicator: Option<String>,
        /// Second NHA indicator (enables the scatter)
        #[arg(long)]
        second_indicator: Option<String>,
        /// Snapshot year
        #[arg(long)]
        year: Option<i32>,
    },
}

/// Interactive tool selection shown when no subcommand is given.
enum Tool {
    Serve,
    Fetch,
    Stability,
    Reports,
}

impl Tool {
    const ALL: &[Self] = &[Self::Serve, Self::Fetch, Self::Stability, Self::Reports];

    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start server",
            Self::Fetch => "Fetch missing datasets",
            Self::Stability => "Print CPI stability ranking",
            Self::Reports => "Print dataset load reports",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => interactive_command()?,
    };

    match command {
        Commands::Serve => {
            // The server uses actix-web's runtime, so run it in a
            // blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(econ_pulse_server::run_server())
            })
            .await??;
        }
        Commands::Fetch => commands::fetch().await?,
        Commands::Stability { mode, top_n } => commands::stability(&mode, top_n)?,
        Commands::Reports => commands::reports()?,
        Commands::Render {
            page,
            countries,
            indicator,
            second_indicator,
            year,
        } => commands::render(
            &page,
            countries.as_deref(),
            indicator.as_deref(),
            second_indicator.as_deref(),
            year,
        )?,
    }

    Ok(())
}

fn interactive_command() -> Result<Commands, Box<dyn std::error::Error>> {
    println!("econ-pulse Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match Tool::ALL[idx] {
        Tool::Serve => Commands::Serve,
        Tool::Fetch => Commands::Fetch,
        Tool::Stability => Commands::Stability {
            mode: "population".to_string(),
            top_n: 10,
        },
        Tool::Reports => Commands::Reports,
    })
}
