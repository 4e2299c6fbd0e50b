//! # Flight Search CLI (`flights`)
//!
//! ## Usage
//!
//! ```bash
//! flights --config ./config/flights.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `flights search` | Search the catalog |
//! | `flights routes` | List catalog routes |
//! | `flights cities` | List city → airport expansions |
//! | `flights serve http` | Start the HTTP + MCP Streamable HTTP server |
//! | `flights serve stdio` | Serve MCP over stdin/stdout |
//!
//! ## Examples
//!
//! ```bash
//! flights search --origin NYC --destination MIA --departure-date 2024-03-20
//! flights search --origin LA --destination LAS --class business
//! flights serve http --config ./config/flights.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use rmcp::ServiceExt;
use std::path::PathBuf;
use std::sync::Arc;

use flight_search::catalog::{list_cities, list_routes, load_matcher};
use flight_search::config::{self, Config};
use flight_search::logging::init_logging;
use flight_search::mcp::McpBridge;
use flight_search::server::run_server;
use flight_search::service::{run_search, FlightService};
use flight_search::traits::{ToolContext, ToolRegistry};
use flight_search_core::SearchCriteria;

const DEFAULT_CONFIG: &str = "./config/flights.toml";

/// Flight Search CLI: search a static flight catalog and serve it to
/// MCP clients.
#[derive(Parser)]
#[command(
    name = "flights",
    about = "Flight Search: search a static flight catalog and serve it over MCP",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When omitted, `./config/flights.toml` is used if it exists and the
    /// built-in defaults otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search flights by origin, destination, and cabin class.
    ///
    /// Origin and destination accept airport codes (JFK) or city codes
    /// (NYC), which match every airport in the city.
    Search {
        #[arg(long)]
        origin: String,

        #[arg(long)]
        destination: String,

        /// Departure date (YYYY-MM-DD). Accepted but not used for matching.
        #[arg(long, default_value = "")]
        departure_date: String,

        /// Return date (YYYY-MM-DD). Accepted but not used for matching.
        #[arg(long)]
        return_date: Option<String>,

        #[arg(long, default_value_t = 1)]
        passengers: u32,

        /// Cabin class: economy, business, or first.
        #[arg(long = "class", default_value = "economy")]
        class_type: String,

        /// Print the JSON response instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// List the routes served by the catalog.
    Routes,

    /// List city codes and the airports they expand to.
    Cities,

    /// Start a server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },
}

#[derive(Subcommand)]
enum ServeService {
    /// HTTP tool API plus MCP Streamable HTTP at `/mcp`, bound to `[server].bind`.
    Http,
    /// MCP over stdin/stdout.
    Stdio,
}

fn resolve_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(p) => config::load_config(p),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if default.exists() {
                config::load_config(&default)
            } else {
                Ok(Config::minimal())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = resolve_config(cli.config.as_ref())?;
    init_logging(&cfg.logging)?;

    match cli.command {
        Commands::Search {
            origin,
            destination,
            departure_date,
            return_date,
            passengers,
            class_type,
            json,
        } => {
            let service = FlightService::new(load_matcher(&cfg)?);
            let criteria = SearchCriteria {
                origin,
                destination,
                departure_date,
                return_date,
                passengers,
                class_type,
            };
            if json {
                let response = service.search(&criteria)?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                run_search(&service, &criteria)?;
            }
        }
        Commands::Routes => {
            list_routes(&cfg)?;
        }
        Commands::Cities => {
            list_cities(&cfg)?;
        }
        Commands::Serve { service } => {
            let flight_service = Arc::new(FlightService::new(load_matcher(&cfg)?));
            match service {
                ServeService::Http => {
                    run_server(&cfg, flight_service).await?;
                }
                ServeService::Stdio => {
                    tracing::info!("starting MCP server on stdio");
                    let bridge = McpBridge::new(
                        ToolContext::new(flight_service),
                        Arc::new(ToolRegistry::with_builtins()),
                        Arc::new(ToolRegistry::new()),
                    );
                    let running = bridge.serve(rmcp::transport::stdio()).await?;
                    running.waiting().await?;
                    tracing::info!("MCP stdio server stopped");
                }
            }
        }
    }

    Ok(())
}
