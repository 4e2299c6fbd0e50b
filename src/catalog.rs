//! Catalog bootstrap and listing commands.
//!
//! Builds the process-wide [`FlightMatcher`] from config: the built-in
//! catalog and city map, or a catalog file whose `[cities]` table extends
//! the built-in cities. Also backs `flights routes` and `flights cities`.

use anyhow::{Context, Result};
use std::sync::Arc;

use flight_search_core::catalog::CatalogFile;
use flight_search_core::{Catalog, CityAirportIndex, FlightMatcher};

use crate::config::Config;

/// Load the catalog and airport directory named by the config.
pub fn load_matcher(config: &Config) -> Result<FlightMatcher> {
    let mut airports = CityAirportIndex::builtin();

    let catalog = match &config.catalog.path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
            let file = CatalogFile::parse(&content)
                .with_context(|| format!("Failed to load catalog: {}", path.display()))?;
            for (city, codes) in &file.cities {
                airports.insert(city, codes);
            }
            tracing::info!(
                path = %path.display(),
                flights = file.catalog.len(),
                cities = file.cities.len(),
                "loaded catalog file"
            );
            file.catalog
        }
        None => {
            let catalog = Catalog::builtin().context("Built-in catalog is invalid")?;
            tracing::debug!(flights = catalog.len(), "using built-in catalog");
            catalog
        }
    };

    Ok(FlightMatcher::new(Arc::new(catalog), Arc::new(airports)))
}

/// Print every route in the catalog with its flight count.
pub fn list_routes(config: &Config) -> Result<()> {
    let matcher = load_matcher(config)?;
    let catalog = matcher.catalog();

    if catalog.is_empty() {
        println!("No flights in catalog.");
        return Ok(());
    }

    println!("{:<10} FLIGHTS", "ROUTE");
    for route in catalog.routes() {
        let count = catalog
            .flights()
            .iter()
            .filter(|f| format!("{}-{}", f.origin, f.destination) == route)
            .count();
        println!("{:<10} {}", route, count);
    }

    Ok(())
}

/// Print the city → airport directory.
pub fn list_cities(config: &Config) -> Result<()> {
    let matcher = load_matcher(config)?;

    println!("{:<8} AIRPORTS", "CITY");
    for (city, airports) in matcher.airports().cities() {
        println!("{:<8} {}", city, airports.join(", "));
    }

    Ok(())
}
