//! Flight catalog loading and validation.
//!
//! A [`Catalog`] is the fixed, read-only collection of flights the matcher
//! scans. It is built once at startup, either from the built-in demo data
//! ([`Catalog::builtin`]) or from a TOML file ([`CatalogFile::parse`]), and
//! never changes afterwards.
//!
//! # File format
//!
//! ```toml
//! [cities]
//! NYC = ["JFK", "LGA", "EWR"]
//!
//! [[flights]]
//! id = "AA100"
//! airline = "American Airlines"
//! origin = "JFK"
//! destination = "MIA"
//! departure_time = "08:00"
//! arrival_time = "11:15"
//! duration = "3h 15m"
//! stops = 0
//! price = 299.99
//! class = "economy"
//! ```
//!
//! Every entry is validated before the catalog exists: a malformed flight
//! fails the whole load with a [`CatalogError`] naming the flight.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::models::{CabinClass, FlightRecord};

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("flight '{flight}': invalid {field}: {reason}")]
    InvalidField {
        flight: String,
        field: &'static str,
        reason: String,
    },

    #[error("duplicate flight id '{0}'")]
    DuplicateId(String),
}

/// One `[[flights]]` entry as written in the file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFlight {
    pub id: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    #[serde(default)]
    pub stops: i64,
    pub price: f64,
    #[serde(alias = "class_type", alias = "cabin_class")]
    pub class: String,
}

#[derive(Debug, Deserialize)]
struct RawCatalogFile {
    #[serde(default)]
    flights: Vec<RawFlight>,
    #[serde(default)]
    cities: BTreeMap<String, Vec<String>>,
}

/// A parsed and validated catalog file.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    pub catalog: Catalog,
    /// City overrides from the `[cities]` table, keyed as written.
    pub cities: BTreeMap<String, Vec<String>>,
}

impl CatalogFile {
    /// Parse and validate a TOML catalog.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalogFile = toml::from_str(content)?;
        let catalog = Catalog::from_raw(raw.flights)?;
        Ok(Self {
            catalog,
            cities: raw.cities,
        })
    }
}

/// Immutable, ordered collection of validated flights.
#[derive(Debug, Clone)]
pub struct Catalog {
    flights: Vec<FlightRecord>,
}

impl Catalog {
    /// Validate raw entries and build a catalog, preserving their order.
    pub fn from_raw(raw: Vec<RawFlight>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut flights = Vec::with_capacity(raw.len());
        for entry in raw {
            let record = validate_flight(entry)?;
            if !seen.insert(record.id.clone()) {
                return Err(CatalogError::DuplicateId(record.id));
            }
            flights.push(record);
        }
        Ok(Self { flights })
    }

    /// The demo catalog served when no catalog file is configured.
    ///
    /// The rows go through the same validation as a catalog file, so a bad
    /// built-in row is reported instead of yielding an empty catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        let raw = BUILTIN_FLIGHTS
            .iter()
            .map(|f| RawFlight {
                id: f.0.to_string(),
                airline: f.1.to_string(),
                origin: f.2.to_string(),
                destination: f.3.to_string(),
                departure_time: f.4.to_string(),
                arrival_time: f.5.to_string(),
                duration: f.6.to_string(),
                stops: f.7,
                price: f.8,
                class: f.9.to_string(),
            })
            .collect();
        Self::from_raw(raw)
    }

    /// All flights in catalog order.
    pub fn flights(&self) -> &[FlightRecord] {
        &self.flights
    }

    pub fn get(&self, id: &str) -> Option<&FlightRecord> {
        self.flights.iter().find(|f| f.id == id)
    }

    /// Distinct `ORIGIN-DEST` pairs, in order of first appearance.
    pub fn routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = Vec::new();
        for f in &self.flights {
            let route = format!("{}-{}", f.origin, f.destination);
            if !routes.contains(&route) {
                routes.push(route);
            }
        }
        routes
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

type BuiltinRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i64,
    f64,
    &'static str,
);

#[rustfmt::skip]
const BUILTIN_FLIGHTS: &[BuiltinRow] = &[
    ("AA100", "American Airlines", "JFK", "MIA", "08:00", "11:15", "3h 15m", 0, 299.99, "economy"),
    ("DL200", "Delta", "LGA", "MIA", "09:30", "12:45", "3h 15m", 0, 749.00, "business"),
    ("UA300", "United Airlines", "LAX", "LAS", "14:00", "15:10", "1h 10m", 0, 199.99, "economy"),
    ("WN410", "Southwest", "BUR", "LAS", "17:20", "18:30", "1h 10m", 0, 129.00, "economy"),
    ("AA250", "American Airlines", "EWR", "ORD", "07:15", "08:55", "2h 40m", 0, 219.50, "economy"),
    ("UA520", "United Airlines", "SFO", "ORD", "06:00", "14:35", "6h 35m", 1, 289.00, "economy"),
    ("BA178", "British Airways", "JFK", "LHR", "10:00", "22:00", "7h 00m", 0, 800.00, "economy"),
    ("UA880", "United Airlines", "JFK", "LHR", "12:00", "00:00", "7h 00m", 0, 900.00, "economy"),
    ("DL400", "Delta", "JFK", "LHR", "13:00", "01:00", "7h 00m", 0, 950.00, "economy"),
    ("BA112", "British Airways", "JFK", "LHR", "18:30", "06:30", "7h 00m", 0, 2450.00, "first"),
];

fn invalid(flight: &str, field: &'static str, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidField {
        flight: flight.to_string(),
        field,
        reason: reason.into(),
    }
}

fn validate_flight(raw: RawFlight) -> Result<FlightRecord, CatalogError> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(invalid("<unnamed>", "id", "must not be empty"));
    }
    if raw.airline.trim().is_empty() {
        return Err(invalid(&id, "airline", "must not be empty"));
    }
    let origin = airport_code(&id, "origin", &raw.origin)?;
    let destination = airport_code(&id, "destination", &raw.destination)?;
    check_clock_time(&id, "departure_time", &raw.departure_time)?;
    check_clock_time(&id, "arrival_time", &raw.arrival_time)?;
    if raw.duration.trim().is_empty() {
        return Err(invalid(&id, "duration", "must not be empty"));
    }
    let stops =
        u32::try_from(raw.stops).map_err(|_| invalid(&id, "stops", "must be a non-negative integer"))?;
    if !raw.price.is_finite() || raw.price < 0.0 {
        return Err(invalid(&id, "price", "must be a non-negative number"));
    }
    let cabin_class: CabinClass = raw.class.parse().map_err(|e: String| invalid(&id, "class", e))?;

    Ok(FlightRecord {
        id,
        airline: raw.airline.trim().to_string(),
        origin,
        destination,
        departure_time: raw.departure_time,
        arrival_time: raw.arrival_time,
        duration: raw.duration.trim().to_string(),
        stops,
        price: raw.price,
        cabin_class,
    })
}

fn airport_code(flight: &str, field: &'static str, value: &str) -> Result<String, CatalogError> {
    let code = value.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            flight,
            field,
            format!("'{}' is not a 3-letter airport code", value),
        ));
    }
    Ok(code.to_ascii_uppercase())
}

fn check_clock_time(flight: &str, field: &'static str, value: &str) -> Result<(), CatalogError> {
    let valid = match value.split_once(':') {
        Some((h, m)) if h.len() == 2 && m.len() == 2 => {
            matches!((h.parse::<u8>(), m.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(invalid(flight, field, format!("'{}' is not HH:MM", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str) -> RawFlight {
        RawFlight {
            id: id.to_string(),
            airline: "Test Air".to_string(),
            origin: "jfk".to_string(),
            destination: "MIA".to_string(),
            departure_time: "08:00".to_string(),
            arrival_time: "11:15".to_string(),
            duration: "3h 15m".to_string(),
            stops: 0,
            price: 100.0,
            class: "Economy".to_string(),
        }
    }

    #[test]
    fn test_builtin_catalog_loads_every_row() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), BUILTIN_FLIGHTS.len());
        let aa100 = catalog.get("AA100").unwrap();
        assert_eq!(aa100.origin, "JFK");
        assert_eq!(aa100.price, 299.99);
        let ua300 = catalog.get("UA300").unwrap();
        assert_eq!(ua300.destination, "LAS");
    }

    #[test]
    fn test_validation_normalizes_codes_and_class() {
        let catalog = Catalog::from_raw(vec![raw("T1")]).unwrap();
        let f = &catalog.flights()[0];
        assert_eq!(f.origin, "JFK");
        assert_eq!(f.cabin_class, CabinClass::Economy);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::from_raw(vec![raw("T1"), raw("T1")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "T1"));
    }

    #[test]
    fn test_bad_airport_code_rejected() {
        let mut r = raw("T1");
        r.destination = "MIAMI".to_string();
        let err = Catalog::from_raw(vec![r]).unwrap_err();
        assert!(err.to_string().contains("destination"));
        assert!(err.to_string().contains("T1"));
    }

    #[test]
    fn test_bad_time_rejected() {
        for bad in ["8:00", "24:00", "12:60", "noon", ""] {
            let mut r = raw("T1");
            r.arrival_time = bad.to_string();
            assert!(Catalog::from_raw(vec![r]).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut r = raw("T1");
        r.price = -1.0;
        assert!(Catalog::from_raw(vec![r]).is_err());

        let mut r = raw("T2");
        r.stops = -1;
        assert!(Catalog::from_raw(vec![r]).is_err());
    }

    #[test]
    fn test_unknown_class_rejected() {
        let mut r = raw("T1");
        r.class = "premium".to_string();
        let err = Catalog::from_raw(vec![r]).unwrap_err();
        assert!(err.to_string().contains("class"));
    }

    #[test]
    fn test_routes_distinct_in_order() {
        let routes = Catalog::builtin().unwrap().routes();
        assert_eq!(routes[0], "JFK-MIA");
        assert_eq!(routes.iter().filter(|r| *r == "JFK-LHR").count(), 1);
    }

    #[test]
    fn test_parse_catalog_file() {
        let content = r#"
[cities]
mia = ["MIA", "FLL"]

[[flights]]
id = "XX1"
airline = "Example"
origin = "JFK"
destination = "FLL"
departure_time = "06:00"
arrival_time = "09:00"
duration = "3h"
stops = 0
price = 99.5
class_type = "FIRST"
"#;
        let file = CatalogFile::parse(content).unwrap();
        assert_eq!(file.catalog.len(), 1);
        assert_eq!(file.catalog.flights()[0].cabin_class, CabinClass::First);
        assert_eq!(file.cities.get("mia").unwrap(), &vec!["MIA".to_string(), "FLL".to_string()]);
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let err = CatalogFile::parse("[[flights]\nid = ").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
