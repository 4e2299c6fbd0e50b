//! Core data types for flight search.
//!
//! | Type | Role |
//! |------|------|
//! | [`FlightRecord`] | One validated catalog entry (immutable once loaded) |
//! | [`CabinClass`] | Closed set of cabin classes |
//! | [`SearchCriteria`] | One inbound search request |
//! | [`FlightMatch`] | Flat response record returned to callers |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cabin class of a flight. Parsed case-insensitively, always rendered lower-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    Economy,
    Business,
    First,
}

impl CabinClass {
    pub const ALL: [CabinClass; 3] = [CabinClass::Economy, CabinClass::Business, CabinClass::First];

    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CabinClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "economy" => Ok(CabinClass::Economy),
            "business" => Ok(CabinClass::Business),
            "first" => Ok(CabinClass::First),
            other => Err(format!(
                "unknown cabin class '{}'. Use economy, business, or first.",
                other
            )),
        }
    }
}

/// A single flight in the catalog.
///
/// Records are only constructed through [`Catalog`](crate::catalog::Catalog)
/// loading, which validates every field, so the matcher never sees a
/// malformed entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    /// Identifier, unique within the catalog (e.g. `"AA100"`).
    pub id: String,
    /// Carrier name (e.g. `"American Airlines"`).
    pub airline: String,
    /// Origin airport code, upper-case.
    pub origin: String,
    /// Destination airport code, upper-case.
    pub destination: String,
    /// Local departure time, `HH:MM`.
    pub departure_time: String,
    /// Local arrival time, `HH:MM`.
    pub arrival_time: String,
    /// Display-formatted duration (e.g. `"3h 15m"`).
    pub duration: String,
    pub stops: u32,
    pub price: f64,
    pub cabin_class: CabinClass,
}

/// Inbound search request.
///
/// Only `origin`, `destination`, and `class_type` take part in matching.
/// The dates and passenger count are part of the request contract and are
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// City or airport code.
    pub origin: String,
    /// City or airport code.
    pub destination: String,
    /// Departure date (`YYYY-MM-DD`).
    #[serde(default)]
    pub departure_date: String,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default = "default_class_type")]
    pub class_type: String,
}

fn default_passengers() -> u32 {
    1
}

fn default_class_type() -> String {
    CabinClass::Economy.as_str().to_string()
}

impl SearchCriteria {
    /// Criteria for a one-way, single-passenger search.
    pub fn new(origin: &str, destination: &str, class_type: &str) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date: String::new(),
            return_date: None,
            passengers: default_passengers(),
            class_type: class_type.to_string(),
        }
    }
}

/// Flat response record for one matched flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightMatch {
    pub flight_id: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub stops: u32,
    pub price: f64,
    pub class_type: String,
}

impl From<&FlightRecord> for FlightMatch {
    fn from(record: &FlightRecord) -> Self {
        Self {
            flight_id: record.id.clone(),
            airline: record.airline.clone(),
            origin: record.origin.clone(),
            destination: record.destination.clone(),
            departure_time: record.departure_time.clone(),
            arrival_time: record.arrival_time.clone(),
            duration: record.duration.clone(),
            stops: record.stops,
            price: record.price,
            class_type: record.cabin_class.as_str().to_string(),
        }
    }
}
