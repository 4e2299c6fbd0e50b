//! Flight matching engine.
//!
//! The matcher owns a read-only [`Catalog`] and [`CityAirportIndex`], both
//! injected at construction. A search resolves origin and destination into
//! airport sets, then keeps every catalog record where
//!
//! ```text
//! origin ∈ O  ∧  destination ∈ D  ∧  class == lower(class_type)
//! ```
//!
//! in a single pass, preserving catalog order. There is no ranking and no
//! partial matching.
//!
//! Two entry points:
//!
//! * [`FlightMatcher::search`]: the raw predicate scan. Any input is
//!   accepted; "bad input" and "no match" both give an empty list.
//! * [`FlightMatcher::search_flights`]: the request contract. Rejects empty
//!   origin/destination with [`SearchError::MissingCriteria`] and explains an
//!   empty result with a [`NoMatchReason`].

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::airports::{AirportSet, CityAirportIndex};
use crate::catalog::Catalog;
use crate::models::{CabinClass, FlightMatch, FlightRecord, SearchCriteria};

/// Request-level failures. An empty result is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("missing {field}: both origin and destination must be provided")]
    MissingCriteria { field: &'static str },
}

impl SearchError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::MissingCriteria { .. } => "missing_criteria",
        }
    }
}

/// Why a valid search came back empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoMatchReason {
    /// The requested class is not one of the known cabin classes.
    UnknownCabinClass {
        class_type: String,
        allowed: Vec<&'static str>,
    },
    /// No catalog record connects the resolved airports in this class.
    NoRoute {
        origin_airports: AirportSet,
        destination_airports: AirportSet,
        class_type: String,
        available_routes: Vec<String>,
    },
}

/// Result of [`FlightMatcher::search_flights`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found { flights: Vec<FlightMatch> },
    NoMatch { reason: NoMatchReason },
}

impl SearchOutcome {
    /// Matched flights; empty for [`SearchOutcome::NoMatch`].
    pub fn flights(&self) -> &[FlightMatch] {
        match self {
            SearchOutcome::Found { flights } => flights,
            SearchOutcome::NoMatch { .. } => &[],
        }
    }

    pub fn into_flights(self) -> Vec<FlightMatch> {
        match self {
            SearchOutcome::Found { flights } => flights,
            SearchOutcome::NoMatch { .. } => Vec::new(),
        }
    }

    pub fn no_match_reason(&self) -> Option<&NoMatchReason> {
        match self {
            SearchOutcome::Found { .. } => None,
            SearchOutcome::NoMatch { reason } => Some(reason),
        }
    }
}

/// Stateless matcher over a shared, immutable catalog.
///
/// Cloning is cheap (two `Arc`s) and calls never block one another.
#[derive(Debug, Clone)]
pub struct FlightMatcher {
    catalog: Arc<Catalog>,
    airports: Arc<CityAirportIndex>,
}

impl FlightMatcher {
    pub fn new(catalog: Arc<Catalog>, airports: Arc<CityAirportIndex>) -> Self {
        Self { catalog, airports }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn airports(&self) -> &CityAirportIndex {
        &self.airports
    }

    /// Scan the catalog for records matching the predicate.
    pub fn search(&self, origin: &str, destination: &str, class_type: &str) -> Vec<&FlightRecord> {
        let origins = self.airports.resolve(origin);
        let destinations = self.airports.resolve(destination);
        let class = class_type.to_lowercase();

        self.catalog
            .flights()
            .iter()
            .filter(|f| {
                origins.contains(&f.origin)
                    && destinations.contains(&f.destination)
                    && f.cabin_class.as_str() == class
            })
            .collect()
    }

    /// Run a search request and map matches into response records.
    pub fn search_flights(&self, criteria: &SearchCriteria) -> Result<SearchOutcome, SearchError> {
        if criteria.origin.trim().is_empty() {
            return Err(SearchError::MissingCriteria { field: "origin" });
        }
        if criteria.destination.trim().is_empty() {
            return Err(SearchError::MissingCriteria {
                field: "destination",
            });
        }

        let flights: Vec<FlightMatch> = self
            .search(&criteria.origin, &criteria.destination, &criteria.class_type)
            .into_iter()
            .map(FlightMatch::from)
            .collect();

        if !flights.is_empty() {
            return Ok(SearchOutcome::Found { flights });
        }

        // Same normalization as the predicate: lower-case, no trimming.
        let class_type = criteria.class_type.to_lowercase();
        let known_class = CabinClass::ALL.iter().any(|c| c.as_str() == class_type);
        let reason = if !known_class {
            NoMatchReason::UnknownCabinClass {
                class_type,
                allowed: CabinClass::ALL.iter().map(|c| c.as_str()).collect(),
            }
        } else {
            NoMatchReason::NoRoute {
                origin_airports: self.airports.resolve(&criteria.origin),
                destination_airports: self.airports.resolve(&criteria.destination),
                class_type,
                available_routes: self.catalog.routes(),
            }
        };
        Ok(SearchOutcome::NoMatch { reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawFlight;

    fn flight(id: &str, origin: &str, destination: &str, price: f64, class: &str) -> RawFlight {
        RawFlight {
            id: id.to_string(),
            airline: "Test Air".to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time: "08:00".to_string(),
            arrival_time: "11:00".to_string(),
            duration: "3h 00m".to_string(),
            stops: 0,
            price,
            class: class.to_string(),
        }
    }

    /// AA100 JFK→MIA and UA300 LAX→LAS, both economy, with NYC and LA cities.
    fn scenario_matcher() -> FlightMatcher {
        let catalog = Catalog::from_raw(vec![
            flight("AA100", "JFK", "MIA", 299.99, "economy"),
            flight("UA300", "LAX", "LAS", 199.99, "economy"),
        ])
        .unwrap();
        let mut airports = CityAirportIndex::new();
        airports.insert("NYC", ["JFK", "LGA", "EWR"]);
        airports.insert("LA", ["LAX", "BUR", "ONT"]);
        FlightMatcher::new(Arc::new(catalog), Arc::new(airports))
    }

    fn ids(records: &[&FlightRecord]) -> Vec<String> {
        records.iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn test_city_origin_matches_airport_record() {
        let m = scenario_matcher();
        assert_eq!(ids(&m.search("NYC", "MIA", "economy")), vec!["AA100"]);
    }

    #[test]
    fn test_second_city_route() {
        let m = scenario_matcher();
        assert_eq!(ids(&m.search("LA", "LAS", "economy")), vec!["UA300"]);
    }

    #[test]
    fn test_unconnected_cities_return_empty() {
        let m = scenario_matcher();
        assert!(m.search("NYC", "LAS", "economy").is_empty());
    }

    #[test]
    fn test_class_mismatch_returns_empty() {
        let m = scenario_matcher();
        assert!(m.search("JFK", "MIA", "business").is_empty());
    }

    #[test]
    fn test_empty_origin_returns_empty() {
        let m = scenario_matcher();
        assert!(m.search("", "MIA", "economy").is_empty());
    }

    #[test]
    fn test_class_is_case_insensitive() {
        let m = scenario_matcher();
        assert_eq!(
            ids(&m.search("NYC", "MIA", "ECONOMY")),
            ids(&m.search("NYC", "MIA", "economy"))
        );
        assert_eq!(ids(&m.search("nyc", "mia", "Economy")), vec!["AA100"]);
    }

    #[test]
    fn test_expansion_matches_any_city_airport() {
        let catalog = Catalog::from_raw(vec![
            flight("F1", "JFK", "MIA", 100.0, "economy"),
            flight("F2", "LAX", "MIA", 100.0, "economy"),
            flight("F3", "EWR", "MIA", 100.0, "economy"),
            flight("F4", "LGA", "MIA", 100.0, "economy"),
        ])
        .unwrap();
        let m = FlightMatcher::new(Arc::new(catalog), Arc::new(CityAirportIndex::builtin()));
        // Catalog order, not city order.
        assert_eq!(ids(&m.search("NYC", "MIA", "economy")), vec!["F1", "F3", "F4"]);
    }

    #[test]
    fn test_unknown_code_is_literal_airport() {
        let m = scenario_matcher();
        assert_eq!(ids(&m.search("JFK", "MIA", "economy")), vec!["AA100"]);
        assert!(m.search("LGA", "MIA", "economy").is_empty());
    }

    #[test]
    fn test_unknown_class_returns_empty() {
        let m = scenario_matcher();
        assert!(m.search("NYC", "MIA", "premium").is_empty());
        assert!(m.search("NYC", "MIA", "").is_empty());
    }

    #[test]
    fn test_search_is_idempotent() {
        let m = FlightMatcher::new(
            Arc::new(Catalog::builtin().unwrap()),
            Arc::new(CityAirportIndex::builtin()),
        );
        let first = ids(&m.search("NYC", "LON", "economy"));
        let second = ids(&m.search("NYC", "LON", "economy"));
        assert_eq!(first, vec!["BA178", "UA880", "DL400"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_flights_maps_matches() {
        let m = scenario_matcher();
        let outcome = m
            .search_flights(&SearchCriteria::new("NYC", "MIA", "economy"))
            .unwrap();
        let flights = outcome.flights();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].flight_id, "AA100");
        assert_eq!(flights[0].price, 299.99);
        assert_eq!(flights[0].class_type, "economy");
        assert!(outcome.no_match_reason().is_none());
    }

    #[test]
    fn test_search_flights_rejects_missing_criteria() {
        let m = scenario_matcher();
        let err = m
            .search_flights(&SearchCriteria::new("", "MIA", "economy"))
            .unwrap_err();
        assert_eq!(err, SearchError::MissingCriteria { field: "origin" });
        assert_eq!(err.code(), "missing_criteria");

        let err = m
            .search_flights(&SearchCriteria::new("NYC", "  ", "economy"))
            .unwrap_err();
        assert_eq!(err, SearchError::MissingCriteria { field: "destination" });
    }

    #[test]
    fn test_search_flights_explains_no_route() {
        let m = scenario_matcher();
        let outcome = m
            .search_flights(&SearchCriteria::new("NYC", "LAS", "economy"))
            .unwrap();
        assert!(outcome.flights().is_empty());
        match outcome.no_match_reason() {
            Some(NoMatchReason::NoRoute {
                origin_airports,
                available_routes,
                ..
            }) => {
                assert_eq!(origin_airports.codes(), &["JFK", "LGA", "EWR"]);
                assert_eq!(available_routes, &vec!["JFK-MIA".to_string(), "LAX-LAS".to_string()]);
            }
            other => panic!("unexpected reason: {:?}", other),
        }
    }

    #[test]
    fn test_search_flights_explains_unknown_class() {
        let m = scenario_matcher();
        let outcome = m
            .search_flights(&SearchCriteria::new("NYC", "MIA", "Premium"))
            .unwrap();
        assert_eq!(
            outcome.no_match_reason(),
            Some(&NoMatchReason::UnknownCabinClass {
                class_type: "premium".to_string(),
                allowed: vec!["economy", "business", "first"],
            })
        );
    }

    #[test]
    fn test_padded_class_is_unknown_not_no_route() {
        let m = scenario_matcher();
        let outcome = m
            .search_flights(&SearchCriteria::new("JFK", "MIA", " economy"))
            .unwrap();
        assert!(outcome.flights().is_empty());
        assert_eq!(
            outcome.no_match_reason(),
            Some(&NoMatchReason::UnknownCabinClass {
                class_type: " economy".to_string(),
                allowed: vec!["economy", "business", "first"],
            })
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let m = scenario_matcher();
        let outcome = m
            .search_flights(&SearchCriteria::new("LA", "LAS", "economy"))
            .unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["flights"][0]["flight_id"], "UA300");

        let empty = m
            .search_flights(&SearchCriteria::new("LA", "MIA", "economy"))
            .unwrap();
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["status"], "no_match");
        assert_eq!(json["reason"]["kind"], "no_route");
    }
}
