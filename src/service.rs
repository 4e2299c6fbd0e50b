//! Search call boundary.
//!
//! [`FlightService`] is what every transport (CLI, HTTP, MCP) calls. It
//! gives each call a correlation id, logs the criteria and outcome, and
//! classifies failures so an internal fault never looks like "no flights":
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Matches found | `Ok` with flights |
//! | Valid criteria, nothing matches | `Ok` with empty flights and a `no_match` reason |
//! | Empty origin/destination | [`ServiceError::MissingCriteria`] |
//! | Undecodable request | [`ServiceError::InvalidRequest`] |
//! | Unknown flight id (lookup) | [`ServiceError::FlightNotFound`] |
//! | Unexpected fault | [`ServiceError::Internal`] |

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;
use uuid::Uuid;

use flight_search_core::{
    FlightMatch, FlightMatcher, NoMatchReason, SearchCriteria, SearchError, SearchOutcome,
};

/// Failures surfaced to callers, each with a stable code.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{source}")]
    MissingCriteria {
        request_id: String,
        timestamp: DateTime<Utc>,
        #[source]
        source: SearchError,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("flight not found: {0}")]
    FlightNotFound(String),

    #[error("An unexpected error occurred while processing the request")]
    Internal {
        request_id: String,
        timestamp: DateTime<Utc>,
        message: String,
    },
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MissingCriteria { source, .. } => source.code(),
            ServiceError::InvalidRequest(_) => "bad_request",
            ServiceError::FlightNotFound(_) => "not_found",
            ServiceError::Internal { .. } => "internal",
        }
    }

    /// Structured context for error bodies.
    pub fn details(&self) -> Option<Value> {
        match self {
            ServiceError::MissingCriteria {
                request_id,
                timestamp,
                ..
            } => Some(json!({
                "required": "Both origin and destination must be provided",
                "request_id": request_id,
                "timestamp": timestamp.to_rfc3339(),
            })),
            ServiceError::InvalidRequest(_) => None,
            ServiceError::FlightNotFound(id) => Some(json!({ "flight_id": id })),
            ServiceError::Internal {
                request_id,
                timestamp,
                ..
            } => Some(json!({
                "request_id": request_id,
                "timestamp": timestamp.to_rfc3339(),
            })),
        }
    }
}

/// Response of one search call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub request_id: String,
    pub flights: Vec<FlightMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_match: Option<NoMatchReason>,
}

/// Shared entry point to the matcher.
#[derive(Debug, Clone)]
pub struct FlightService {
    matcher: FlightMatcher,
}

impl FlightService {
    pub fn new(matcher: FlightMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &FlightMatcher {
        &self.matcher
    }

    /// Run one search under a fresh correlation id.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<SearchResponse, ServiceError> {
        self.guarded(criteria, FlightMatcher::search_flights)
    }

    /// Classify the outcome of `run`. A panic becomes [`ServiceError::Internal`].
    fn guarded<F>(&self, criteria: &SearchCriteria, run: F) -> Result<SearchResponse, ServiceError>
    where
        F: FnOnce(&FlightMatcher, &SearchCriteria) -> Result<SearchOutcome, SearchError>,
    {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("search_flights", request_id = %request_id);
        let _guard = span.enter();

        tracing::info!(
            origin = %criteria.origin,
            destination = %criteria.destination,
            class_type = %criteria.class_type,
            departure_date = %criteria.departure_date,
            passengers = criteria.passengers,
            "received flight search"
        );

        let result = catch_unwind(AssertUnwindSafe(|| run(&self.matcher, criteria)));

        match result {
            Ok(Ok(outcome)) => {
                let no_match = outcome.no_match_reason().cloned();
                let flights = outcome.into_flights();
                tracing::info!(matches = flights.len(), "flight search complete");
                Ok(SearchResponse {
                    request_id,
                    flights,
                    no_match,
                })
            }
            Ok(Err(source)) => {
                tracing::warn!(error = %source, "rejected flight search");
                Err(ServiceError::MissingCriteria {
                    request_id,
                    timestamp: Utc::now(),
                    source,
                })
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                let timestamp = Utc::now();
                tracing::error!(
                    origin = %criteria.origin,
                    destination = %criteria.destination,
                    class_type = %criteria.class_type,
                    timestamp = %timestamp.to_rfc3339(),
                    error = %message,
                    "flight search failed unexpectedly"
                );
                Err(ServiceError::Internal {
                    request_id,
                    timestamp,
                    message,
                })
            }
        }
    }

    /// Look up one catalog flight by id.
    pub fn get_flight(&self, id: &str) -> Result<FlightMatch, ServiceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ServiceError::InvalidRequest("id must not be empty".to_string()));
        }
        match self.matcher.catalog().get(id) {
            Some(record) => Ok(FlightMatch::from(record)),
            None => {
                tracing::debug!(flight_id = id, "flight lookup missed");
                Err(ServiceError::FlightNotFound(id.to_string()))
            }
        }
    }

    /// Decode JSON parameters into criteria, search, and encode the response.
    pub fn search_json(&self, params: Value) -> Result<Value, ServiceError> {
        let criteria: SearchCriteria = serde_json::from_value(params)
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

        let response = self.search(&criteria)?;

        serde_json::to_value(&response).map_err(|e| {
            let timestamp = Utc::now();
            tracing::error!(
                request_id = %response.request_id,
                timestamp = %timestamp.to_rfc3339(),
                error = %e,
                "failed to encode search response"
            );
            ServiceError::Internal {
                request_id: response.request_id.clone(),
                timestamp,
                message: e.to_string(),
            }
        })
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// `flights search`: print matches as a table.
pub fn run_search(service: &FlightService, criteria: &SearchCriteria) -> Result<()> {
    let response = service.search(criteria)?;

    if response.flights.is_empty() {
        println!("No flights found.");
        match &response.no_match {
            Some(NoMatchReason::UnknownCabinClass { allowed, .. }) => {
                println!("Known classes: {}", allowed.join(", "));
            }
            Some(NoMatchReason::NoRoute {
                available_routes, ..
            }) => {
                println!("Available routes: {}", available_routes.join(", "));
            }
            None => {}
        }
        return Ok(());
    }

    println!(
        "{:<8} {:<20} {:<9} {:<13} {:<8} {:<6} {:>10} CLASS",
        "FLIGHT", "AIRLINE", "ROUTE", "TIME", "DURATION", "STOPS", "PRICE"
    );
    for f in &response.flights {
        println!(
            "{:<8} {:<20} {:<9} {:<13} {:<8} {:<6} {:>10.2} {}",
            f.flight_id,
            f.airline,
            format!("{}-{}", f.origin, f.destination),
            format!("{}-{}", f.departure_time, f.arrival_time),
            f.duration,
            f.stops,
            f.price,
            f.class_type
        );
    }
    println!("{} flight(s).", response.flights.len());

    Ok(())
}
