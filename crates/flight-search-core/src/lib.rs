//! # Flight Search Core
//!
//! Shared, I/O-free logic for Flight Search: flight record models, catalog
//! validation, the city → airport directory, and the matching engine.
//!
//! This crate contains no tokio, filesystem, or network dependencies. The
//! application crate reads files, wires transports, and hands a validated
//! [`catalog::Catalog`] to a [`search::FlightMatcher`].

pub mod airports;
pub mod catalog;
pub mod models;
pub mod search;

pub use airports::{AirportSet, CityAirportIndex};
pub use catalog::{Catalog, CatalogError};
pub use models::{CabinClass, FlightMatch, FlightRecord, SearchCriteria};
pub use search::{FlightMatcher, NoMatchReason, SearchError, SearchOutcome};
