//! # Flight Search
//!
//! **A flight search MCP server over a static, validated flight catalog.**
//!
//! Callers search by origin, destination, and cabin class. Origins and
//! destinations may be airport codes (`JFK`) or city codes (`NYC`), which
//! expand to every airport serving the city. Matching lives in the
//! [`flight_search_core`] crate; this crate adds configuration, logging,
//! the tool registry, and the transports.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ Catalog file │──▶│  FlightMatcher   │◀──│ City index   │
//! │ or built-in  │   │ (core, read-only)│   │ NYC → JFK... │
//! └──────────────┘   └────────┬─────────┘   └──────────────┘
//!                             │
//!                     ┌───────┴────────┐
//!                     │ FlightService  │  request id, logging,
//!                     └───────┬────────┘  error classification
//!              ┌──────────────┼──────────────┐
//!              ▼              ▼              ▼
//!        ┌──────────┐   ┌──────────┐   ┌──────────┐
//!        │   CLI    │   │   HTTP   │   │   MCP    │
//!        │(flights) │   │ /tools/* │   │ http/stdio│
//!        └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`catalog`] | Catalog bootstrap, `routes` and `cities` listings |
//! | [`service`] | Search call boundary: correlation ids, logging, error codes |
//! | [`schema`] | Tool parameter validation |
//! | [`traits`] | `Tool` trait, `ToolContext`, `ToolRegistry`, built-in tools |
//! | [`mcp`] | MCP server handler over the tool registry |
//! | [`server`] | Axum HTTP server with the `/mcp` endpoint |

pub mod catalog;
pub mod config;
pub mod logging;
pub mod mcp;
pub mod schema;
pub mod server;
pub mod service;
pub mod traits;

pub use service::{FlightService, SearchResponse, ServiceError};
pub use traits::{Tool, ToolContext, ToolRegistry};
