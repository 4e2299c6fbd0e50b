//! Tool trait and registry.
//!
//! Every operation the server exposes is a [`Tool`]. The built-in tools
//! wrap the [`FlightService`]; embedding applications can register their
//! own tools next to them and serve both through the same HTTP and MCP
//! endpoints.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              ToolRegistry                │
//! │  ┌────────────────┐  ┌────────────────┐  │
//! │  │ Built-in       │  │ Custom (Rust)  │  │
//! │  │ search_flights │  │                │  │
//! │  │ list_routes    │  │                │  │
//! │  │ get_flight     │  │                │  │
//! │  │ resolve_airp.. │  │                │  │
//! │  └────────────────┘  └────────────────┘  │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!        run_server() → HTTP + MCP
//! ```
//!
//! # Usage
//!
//! ```rust
//! use flight_search::traits::ToolRegistry;
//!
//! let mut tools = ToolRegistry::with_builtins();
//! // tools.register(Box::new(MyTool::new()));
//! assert_eq!(tools.len(), 4);
//! ```

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use flight_search_core::SearchCriteria;

use crate::service::{FlightService, SearchResponse};

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// A tool that agents can discover and call.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use anyhow::Result;
/// use serde_json::{json, Value};
/// use flight_search::traits::{Tool, ToolContext};
///
/// pub struct CheapestTool;
///
/// #[async_trait]
/// impl Tool for CheapestTool {
///     fn name(&self) -> &str { "cheapest" }
///     fn description(&self) -> &str { "Cheapest economy fare between two codes" }
///
///     fn parameters_schema(&self) -> Value {
///         json!({
///             "type": "object",
///             "properties": {
///                 "origin": { "type": "string" },
///                 "destination": { "type": "string" }
///             },
///             "required": ["origin", "destination"]
///         })
///     }
///
///     async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
///         let origin = params["origin"].as_str().unwrap_or("");
///         let destination = params["destination"].as_str().unwrap_or("");
///         let found = ctx.search(origin, destination, "economy")?;
///         let min = found.flights.iter().map(|f| f.price).fold(f64::INFINITY, f64::min);
///         Ok(json!({ "price": if min.is_finite() { Some(min) } else { None } }))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, used as the route path (`POST /tools/{name}`) and MCP tool name.
    fn name(&self) -> &str;

    /// One-line description for agent discovery.
    fn description(&self) -> &str;

    /// Whether this tool ships with the server. Defaults to `false`.
    fn is_builtin(&self) -> bool {
        false
    }

    /// JSON Schema of the parameters object.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with validated parameters.
    ///
    /// Errors that are [`ServiceError`](crate::service::ServiceError)s keep
    /// their code at the transport; anything else is reported as a tool error.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Access to the flight service during tool execution.
#[derive(Clone)]
pub struct ToolContext {
    service: Arc<FlightService>,
}

impl ToolContext {
    pub fn new(service: Arc<FlightService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &FlightService {
        &self.service
    }

    /// One-way search for a single passenger.
    pub fn search(&self, origin: &str, destination: &str, class_type: &str) -> Result<SearchResponse> {
        Ok(self
            .service
            .search(&SearchCriteria::new(origin, destination, class_type))?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Tool Implementations
// ═══════════════════════════════════════════════════════════════════════

/// Built-in flight search. Delegates to [`FlightService::search_json`].
pub struct SearchFlightsTool;

#[async_trait]
impl Tool for SearchFlightsTool {
    fn name(&self) -> &str {
        "search_flights"
    }

    fn description(&self) -> &str {
        "Search flights by origin, destination, and cabin class. \
         City codes (e.g. NYC) match every airport in the city."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": { "type": "string", "description": "Origin city or airport code (e.g. NYC, JFK)" },
                "destination": { "type": "string", "description": "Destination city or airport code" },
                "departure_date": { "type": "string", "description": "Departure date (YYYY-MM-DD)" },
                "return_date": { "type": "string", "description": "Return date (YYYY-MM-DD), optional" },
                "passengers": { "type": "integer", "minimum": 1, "default": 1 },
                "class_type": { "type": "string", "description": "economy, business, or first", "default": "economy" }
            },
            "required": ["origin", "destination", "departure_date"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(ctx.service.search_json(params)?)
    }
}

/// Built-in route listing.
pub struct ListRoutesTool;

#[async_trait]
impl Tool for ListRoutesTool {
    fn name(&self) -> &str {
        "list_routes"
    }

    fn description(&self) -> &str {
        "List the ORIGIN-DEST routes served by the flight catalog"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        let catalog = ctx.service.matcher().catalog();
        Ok(json!({ "routes": catalog.routes(), "flights": catalog.len() }))
    }
}

/// Built-in flight lookup by id. Delegates to [`FlightService::get_flight`].
pub struct GetFlightTool;

#[async_trait]
impl Tool for GetFlightTool {
    fn name(&self) -> &str {
        "get_flight"
    }

    fn description(&self) -> &str {
        "Retrieve one catalog flight by its id (e.g. AA100)"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "Flight id" }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let id = params["id"].as_str().unwrap_or("");
        let flight = ctx.service.get_flight(id)?;
        Ok(serde_json::to_value(&flight)?)
    }
}

/// Built-in city/airport resolution.
pub struct ResolveAirportsTool;

#[async_trait]
impl Tool for ResolveAirportsTool {
    fn name(&self) -> &str {
        "resolve_airports"
    }

    fn description(&self) -> &str {
        "Expand a city code into its airport codes (unknown codes resolve to themselves)"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": { "type": "string", "description": "City or airport code" }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let code = params["code"].as_str().unwrap_or("");
        let airports = ctx.service.matcher().airports().resolve(code);
        Ok(json!({ "code": code.to_uppercase(), "airports": airports }))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Registry for tools (built-in and custom Rust).
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry pre-loaded with `search_flights`, `list_routes`,
    /// `get_flight`, and `resolve_airports`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SearchFlightsTool));
        registry.register(Box::new(ListRoutesTool));
        registry.register(Box::new(GetFlightTool));
        registry.register(Box::new(ResolveAirportsTool));
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    /// Find a tool by name.
    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceError;
    use flight_search_core::{Catalog, CityAirportIndex, FlightMatcher};

    fn ctx() -> ToolContext {
        ToolContext::new(Arc::new(FlightService::new(FlightMatcher::new(
            Arc::new(Catalog::builtin().unwrap()),
            Arc::new(CityAirportIndex::builtin()),
        ))))
    }

    #[test]
    fn test_builtins_registered_in_order() {
        let registry = ToolRegistry::with_builtins();
        let names: Vec<&str> = registry.tools().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec!["search_flights", "list_routes", "get_flight", "resolve_airports"]
        );
        assert!(registry.find("search_flights").unwrap().is_builtin());
        assert!(registry.find("book_flight").is_none());
    }

    #[tokio::test]
    async fn test_search_tool_returns_flights() {
        let result = SearchFlightsTool
            .execute(
                json!({ "origin": "NYC", "destination": "MIA", "departure_date": "2024-03-20", "class_type": "economy" }),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["flights"][0]["flight_id"], "AA100");
        assert_eq!(result["flights"][0]["price"], 299.99);
        assert!(result["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_search_tool_keeps_error_code() {
        let err = SearchFlightsTool
            .execute(json!({ "origin": "", "destination": "MIA" }), &ctx())
            .await
            .unwrap_err();
        let service_err = err.downcast_ref::<ServiceError>().unwrap();
        assert_eq!(service_err.code(), "missing_criteria");
    }

    #[tokio::test]
    async fn test_list_routes_tool() {
        let result = ListRoutesTool.execute(json!({}), &ctx()).await.unwrap();
        assert_eq!(result["routes"][0], "JFK-MIA");
        assert_eq!(result["flights"], Catalog::builtin().unwrap().len());
    }

    #[tokio::test]
    async fn test_get_flight_tool() {
        let result = GetFlightTool
            .execute(json!({ "id": "UA300" }), &ctx())
            .await
            .unwrap();
        assert_eq!(result["flight_id"], "UA300");
        assert_eq!(result["destination"], "LAS");

        let err = GetFlightTool
            .execute(json!({ "id": "XX1" }), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<ServiceError>().unwrap().code(), "not_found");
    }

    #[tokio::test]
    async fn test_resolve_airports_tool() {
        let result = ResolveAirportsTool
            .execute(json!({ "code": "la" }), &ctx())
            .await
            .unwrap();
        assert_eq!(result["code"], "LA");
        assert_eq!(result["airports"], json!(["LAX", "BUR", "ONT"]));
    }

    #[test]
    fn test_context_search() {
        let found = ctx().search("SF", "CHI", "ECONOMY").unwrap();
        assert_eq!(found.flights.len(), 1);
        assert_eq!(found.flights[0].stops, 1);
    }
}
