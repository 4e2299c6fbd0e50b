//! HTTP server: JSON tool API plus the MCP Streamable HTTP endpoint.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (status, version, catalog size) |
//! | `GET`  | `/tools/list` | List all registered tools with schemas |
//! | `POST` | `/tools/{name}` | Call any registered tool by name |
//! | `*`    | `/mcp` | MCP JSON-RPC over Streamable HTTP |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "missing_criteria", "message": "...", "details": { "request_id": "..." } } }
//! ```
//!
//! Error codes: `bad_request` (400), `missing_criteria` (400), `not_found` (404),
//! `tool_error` (500), `internal` (500).
//!
//! # MCP client configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "flights": {
//!       "command": "flights",
//!       "args": ["--config", "/path/to/flights.toml", "serve", "stdio"]
//!     }
//!   }
//! }
//! ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::mcp::McpBridge;
use crate::schema::{validate_params, ToolInfo};
use crate::service::{FlightService, ServiceError};
use crate::traits::{ToolContext, ToolRegistry};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    ctx: ToolContext,
    tools: Arc<ToolRegistry>,
    extra_tools: Arc<ToolRegistry>,
}

impl AppState {
    fn find_tool(&self, name: &str) -> Option<&dyn crate::traits::Tool> {
        self.tools
            .find(name)
            .or_else(|| self.extra_tools.find(name))
    }
}

/// Starts the HTTP server with the built-in tools.
///
/// Binds to `[server].bind` and runs until Ctrl-C.
pub async fn run_server(config: &Config, service: Arc<FlightService>) -> anyhow::Result<()> {
    run_server_with_extensions(config, service, Arc::new(ToolRegistry::new())).await
}

/// Starts the server with additional Rust tools served next to the built-ins.
///
/// ```rust,no_run
/// use flight_search::server::run_server_with_extensions;
/// use flight_search::service::FlightService;
/// use flight_search::traits::ToolRegistry;
/// use std::sync::Arc;
///
/// # async fn example(config: &flight_search::config::Config, service: Arc<FlightService>) -> anyhow::Result<()> {
/// let mut tools = ToolRegistry::new();
/// // tools.register(Box::new(MyTool::new()));
/// run_server_with_extensions(config, service, Arc::new(tools)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_server_with_extensions(
    config: &Config,
    service: Arc<FlightService>,
    extra_tools: Arc<ToolRegistry>,
) -> anyhow::Result<()> {
    let app = router(service, extra_tools);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(bind = %config.server.bind, "flight search server listening");
    println!("Flight search server listening on http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Build the router: tool API, health, and the `/mcp` service.
pub fn router(service: Arc<FlightService>, extra_tools: Arc<ToolRegistry>) -> Router {
    let state = AppState {
        ctx: ToolContext::new(service),
        tools: Arc::new(ToolRegistry::with_builtins()),
        extra_tools,
    };

    for t in state.tools.tools().iter().chain(state.extra_tools.tools()) {
        tracing::debug!(tool = t.name(), builtin = t.is_builtin(), "registered tool");
    }

    let bridge = McpBridge::new(
        state.ctx.clone(),
        state.tools.clone(),
        state.extra_tools.clone(),
    );
    let mcp_service = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/health", get(handle_health))
        .with_state(state)
        .nest_service("/mcp", mcp_service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl AppError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::BAD_REQUEST, "bad_request", message)
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::NOT_FOUND, "not_found", message)
}

/// Map a tool failure to a response. Service errors keep their code;
/// anything else from a tool is a `tool_error`.
fn classify_tool_error(tool_name: &str, err: anyhow::Error) -> AppError {
    match err.downcast_ref::<ServiceError>() {
        Some(se) => {
            let status = match se {
                ServiceError::MissingCriteria { .. } | ServiceError::InvalidRequest(_) => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::FlightNotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            AppError {
                status,
                code: se.code().to_string(),
                message: se.to_string(),
                details: se.details(),
            }
        }
        None => {
            tracing::error!(tool = tool_name, error = %err, "tool failed");
            AppError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "tool_error",
                format!("{}: {}", tool_name, err),
            )
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    flights: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        flights: state.ctx.service().matcher().catalog().len(),
    })
}

// ============ GET /tools/list ============

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let tools = state
        .tools
        .tools()
        .iter()
        .chain(state.extra_tools.tools())
        .map(|t| ToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            builtin: t.is_builtin(),
            parameters: t.parameters_schema(),
        })
        .collect();

    Json(ToolListResponse { tools })
}

// ============ POST /tools/{name} ============

/// Unified tool dispatch: look up, validate parameters, execute.
async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tool = state
        .find_tool(&name)
        .ok_or_else(|| not_found(format!("no tool registered with name: {}", name)))?;

    let validated_params = validate_params(&tool.parameters_schema(), &params)
        .map_err(|e| bad_request(e.to_string()))?;

    let result = tool
        .execute(validated_params, &state.ctx)
        .await
        .map_err(|e| classify_tool_error(&name, e))?;

    Ok(Json(serde_json::json!({ "result": result })))
}
