//! HTTP server implementation
//!
//! Provides the Axum-based HTTP server emulating the OpenAI, Anthropic
//! and Gemini wire protocols.

mod handlers;
mod routes;
mod shutdown;
mod state;
mod streaming;

pub use handlers::*;
pub use routes::*;
pub use shutdown::*;
pub use state::*;
pub use streaming::*;

use axum::response::{IntoResponse, Response};
use axum::Router;
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::config::SimulatorConfig;
use crate::error::SimulationError;
use crate::telemetry::install_metrics;

/// Run the emulator server until a shutdown signal arrives
pub async fn run_server(config: SimulatorConfig) -> anyhow::Result<()> {
    install_metrics();

    let addr = config.server.socket_addr()?;
    let state = AppState::new(config)?;
    let app = create_router(state.clone());

    info!("Starting LLM Emulator v{} on {}", crate::VERSION, addr);
    info!("Personas: {}", state.engine.catalog().names().join(", "));
    info!(
        "Latency simulation: {}",
        if state.engine.latency().is_enabled() { "enabled" } else { "disabled" }
    );
    info!(
        "Fault injection: {}",
        if state.engine.faults().is_active() { "enabled" } else { "disabled" }
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Turn a handler panic into a generic internal-error response
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");
    SimulationError::Internal("handler panicked".to_string()).into_response()
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors_enabled = state.config.server.cors_enabled;

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic));

    let router = Router::new()
        .merge(routes::openai_routes())
        .merge(routes::anthropic_routes())
        .merge(routes::google_routes())
        .merge(routes::health_routes())
        .fallback(handlers::not_found);

    let router = if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(middleware).with_state(state)
}
