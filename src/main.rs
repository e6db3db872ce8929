//! Shiftline Backend
//!
//! A REST backend for team shift scheduling, availability tracking and
//! reporting, with SQLite persistence.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod scheduling;
mod workflow;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use workflow::{RelayClient, WorkflowEngine};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub workflow: Arc<WorkflowEngine>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shiftline Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (SHIFTLINE_API_PSK). Authentication is disabled!");
    }
    if config.summary_endpoint.is_none() {
        tracing::info!("No summary relay configured; workflow summaries use the local fallback");
    }
    if config.mail_endpoint.is_none() {
        tracing::info!("No mail relay configured; workflow emails are logged only");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Wire the workflow engine to the outbound relays
    let relay = Arc::new(RelayClient::new(
        config.summary_endpoint.clone(),
        config.mail_endpoint.clone(),
    ));
    let workflow = Arc::new(WorkflowEngine::new(relay.clone(), relay));

    // Create application state
    let state = AppState {
        repo,
        workflow,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Revision
        .route("/revision", get(api::get_revision))
        // Members
        .route("/members", get(api::list_members))
        .route("/members", post(api::create_member))
        .route("/members/{id}", get(api::get_member))
        .route("/members/{id}", put(api::update_member))
        .route("/members/{id}", delete(api::delete_member))
        // Shifts
        .route("/shifts", get(api::list_shifts))
        .route("/shifts", post(api::create_shift))
        .route("/shifts/bulk", post(api::bulk_create_shifts))
        .route("/shifts/stats", get(api::shift_stats))
        .route("/shifts/{id}", get(api::get_shift))
        .route("/shifts/{id}", put(api::update_shift))
        .route("/shifts/{id}", delete(api::delete_shift))
        // Available shifts
        .route("/available-shifts", get(api::list_available_shifts))
        .route("/available-shifts", post(api::create_available_shift))
        .route("/available-shifts/{id}/claim", post(api::claim_available_shift))
        .route("/available-shifts/{id}", delete(api::delete_available_shift))
        // Availability
        .route("/availability", get(api::list_availability))
        .route("/availability", put(api::upsert_availability))
        // Calendar events
        .route("/events", get(api::list_events))
        .route("/events", post(api::create_event))
        .route("/events/{id}", get(api::get_event))
        .route("/events/{id}", put(api::update_event))
        .route("/events/{id}", delete(api::delete_event))
        // Tasks
        .route("/tasks", get(api::list_tasks))
        .route("/tasks", post(api::create_task))
        .route("/tasks/{id}", put(api::update_task))
        .route("/tasks/{id}", delete(api::delete_task))
        // Notifications
        .route("/notifications", get(api::list_notifications))
        // Calendar grids
        .route("/calendar/week", get(api::week_grid))
        .route("/calendar/month", get(api::month_grid))
        // Workflows
        .route("/workflows/meeting-completed", post(api::meeting_completed))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
