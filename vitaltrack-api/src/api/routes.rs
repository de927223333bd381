use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::handlers::{chart, health, health_entry, person};
use crate::api::AppState;
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub async fn create_app() -> Router {
    debug!("Creating application router");

    let state = AppState::new();

    // Define specific routes before parametrized routes to avoid conflicts
    let api_routes = Router::new()
        .route("/entries/import", post(health_entry::import_entries))
        .route(
            "/entries",
            get(health_entry::list_entries).post(health_entry::create_entry),
        )
        .route(
            "/entries/:id",
            get(health_entry::get_entry)
                .put(health_entry::update_entry)
                .delete(health_entry::delete_entry),
        )
        .route(
            "/persons",
            get(person::list_persons).post(person::register_person),
        )
        .route("/persons/:id", get(person::get_person))
        .route("/chart/blood-pressure", get(chart::get_blood_pressure_chart));

    debug!("API routes configured");

    let public_routes = Router::new().route("/health", get(health::health_check));

    debug!("Public routes configured");

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(configure_swagger_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Initialize health check uptime tracking
    health::initialize_server_start_time();

    app
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Create a test application
    pub async fn create_test_app() -> Router {
        super::create_app().await
    }
}
