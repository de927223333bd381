pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::Router;

use vitaltrack_domain::services::{
    create_default_health_entry_service, create_default_person_service, HealthEntryServiceTrait,
    PersonServiceTrait,
};

/// Service handle types for dependency injection
pub type EntryService = Arc<dyn HealthEntryServiceTrait + Send + Sync>;
pub type PersonService = Arc<dyn PersonServiceTrait + Send + Sync>;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub entries: EntryService,
    pub persons: PersonService,
}

impl AppState {
    /// Create the default state. Both services share one fallback store
    /// so entry validation sees persons registered through the same app.
    pub fn new() -> Self {
        let store = vitaltrack_data::repository::InMemoryStore::new();
        Self {
            entries: Arc::new(create_default_health_entry_service(store.clone())),
            persons: Arc::new(create_default_person_service(store)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the application router
pub async fn create_application() -> Router {
    routes::create_app().await
}
