use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Health entry endpoints
        crate::api::handlers::health_entry::create_entry,
        crate::api::handlers::health_entry::get_entry,
        crate::api::handlers::health_entry::list_entries,
        crate::api::handlers::health_entry::update_entry,
        crate::api::handlers::health_entry::delete_entry,
        crate::api::handlers::health_entry::import_entries,

        // Person endpoints
        crate::api::handlers::person::register_person,
        crate::api::handlers::person::list_persons,
        crate::api::handlers::person::get_person,

        // Chart endpoints
        crate::api::handlers::chart::get_blood_pressure_chart,
    ),
    components(
        schemas(
            // Entities
            crate::entities::health_entry::HealthEntryResponse,
            crate::entities::health_entry::CreateHealthEntryPayload,
            crate::entities::health_entry::UpdateHealthEntryPayload,
            crate::entities::health_entry::ImportEntriesPayload,
            crate::entities::health_entry::ImportRowPayload,
            crate::entities::health_entry::ImportReportResponse,
            crate::entities::person::PersonResponse,
            crate::entities::person::RegisterPersonPayload,
            crate::entities::chart::ChartResponse,
            crate::entities::chart::ChartPoint,
            crate::entities::chart::AxisRange,
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Health entry handlers
            crate::api::handlers::health_entry::EntryPaginatedResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "entries", description = "Health entry management endpoints"),
        (name = "persons", description = "Person registry endpoints"),
        (name = "chart", description = "Chart data endpoints")
    ),
    info(
        title = "VitalTrack API",
        version = "0.1.0",
        description = "API for recording blood pressure readings and charting daily averages",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
