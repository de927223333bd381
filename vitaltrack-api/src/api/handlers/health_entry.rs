use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use vitaltrack_domain::services::{EntryQuery, HealthEntryServiceError};

use crate::api::AppState;
use crate::entities::health_entry::{
    CreateHealthEntryPayload, HealthEntryResponse, ImportEntriesPayload, ImportReportResponse,
    UpdateHealthEntryPayload,
};
use crate::entities::ErrorResponse;

/// Query parameters for listing health entries
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListEntriesParams {
    /// Restrict to a single person
    pub person_id: Option<Uuid>,

    /// ISO 8601 start date (inclusive)
    pub start_date: Option<String>,

    /// ISO 8601 end date (inclusive)
    pub end_date: Option<String>,

    /// Maximum number of results (default: 100, max: 1000)
    pub limit: Option<usize>,

    /// Pagination offset (default: 0)
    pub offset: Option<usize>,

    /// Sort direction (asc/desc, default: desc)
    pub sort: Option<String>,
}

/// Paginated response for listing endpoints
#[derive(Serialize, ToSchema)]
#[aliases(EntryPaginatedResponse = PaginatedResponse<HealthEntryResponse>)]
pub struct PaginatedResponse<T> {
    /// Total count of items available
    pub total_count: usize,

    /// Current offset
    pub offset: usize,

    /// Current limit
    pub limit: usize,

    /// Actual data items
    pub data: Vec<T>,
}

/// Map service errors onto the API error envelope
fn entry_error(e: HealthEntryServiceError) -> ErrorResponse {
    match e {
        HealthEntryServiceError::Validation(msg) => {
            warn!("Invalid health entry data: {}", msg);
            ErrorResponse::validation_error(&msg)
        }
        HealthEntryServiceError::NotFound(id) => {
            info!("Health entry not found: {}", id);
            ErrorResponse::not_found("health entry")
        }
        HealthEntryServiceError::DuplicateTimestamp => {
            info!("Rejected duplicate entry timestamp");
            ErrorResponse::conflict("A record with the same date and time already exists")
        }
        HealthEntryServiceError::Repository(msg) => {
            error!("Repository failure: {}", msg);
            ErrorResponse::internal_error()
        }
    }
}

fn parse_date_param(raw: &str, name: &str) -> Result<DateTime<Utc>, ErrorResponse> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ErrorResponse::bad_request(&format!(
                "Invalid {} format. Use ISO 8601 (e.g. 2024-03-15T08:30:00Z)",
                name
            ))
        })
}

/// Record a new health entry
#[utoipa::path(
    post,
    path = "/api/v1/entries",
    request_body = CreateHealthEntryPayload,
    responses(
        (status = 201, description = "Health entry created", body = HealthEntryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Duplicate timestamp", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateHealthEntryPayload>,
) -> Result<impl IntoResponse, ErrorResponse> {
    info!("Creating new health entry");

    let entry = state
        .entries
        .create_entry(payload.into())
        .await
        .map_err(entry_error)?;

    info!("Health entry created with id: {}", entry.id);
    Ok((StatusCode::CREATED, Json(HealthEntryResponse::from(entry))))
}

/// Get a single health entry by id
#[utoipa::path(
    get,
    path = "/api/v1/entries/{id}",
    params(
        ("id" = Uuid, Path, description = "Health entry id")
    ),
    responses(
        (status = 200, description = "Health entry found", body = HealthEntryResponse),
        (status = 404, description = "Health entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let entry = state.entries.get_entry(id).await.map_err(entry_error)?;
    Ok((StatusCode::OK, Json(HealthEntryResponse::from(entry))))
}

/// Get paginated health entries, newest first by default
#[utoipa::path(
    get,
    path = "/api/v1/entries",
    params(
        ListEntriesParams
    ),
    responses(
        (status = 200, description = "Health entries retrieved", body = EntryPaginatedResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListEntriesParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let limit = params.limit.unwrap_or(100).min(1000); // Cap at 1000
    let offset = params.offset.unwrap_or(0);

    // Default to sorting by most recent if not specified
    let sort_desc = !matches!(params.sort.as_deref(), Some("asc"));

    let start_date = params
        .start_date
        .as_deref()
        .map(|raw| parse_date_param(raw, "start_date"))
        .transpose()?;
    let end_date = params
        .end_date
        .as_deref()
        .map(|raw| parse_date_param(raw, "end_date"))
        .transpose()?;

    let (entries, total_count) = state
        .entries
        .list_entries(EntryQuery {
            person_id: params.person_id,
            start_date,
            end_date,
            limit: Some(limit),
            offset: Some(offset),
            sort_desc: Some(sort_desc),
        })
        .await
        .map_err(entry_error)?;

    let response = PaginatedResponse {
        total_count,
        offset,
        limit,
        data: entries
            .into_iter()
            .map(HealthEntryResponse::from)
            .collect::<Vec<_>>(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Replace an existing health entry
#[utoipa::path(
    put,
    path = "/api/v1/entries/{id}",
    params(
        ("id" = Uuid, Path, description = "Health entry id")
    ),
    request_body = UpdateHealthEntryPayload,
    responses(
        (status = 200, description = "Health entry updated", body = HealthEntryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Health entry not found", body = ErrorResponse),
        (status = 409, description = "Duplicate timestamp", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHealthEntryPayload>,
) -> Result<impl IntoResponse, ErrorResponse> {
    info!("Updating health entry {}", id);

    let entry = state
        .entries
        .update_entry(id, payload.into())
        .await
        .map_err(entry_error)?;

    Ok((StatusCode::OK, Json(HealthEntryResponse::from(entry))))
}

/// Delete a health entry
#[utoipa::path(
    delete,
    path = "/api/v1/entries/{id}",
    params(
        ("id" = Uuid, Path, description = "Health entry id")
    ),
    responses(
        (status = 204, description = "Health entry deleted"),
        (status = 404, description = "Health entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ErrorResponse> {
    info!("Deleting health entry {}", id);

    state.entries.delete_entry(id).await.map_err(entry_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk-import entries for one person, skipping duplicates by timestamp
#[utoipa::path(
    post,
    path = "/api/v1/entries/import",
    request_body = ImportEntriesPayload,
    responses(
        (status = 200, description = "Import processed", body = ImportReportResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state, payload))]
pub async fn import_entries(
    State(state): State<AppState>,
    Json(payload): Json<ImportEntriesPayload>,
) -> Result<impl IntoResponse, ErrorResponse> {
    info!(
        "Importing {} rows for person {}",
        payload.rows.len(),
        payload.person_id
    );

    let rows = payload.rows.into_iter().map(Into::into).collect();
    let report = state
        .entries
        .import_entries(payload.person_id, rows)
        .await
        .map_err(entry_error)?;

    Ok((StatusCode::OK, Json(ImportReportResponse::from(report))))
}
