use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, instrument, warn};
use utoipa::IntoParams;
use uuid::Uuid;

use vitaltrack_domain::services::chart::aggregate_daily;
use vitaltrack_domain::services::{EntryQuery, HealthEntryServiceError};

use crate::api::AppState;
use crate::entities::chart::ChartResponse;
use crate::entities::ErrorResponse;

/// Query parameters for the blood pressure chart
#[derive(Debug, Deserialize, IntoParams)]
pub struct ChartQueryParams {
    /// Person to chart
    pub person_id: Uuid,

    /// ISO 8601 start date (inclusive)
    pub start_date: Option<String>,

    /// ISO 8601 end date (inclusive)
    pub end_date: Option<String>,
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

/// Daily-averaged blood pressure series for one person
#[utoipa::path(
    get,
    path = "/api/v1/chart/blood-pressure",
    params(
        ChartQueryParams
    ),
    responses(
        (status = 200, description = "Chart data retrieved", body = ChartResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "chart"
)]
#[instrument(skip(state))]
pub async fn get_blood_pressure_chart(
    State(state): State<AppState>,
    Query(params): Query<ChartQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
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

    // Fetch the full range in chronological order; aggregation wants every
    // reading, not one page of them.
    let (entries, _total) = state
        .entries
        .list_entries(EntryQuery {
            person_id: Some(params.person_id),
            start_date,
            end_date,
            limit: None,
            offset: None,
            sort_desc: Some(false),
        })
        .await
        .map_err(|e| match e {
            HealthEntryServiceError::Validation(msg) => {
                warn!("Invalid chart query: {}", msg);
                ErrorResponse::validation_error(&msg)
            }
            other => {
                error!("Failed to load chart entries: {}", other);
                ErrorResponse::internal_error()
            }
        })?;

    let mut timestamps = Vec::with_capacity(entries.len());
    let mut systolic = Vec::with_capacity(entries.len());
    let mut diastolic = Vec::with_capacity(entries.len());
    for entry in &entries {
        timestamps.push(entry.timestamp);
        systolic.push(entry.systolic);
        diastolic.push(entry.diastolic);
    }

    let series = aggregate_daily(&timestamps, &systolic, &diastolic).map_err(|e| {
        error!("Chart aggregation failed: {}", e);
        ErrorResponse::internal_error()
    })?;

    Ok((StatusCode::OK, Json(ChartResponse::from(series))))
}
