use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use vitaltrack_domain::entities::health_entry as domain;

/// Public representation of a recorded health entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthEntryResponse {
    /// Unique identifier for the entry
    pub id: Uuid,

    /// Person the entry belongs to
    pub person_id: Uuid,

    /// Systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: u16,

    /// Heart rate in beats per minute
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

impl From<domain::HealthEntry> for HealthEntryResponse {
    fn from(entry: domain::HealthEntry) -> Self {
        Self {
            id: entry.id,
            person_id: entry.person_id,
            systolic: entry.systolic,
            diastolic: entry.diastolic,
            heart_rate: entry.heart_rate,
            tags: entry.tags,
            timestamp: entry.timestamp,
        }
    }
}

/// Request payload for recording a new health entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateHealthEntryPayload {
    /// Person the entry belongs to
    pub person_id: Uuid,

    /// Systolic blood pressure, 100-200
    pub systolic: u16,

    /// Diastolic blood pressure, 60-160
    pub diastolic: u16,

    /// Heart rate in beats per minute, 50-200
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    pub tags: Option<String>,

    /// When the reading was taken. Defaults to the current time if not provided.
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<CreateHealthEntryPayload> for domain::CreateHealthEntryRequest {
    fn from(payload: CreateHealthEntryPayload) -> Self {
        Self {
            person_id: payload.person_id,
            systolic: payload.systolic,
            diastolic: payload.diastolic,
            heart_rate: payload.heart_rate,
            tags: payload.tags,
            timestamp: payload.timestamp,
        }
    }
}

/// Request payload for replacing an existing health entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateHealthEntryPayload {
    /// Person the entry belongs to
    pub person_id: Uuid,

    /// Systolic blood pressure, 100-200
    pub systolic: u16,

    /// Diastolic blood pressure, 60-160
    pub diastolic: u16,

    /// Heart rate in beats per minute, 50-200
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    pub tags: Option<String>,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

impl From<UpdateHealthEntryPayload> for domain::UpdateHealthEntryRequest {
    fn from(payload: UpdateHealthEntryPayload) -> Self {
        Self {
            person_id: payload.person_id,
            systolic: payload.systolic,
            diastolic: payload.diastolic,
            heart_rate: payload.heart_rate,
            tags: payload.tags,
            timestamp: payload.timestamp,
        }
    }
}

/// Request payload for bulk-importing entries for one person
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportEntriesPayload {
    /// Person the entries belong to
    pub person_id: Uuid,

    /// Rows to import
    pub rows: Vec<ImportRowPayload>,
}

/// One row of a bulk import batch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportRowPayload {
    /// Systolic blood pressure, 100-200
    pub systolic: u16,

    /// Diastolic blood pressure, 60-160
    pub diastolic: u16,

    /// Heart rate in beats per minute, 50-200
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    pub tags: Option<String>,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

impl From<ImportRowPayload> for domain::ImportRow {
    fn from(payload: ImportRowPayload) -> Self {
        Self {
            systolic: payload.systolic,
            diastolic: payload.diastolic,
            heart_rate: payload.heart_rate,
            tags: payload.tags,
            timestamp: payload.timestamp,
        }
    }
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportReportResponse {
    /// Rows stored successfully
    pub imported: usize,

    /// Rows skipped because the person already had an entry at that timestamp
    pub skipped: usize,

    /// Rows rejected by validation
    pub failed: usize,

    /// One message per rejected row
    pub errors: Vec<String>,
}

impl From<domain::ImportReport> for ImportReportResponse {
    fn from(report: domain::ImportReport) -> Self {
        Self {
            imported: report.imported,
            skipped: report.skipped,
            failed: report.failed,
            errors: report.errors,
        }
    }
}
