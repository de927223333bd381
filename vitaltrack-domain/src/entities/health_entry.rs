use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A recorded blood-pressure and heart-rate observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthEntry {
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
    pub tags: Option<String>,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

/// Request payload for recording a new health entry
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHealthEntryRequest {
    /// Person the entry belongs to
    pub person_id: Uuid,

    /// Systolic blood pressure (the higher number)
    #[validate(range(min = 100, max = 200, message = "Systolic pressure must be between 100-200"))]
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    #[validate(range(min = 60, max = 160, message = "Diastolic pressure must be between 60-160"))]
    pub diastolic: u16,

    /// Heart rate in beats per minute
    #[validate(range(min = 50, max = 200, message = "Heart rate must be between 50-200"))]
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    #[validate(length(max = 100, message = "Tags cannot exceed 100 characters"))]
    pub tags: Option<String>,

    /// When the reading was taken. Defaults to the current time if not provided.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Request payload for replacing an existing health entry
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateHealthEntryRequest {
    /// Person the entry belongs to
    pub person_id: Uuid,

    /// Systolic blood pressure (the higher number)
    #[validate(range(min = 100, max = 200, message = "Systolic pressure must be between 100-200"))]
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    #[validate(range(min = 60, max = 160, message = "Diastolic pressure must be between 60-160"))]
    pub diastolic: u16,

    /// Heart rate in beats per minute
    #[validate(range(min = 50, max = 200, message = "Heart rate must be between 50-200"))]
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    #[validate(length(max = 100, message = "Tags cannot exceed 100 characters"))]
    pub tags: Option<String>,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

/// One row of a bulk import batch
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportRow {
    /// Systolic blood pressure (the higher number)
    #[validate(range(min = 100, max = 200, message = "Systolic pressure must be between 100-200"))]
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    #[validate(range(min = 60, max = 160, message = "Diastolic pressure must be between 60-160"))]
    pub diastolic: u16,

    /// Heart rate in beats per minute
    #[validate(range(min = 50, max = 200, message = "Heart rate must be between 50-200"))]
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    #[validate(length(max = 100, message = "Tags cannot exceed 100 characters"))]
    pub tags: Option<String>,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows stored successfully
    pub imported: usize,

    /// Rows skipped because the person already had an entry at that timestamp
    pub skipped: usize,

    /// Rows rejected by validation
    pub failed: usize,

    /// One message per rejected row
    pub errors: Vec<String>,
}
