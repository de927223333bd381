use serde::{Deserialize, Serialize};

/// Storage model for a recorded health entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthEntryRecord {
    /// Unique identifier for the entry
    pub id: String,

    /// Person the entry belongs to
    pub person_id: String,

    /// Systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: u16,

    /// Heart rate in beats per minute
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    pub tags: Option<String>,

    /// When the reading was taken, RFC 3339
    pub timestamp: String,
}

/// Input data for creating a new health entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHealthEntry {
    /// Person the entry belongs to
    pub person_id: String,

    /// Systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: u16,

    /// Heart rate in beats per minute
    pub heart_rate: u16,

    /// Optional free-form tags for categorizing the entry
    pub tags: Option<String>,

    /// When the reading was taken, RFC 3339
    pub timestamp: String,
}
