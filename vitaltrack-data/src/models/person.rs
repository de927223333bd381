use serde::{Deserialize, Serialize};

/// Storage model for a registered person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Unique identifier for the person
    pub id: String,

    /// Display name
    pub name: String,

    /// Age in years
    pub age: u16,

    /// Self-reported gender
    pub gender: String,

    /// Optional free-form description
    pub description: Option<String>,
}

/// Input data for registering a new person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
    /// Display name
    pub name: String,

    /// Age in years
    pub age: u16,

    /// Self-reported gender
    pub gender: String,

    /// Optional free-form description
    pub description: Option<String>,
}
