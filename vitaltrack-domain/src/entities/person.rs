use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered person whose readings are tracked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier for the person
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Age in years
    pub age: u16,

    /// Self-reported gender
    pub gender: String,

    /// Optional free-form description
    pub description: Option<String>,
}

/// Request payload for registering a new person
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPersonRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    /// Age in years
    #[validate(range(min = 1, max = 130, message = "Age must be between 1 and 130"))]
    pub age: u16,

    /// Self-reported gender
    #[validate(length(min = 1, max = 10, message = "Gender must be between 1 and 10 characters"))]
    pub gender: String,

    /// Optional free-form description
    #[validate(length(max = 255, message = "Description cannot exceed 255 characters"))]
    pub description: Option<String>,
}
