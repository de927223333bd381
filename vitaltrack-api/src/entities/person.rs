use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use vitaltrack_domain::entities::person as domain;

/// Public representation of a registered person
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonResponse {
    /// Unique identifier for the person
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Age in years
    pub age: u16,

    /// Self-reported gender
    pub gender: String,

    /// Optional free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<domain::Person> for PersonResponse {
    fn from(person: domain::Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            age: person.age,
            gender: person.gender,
            description: person.description,
        }
    }
}

/// Request payload for registering a new person
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterPersonPayload {
    /// Display name, 1-100 characters
    pub name: String,

    /// Age in years, 1-130
    pub age: u16,

    /// Self-reported gender
    pub gender: String,

    /// Optional free-form description
    pub description: Option<String>,
}

impl From<RegisterPersonPayload> for domain::RegisterPersonRequest {
    fn from(payload: RegisterPersonPayload) -> Self {
        Self {
            name: payload.name,
            age: payload.age,
            gender: payload.gender,
            description: payload.description,
        }
    }
}
