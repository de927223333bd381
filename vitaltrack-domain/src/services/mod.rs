// Domain services
// This module contains business logic implementations.

pub mod chart;
pub mod health_entry;
pub mod person;

// Re-export service traits and factory functions
pub use health_entry::{
    create_default_health_entry_service, EntryQuery, HealthEntryServiceError,
    HealthEntryServiceTrait,
};
pub use person::{create_default_person_service, PersonServiceError, PersonServiceTrait};
