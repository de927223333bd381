// Domain entities and value objects
pub mod conversions;
pub mod health_entry;
pub mod person;

// Re-export common types for easier imports
pub use health_entry::{
    CreateHealthEntryRequest, HealthEntry, ImportReport, ImportRow, UpdateHealthEntryRequest,
};
pub use person::{Person, RegisterPersonRequest};
