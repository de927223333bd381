// Storage models for the data layer
pub mod health_entry;
pub mod person;

pub use health_entry::{HealthEntryRecord, NewHealthEntry};
pub use person::{NewPerson, PersonRecord};
