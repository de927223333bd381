// Public API entities
pub mod chart;
pub mod common;
pub mod health_entry;
pub mod person;

pub use common::ErrorResponse;
