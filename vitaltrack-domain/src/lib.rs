// VitalTrack Domain
// This crate contains the business logic for the VitalTrack health tracker

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Re-export the database module from vitaltrack_data for convenience
pub use vitaltrack_data::database;
