pub mod chart;
pub mod health;
pub mod health_entry;
pub mod person;

// Re-export handlers for easier imports
pub use chart::get_blood_pressure_chart;
pub use health::health_check;
pub use health_entry::{
    create_entry, delete_entry, get_entry, import_entries, list_entries, update_entry,
};
pub use person::{get_person, list_persons, register_person};
