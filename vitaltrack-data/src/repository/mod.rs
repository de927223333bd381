// Repository module structure
pub mod errors;
mod health_entry;
mod in_memory;
mod person;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use health_entry::{EntryFilter, HealthEntryRepository, HealthEntryRepositoryTrait};
pub use in_memory::InMemoryStore;
pub use person::{PersonRepository, PersonRepositoryTrait};

// Re-export mock repositories for both testing and when the mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use health_entry::tests as health_entry_mock;
#[cfg(any(test, feature = "mock"))]
pub use person::tests as person_mock;
