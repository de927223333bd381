use async_trait::async_trait;
use tracing::{debug, error};
use uuid::Uuid;

use crate::database::get_db_pool;
use crate::models::{NewPerson, PersonRecord};

use super::errors::RepositoryError;
use super::in_memory::InMemoryStore;
use super::storage::DatabaseStorage;

/// Repository trait for registered persons
#[async_trait]
pub trait PersonRepositoryTrait {
    /// Register a new person
    async fn create(&self, request: NewPerson) -> Result<PersonRecord, RepositoryError>;

    /// Get all persons, sorted by name
    async fn get_all(&self) -> Result<Vec<PersonRecord>, RepositoryError>;

    /// Get a person by id
    async fn get_by_id(&self, id: Uuid) -> Result<Option<PersonRecord>, RepositoryError>;
}

/// Repository for persons backed by SQLite, with in-memory fallback
/// when the database pool is unavailable.
#[derive(Debug, Clone, Default)]
pub struct PersonRepository {
    storage: InMemoryStore,
}

impl PersonRepository {
    /// Create a new repository with its own fallback store
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    /// Create a repository sharing an existing fallback store
    pub fn with_store(storage: InMemoryStore) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl PersonRepositoryTrait for PersonRepository {
    async fn create(&self, request: NewPerson) -> Result<PersonRecord, RepositoryError> {
        let person = PersonRecord {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            age: request.age,
            gender: request.gender,
            description: request.description,
        };

        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::store_person(&pool, &person).await {
                Ok(_) => Ok(person),
                Err(e) => {
                    error!("Failed to store person in database: {}", e);
                    self.storage.store_person(&person).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_person(&person).await
            }
        }
    }

    async fn get_all(&self) -> Result<Vec<PersonRecord>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::get_persons(&pool).await {
                Ok(persons) => Ok(persons),
                Err(e) => {
                    error!("Failed to get persons from database: {}", e);
                    self.storage.get_persons().await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_all", e);
                self.storage.get_persons().await
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<PersonRecord>, RepositoryError> {
        let id = id.to_string();
        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::get_person_by_id(&pool, &id).await {
                Ok(person) => Ok(person),
                Err(e) => {
                    error!("Failed to get person by id from database: {}", e);
                    self.storage.get_person_by_id(&id).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_by_id", e);
                self.storage.get_person_by_id(&id).await
            }
        }
    }
}

/// Mock person repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;

    /// Mock implementation of `PersonRepositoryTrait` backed by a plain
    /// in-memory store, never touching the database pool.
    #[derive(Debug, Clone, Default)]
    pub struct MockPersonRepository {
        storage: InMemoryStore,
    }

    impl MockPersonRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository sharing an existing store
        pub fn with_store(storage: InMemoryStore) -> Self {
            Self { storage }
        }

        /// Create a mock repository with predefined persons
        pub async fn with_persons(persons: Vec<PersonRecord>) -> Self {
            let repo = Self::default();
            for person in &persons {
                repo.storage
                    .store_person(person)
                    .await
                    .expect("in-memory store cannot fail");
            }
            repo
        }
    }

    #[async_trait]
    impl PersonRepositoryTrait for MockPersonRepository {
        async fn create(&self, request: NewPerson) -> Result<PersonRecord, RepositoryError> {
            let person = PersonRecord {
                id: Uuid::new_v4().to_string(),
                name: request.name,
                age: request.age,
                gender: request.gender,
                description: request.description,
            };
            self.storage.store_person(&person).await
        }

        async fn get_all(&self) -> Result<Vec<PersonRecord>, RepositoryError> {
            self.storage.get_persons().await
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<PersonRecord>, RepositoryError> {
            self.storage.get_person_by_id(&id.to_string()).await
        }
    }
}
