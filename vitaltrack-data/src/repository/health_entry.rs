use async_trait::async_trait;
use tracing::{debug, error};
use uuid::Uuid;

use crate::database::get_db_pool;
use crate::models::{HealthEntryRecord, NewHealthEntry};

use super::errors::RepositoryError;
use super::in_memory::InMemoryStore;
use super::storage::DatabaseStorage;

/// Filter for querying health entries
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Restrict to a single person
    pub person_id: Option<String>,

    /// RFC 3339 inclusive lower bound on timestamp
    pub start_date: Option<String>,

    /// RFC 3339 inclusive upper bound on timestamp
    pub end_date: Option<String>,

    /// Maximum number of results
    pub limit: Option<usize>,

    /// Pagination offset
    pub offset: Option<usize>,

    /// Sort newest first when true (the default)
    pub sort_desc: Option<bool>,
}

/// Repository trait for health entries
#[async_trait]
pub trait HealthEntryRepositoryTrait {
    /// Create a new health entry from a request
    async fn create(&self, request: NewHealthEntry) -> Result<HealthEntryRecord, RepositoryError>;

    /// Replace an existing entry; fails with `NotFound` when the id is unknown
    async fn update(&self, entry: HealthEntryRecord) -> Result<HealthEntryRecord, RepositoryError>;

    /// Get filtered entries together with the pre-pagination total
    async fn get_filtered(
        &self,
        filter: EntryFilter,
    ) -> Result<(Vec<HealthEntryRecord>, usize), RepositoryError>;

    /// Get an entry by id
    async fn get_by_id(&self, id: Uuid) -> Result<Option<HealthEntryRecord>, RepositoryError>;

    /// Delete an entry by id, reporting whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Check whether a person already has an entry at the given timestamp,
    /// optionally ignoring one entry id (used when updating)
    async fn exists_at_timestamp(
        &self,
        person_id: &str,
        timestamp: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, RepositoryError>;
}

/// Repository for health entries backed by SQLite, with in-memory
/// fallback when the database pool is unavailable.
#[derive(Debug, Clone, Default)]
pub struct HealthEntryRepository {
    storage: InMemoryStore,
}

impl HealthEntryRepository {
    /// Create a new repository with its own fallback store
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    /// Create a repository sharing an existing fallback store
    pub fn with_store(storage: InMemoryStore) -> Self {
        Self { storage }
    }

    /// Replace an entry in the fallback store, failing when the id is unknown
    async fn update_in_store(
        &self,
        entry: HealthEntryRecord,
    ) -> Result<HealthEntryRecord, RepositoryError> {
        if self.storage.get_entry_by_id(&entry.id).await?.is_none() {
            return Err(RepositoryError::NotFound(entry.id));
        }
        self.storage.store_entry(&entry).await
    }
}

#[async_trait]
impl HealthEntryRepositoryTrait for HealthEntryRepository {
    async fn create(&self, request: NewHealthEntry) -> Result<HealthEntryRecord, RepositoryError> {
        let entry = HealthEntryRecord {
            id: Uuid::new_v4().to_string(),
            person_id: request.person_id,
            systolic: request.systolic,
            diastolic: request.diastolic,
            heart_rate: request.heart_rate,
            tags: request.tags,
            timestamp: request.timestamp,
        };

        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::store_entry(&pool, &entry).await {
                Ok(_) => Ok(entry),
                Err(e) => {
                    error!("Failed to store entry in database: {}", e);
                    self.storage.store_entry(&entry).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store_entry(&entry).await
            }
        }
    }

    async fn update(&self, entry: HealthEntryRecord) -> Result<HealthEntryRecord, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::update_entry(&pool, &entry).await {
                Ok(true) => Ok(entry),
                Ok(false) => Err(RepositoryError::NotFound(entry.id)),
                Err(e) => {
                    error!("Failed to update entry in database: {}", e);
                    self.update_in_store(entry).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for update", e);
                self.update_in_store(entry).await
            }
        }
    }

    async fn get_filtered(
        &self,
        filter: EntryFilter,
    ) -> Result<(Vec<HealthEntryRecord>, usize), RepositoryError> {
        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::get_entries(&pool, &filter).await {
                Ok(result) => Ok(result),
                Err(e) => {
                    error!("Failed to get entries from database: {}", e);
                    self.storage.get_entries(&filter).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_filtered", e);
                self.storage.get_entries(&filter).await
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<HealthEntryRecord>, RepositoryError> {
        let id = id.to_string();
        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::get_entry_by_id(&pool, &id).await {
                Ok(entry) => Ok(entry),
                Err(e) => {
                    error!("Failed to get entry by id from database: {}", e);
                    self.storage.get_entry_by_id(&id).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get_by_id", e);
                self.storage.get_entry_by_id(&id).await
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let id = id.to_string();
        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::delete_entry(&pool, &id).await {
                Ok(deleted) => Ok(deleted),
                Err(e) => {
                    error!("Failed to delete entry from database: {}", e);
                    self.storage.delete_entry(&id).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for delete", e);
                self.storage.delete_entry(&id).await
            }
        }
    }

    async fn exists_at_timestamp(
        &self,
        person_id: &str,
        timestamp: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, RepositoryError> {
        let exclude = exclude_id.map(|id| id.to_string());
        match get_db_pool() {
            Ok(pool) => {
                match DatabaseStorage::entry_exists_at(&pool, person_id, timestamp, exclude.as_deref())
                    .await
                {
                    Ok(exists) => Ok(exists),
                    Err(e) => {
                        error!("Failed duplicate check in database: {}", e);
                        self.storage
                            .entry_exists_at(person_id, timestamp, exclude.as_deref())
                            .await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for duplicate check", e);
                self.storage
                    .entry_exists_at(person_id, timestamp, exclude.as_deref())
                    .await
            }
        }
    }
}

/// Mock health entry repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;

    /// Mock implementation of `HealthEntryRepositoryTrait` backed by a plain
    /// in-memory store, never touching the database pool.
    #[derive(Debug, Clone, Default)]
    pub struct MockHealthEntryRepository {
        storage: InMemoryStore,
    }

    impl MockHealthEntryRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository sharing an existing store
        pub fn with_store(storage: InMemoryStore) -> Self {
            Self { storage }
        }

        /// Create a mock repository with predefined entries
        pub async fn with_entries(entries: Vec<HealthEntryRecord>) -> Self {
            let repo = Self::default();
            for entry in &entries {
                repo.storage
                    .store_entry(entry)
                    .await
                    .expect("in-memory store cannot fail");
            }
            repo
        }
    }

    #[async_trait]
    impl HealthEntryRepositoryTrait for MockHealthEntryRepository {
        async fn create(
            &self,
            request: NewHealthEntry,
        ) -> Result<HealthEntryRecord, RepositoryError> {
            let entry = HealthEntryRecord {
                id: Uuid::new_v4().to_string(),
                person_id: request.person_id,
                systolic: request.systolic,
                diastolic: request.diastolic,
                heart_rate: request.heart_rate,
                tags: request.tags,
                timestamp: request.timestamp,
            };
            self.storage.store_entry(&entry).await
        }

        async fn update(
            &self,
            entry: HealthEntryRecord,
        ) -> Result<HealthEntryRecord, RepositoryError> {
            if self.storage.get_entry_by_id(&entry.id).await?.is_none() {
                return Err(RepositoryError::NotFound(entry.id));
            }
            self.storage.store_entry(&entry).await
        }

        async fn get_filtered(
            &self,
            filter: EntryFilter,
        ) -> Result<(Vec<HealthEntryRecord>, usize), RepositoryError> {
            self.storage.get_entries(&filter).await
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<HealthEntryRecord>, RepositoryError> {
            self.storage.get_entry_by_id(&id.to_string()).await
        }

        async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
            self.storage.delete_entry(&id.to_string()).await
        }

        async fn exists_at_timestamp(
            &self,
            person_id: &str,
            timestamp: &str,
            exclude_id: Option<Uuid>,
        ) -> Result<bool, RepositoryError> {
            let exclude = exclude_id.map(|id| id.to_string());
            self.storage
                .entry_exists_at(person_id, timestamp, exclude.as_deref())
                .await
        }
    }
}

#[cfg(test)]
mod repository_tests {
    use super::*;

    fn new_request(timestamp: &str) -> NewHealthEntry {
        NewHealthEntry {
            person_id: "person-1".to_string(),
            systolic: 120,
            diastolic: 80,
            heart_rate: 72,
            tags: None,
            timestamp: timestamp.to_string(),
        }
    }

    // The global pool is never initialized in this test binary, so
    // every operation below exercises the in-memory fallback path.
    #[tokio::test]
    async fn test_update_falls_back_to_in_memory_store() {
        let repo = HealthEntryRepository::new();
        let created = repo
            .create(new_request("2024-01-01T08:00:00+00:00"))
            .await
            .unwrap();

        let mut changed = created.clone();
        changed.systolic = 135;
        let updated = repo.update(changed).await.unwrap();
        assert_eq!(updated.systolic, 135);

        let loaded = repo
            .get_by_id(created.id.parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.systolic, 135);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let repo = HealthEntryRepository::new();

        let entry = HealthEntryRecord {
            id: Uuid::new_v4().to_string(),
            person_id: "person-1".to_string(),
            systolic: 120,
            diastolic: 80,
            heart_rate: 72,
            tags: None,
            timestamp: "2024-01-01T08:00:00+00:00".to_string(),
        };

        let result = repo.update(entry).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
