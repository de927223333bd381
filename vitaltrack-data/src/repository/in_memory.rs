use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::{HealthEntryRecord, PersonRecord};

use super::errors::RepositoryError;
use super::health_entry::EntryFilter;

/// In-memory storage used when the database pool is unavailable.
/// Clones share the same underlying maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, HealthEntryRecord>>>,
    persons: Arc<Mutex<HashMap<String, PersonRecord>>>,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry, replacing any entry with the same id
    pub async fn store_entry(
        &self,
        entry: &HealthEntryRecord,
    ) -> Result<HealthEntryRecord, RepositoryError> {
        let mut store = self.entries.lock()?;
        store.insert(entry.id.clone(), entry.clone());
        Ok(entry.clone())
    }

    /// Get filtered entries together with the pre-pagination total
    pub async fn get_entries(
        &self,
        filter: &EntryFilter,
    ) -> Result<(Vec<HealthEntryRecord>, usize), RepositoryError> {
        let store = self.entries.lock()?;
        let sort_desc = filter.sort_desc.unwrap_or(true);

        let mut entries: Vec<HealthEntryRecord> = store
            .values()
            .filter(|entry| {
                if let Some(ref person_id) = filter.person_id {
                    if entry.person_id != *person_id {
                        return false;
                    }
                }

                if let Some(ref start) = filter.start_date {
                    if entry.timestamp.as_str() < start.as_str() {
                        return false;
                    }
                }

                if let Some(ref end) = filter.end_date {
                    if entry.timestamp.as_str() > end.as_str() {
                        return false;
                    }
                }

                true
            })
            .cloned()
            .collect();

        entries.sort_by(|a, b| {
            let cmp = a.timestamp.cmp(&b.timestamp);
            if sort_desc {
                cmp.reverse()
            } else {
                cmp
            }
        });

        let total = entries.len();
        let offset = filter.offset.unwrap_or(0);
        let limit = filter.limit.unwrap_or(total);

        let page = entries.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }

    /// Get an entry by id
    pub async fn get_entry_by_id(
        &self,
        id: &str,
    ) -> Result<Option<HealthEntryRecord>, RepositoryError> {
        let store = self.entries.lock()?;
        Ok(store.get(id).cloned())
    }

    /// Delete an entry by id, reporting whether it existed
    pub async fn delete_entry(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.entries.lock()?;
        Ok(store.remove(id).is_some())
    }

    /// Check whether a person already has an entry at the given timestamp,
    /// optionally ignoring one entry id (used when updating)
    pub async fn entry_exists_at(
        &self,
        person_id: &str,
        timestamp: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let store = self.entries.lock()?;
        Ok(store.values().any(|entry| {
            entry.person_id == person_id
                && entry.timestamp == timestamp
                && exclude_id != Some(entry.id.as_str())
        }))
    }

    /// Store a person, replacing any person with the same id
    pub async fn store_person(
        &self,
        person: &PersonRecord,
    ) -> Result<PersonRecord, RepositoryError> {
        let mut store = self.persons.lock()?;
        store.insert(person.id.clone(), person.clone());
        Ok(person.clone())
    }

    /// Get all persons, sorted by name
    pub async fn get_persons(&self) -> Result<Vec<PersonRecord>, RepositoryError> {
        let store = self.persons.lock()?;
        let mut persons: Vec<PersonRecord> = store.values().cloned().collect();
        persons.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(persons)
    }

    /// Get a person by id
    pub async fn get_person_by_id(
        &self,
        id: &str,
    ) -> Result<Option<PersonRecord>, RepositoryError> {
        let store = self.persons.lock()?;
        Ok(store.get(id).cloned())
    }
}
