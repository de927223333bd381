use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use vitaltrack_data::repository::{
    EntryFilter, HealthEntryRepositoryTrait, PersonRepositoryTrait, RepositoryError,
};

use crate::entities::conversions;
use crate::entities::health_entry::{
    CreateHealthEntryRequest, HealthEntry, ImportReport, ImportRow, UpdateHealthEntryRequest,
};

/// Health entry service errors
#[derive(Debug, Error)]
pub enum HealthEntryServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Duplicate timestamp error
    #[error("A record with the same date and time already exists")]
    DuplicateTimestamp,

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),
}

/// Domain-level query for listing entries
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    /// Restrict to a single person
    pub person_id: Option<Uuid>,

    /// Inclusive lower bound on timestamp
    pub start_date: Option<DateTime<Utc>>,

    /// Inclusive upper bound on timestamp
    pub end_date: Option<DateTime<Utc>>,

    /// Maximum number of results
    pub limit: Option<usize>,

    /// Pagination offset
    pub offset: Option<usize>,

    /// Sort newest first when true (the default)
    pub sort_desc: Option<bool>,
}

impl EntryQuery {
    fn into_filter(self) -> EntryFilter {
        EntryFilter {
            person_id: self.person_id.map(|id| id.to_string()),
            start_date: self.start_date.map(|dt| dt.to_rfc3339()),
            end_date: self.end_date.map(|dt| dt.to_rfc3339()),
            limit: self.limit,
            offset: self.offset,
            sort_desc: self.sort_desc,
        }
    }
}

/// Trait for health entry service operations
#[async_trait]
pub trait HealthEntryServiceTrait {
    /// Record a new health entry
    async fn create_entry(
        &self,
        request: CreateHealthEntryRequest,
    ) -> Result<HealthEntry, HealthEntryServiceError>;

    /// Get a health entry by id
    async fn get_entry(&self, id: Uuid) -> Result<HealthEntry, HealthEntryServiceError>;

    /// Get filtered health entries together with the pre-pagination total
    async fn list_entries(
        &self,
        query: EntryQuery,
    ) -> Result<(Vec<HealthEntry>, usize), HealthEntryServiceError>;

    /// Replace an existing health entry
    async fn update_entry(
        &self,
        id: Uuid,
        request: UpdateHealthEntryRequest,
    ) -> Result<HealthEntry, HealthEntryServiceError>;

    /// Delete a health entry
    async fn delete_entry(&self, id: Uuid) -> Result<(), HealthEntryServiceError>;

    /// Bulk-import entries for one person, skipping duplicates by timestamp
    async fn import_entries(
        &self,
        person_id: Uuid,
        rows: Vec<ImportRow>,
    ) -> Result<ImportReport, HealthEntryServiceError>;
}

/// Health entry service for domain logic
pub struct HealthEntryService<R, P> {
    entries: R,
    persons: P,
}

impl<R, P> HealthEntryService<R, P>
where
    R: HealthEntryRepositoryTrait,
    P: PersonRepositoryTrait,
{
    /// Create a new health entry service
    pub fn new(entries: R, persons: P) -> Self {
        Self { entries, persons }
    }

    /// Map repository errors to service errors
    fn map_repo_error(err: RepositoryError) -> HealthEntryServiceError {
        match err {
            RepositoryError::NotFound(msg) => HealthEntryServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => HealthEntryServiceError::Validation(msg),
            RepositoryError::Duplicate(_) => HealthEntryServiceError::DuplicateTimestamp,
            _ => HealthEntryServiceError::Repository(err.to_string()),
        }
    }

    /// Render validator errors the way the API reports them
    fn collect_validation_errors(errors: validator::ValidationErrors) -> HealthEntryServiceError {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|err| match &err.message {
                        Some(msg) => msg.to_string(),
                        None => format!("Invalid {}", field),
                    })
                    .collect();
                format!("{}: {}", field, msgs.join(", "))
            })
            .collect::<Vec<String>>()
            .join("; ");

        HealthEntryServiceError::Validation(message)
    }

    /// Reading-level checks shared by create, update and import
    fn check_reading(systolic: u16, diastolic: u16) -> Result<(), HealthEntryServiceError> {
        if systolic <= diastolic {
            return Err(HealthEntryServiceError::Validation(
                "Systolic pressure must be greater than diastolic pressure".to_string(),
            ));
        }
        Ok(())
    }

    /// Fail unless the person is registered
    async fn require_person(&self, person_id: Uuid) -> Result<(), HealthEntryServiceError> {
        let person = self
            .persons
            .get_by_id(person_id)
            .await
            .map_err(Self::map_repo_error)?;

        if person.is_none() {
            return Err(HealthEntryServiceError::Validation(format!(
                "Unknown person: {}",
                person_id
            )));
        }
        Ok(())
    }

    /// Fail when the person already has an entry at this timestamp
    async fn require_unique_timestamp(
        &self,
        person_id: Uuid,
        timestamp: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> Result<(), HealthEntryServiceError> {
        let exists = self
            .entries
            .exists_at_timestamp(
                &person_id.to_string(),
                &timestamp.to_rfc3339(),
                exclude_id,
            )
            .await
            .map_err(Self::map_repo_error)?;

        if exists {
            return Err(HealthEntryServiceError::DuplicateTimestamp);
        }
        Ok(())
    }
}

#[async_trait]
impl<R, P> HealthEntryServiceTrait for HealthEntryService<R, P>
where
    R: HealthEntryRepositoryTrait + Send + Sync,
    P: PersonRepositoryTrait + Send + Sync,
{
    async fn create_entry(
        &self,
        request: CreateHealthEntryRequest,
    ) -> Result<HealthEntry, HealthEntryServiceError> {
        request
            .validate()
            .map_err(Self::collect_validation_errors)?;
        Self::check_reading(request.systolic, request.diastolic)?;
        self.require_person(request.person_id).await?;

        let timestamp = request.timestamp.unwrap_or_else(Utc::now);
        self.require_unique_timestamp(request.person_id, timestamp, None)
            .await?;

        let record = self
            .entries
            .create(conversions::new_entry_from_request(&request, timestamp))
            .await
            .map_err(Self::map_repo_error)?;

        debug!("Created health entry {}", record.id);
        conversions::entry_from_record(record).map_err(HealthEntryServiceError::Repository)
    }

    async fn get_entry(&self, id: Uuid) -> Result<HealthEntry, HealthEntryServiceError> {
        let record = self
            .entries
            .get_by_id(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(|| HealthEntryServiceError::NotFound(id.to_string()))?;

        conversions::entry_from_record(record).map_err(HealthEntryServiceError::Repository)
    }

    async fn list_entries(
        &self,
        query: EntryQuery,
    ) -> Result<(Vec<HealthEntry>, usize), HealthEntryServiceError> {
        let (records, total) = self
            .entries
            .get_filtered(query.into_filter())
            .await
            .map_err(Self::map_repo_error)?;

        let entries = records
            .into_iter()
            .map(conversions::entry_from_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(HealthEntryServiceError::Repository)?;

        Ok((entries, total))
    }

    async fn update_entry(
        &self,
        id: Uuid,
        request: UpdateHealthEntryRequest,
    ) -> Result<HealthEntry, HealthEntryServiceError> {
        request
            .validate()
            .map_err(Self::collect_validation_errors)?;
        Self::check_reading(request.systolic, request.diastolic)?;
        self.require_person(request.person_id).await?;

        // Resolve the id before the duplicate rule; a stale id is
        // not-found, not a timestamp conflict.
        self.entries
            .get_by_id(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(|| HealthEntryServiceError::NotFound(id.to_string()))?;

        self.require_unique_timestamp(request.person_id, request.timestamp, Some(id))
            .await?;

        let record = self
            .entries
            .update(conversions::record_from_update(id, &request))
            .await
            .map_err(Self::map_repo_error)?;

        debug!("Updated health entry {}", record.id);
        conversions::entry_from_record(record).map_err(HealthEntryServiceError::Repository)
    }

    async fn delete_entry(&self, id: Uuid) -> Result<(), HealthEntryServiceError> {
        let deleted = self
            .entries
            .delete(id)
            .await
            .map_err(Self::map_repo_error)?;

        if !deleted {
            return Err(HealthEntryServiceError::NotFound(id.to_string()));
        }

        debug!("Deleted health entry {}", id);
        Ok(())
    }

    async fn import_entries(
        &self,
        person_id: Uuid,
        rows: Vec<ImportRow>,
    ) -> Result<ImportReport, HealthEntryServiceError> {
        self.require_person(person_id).await?;

        let mut report = ImportReport::default();

        for (index, row) in rows.into_iter().enumerate() {
            if let Err(e) = row
                .validate()
                .map_err(Self::collect_validation_errors)
                .and_then(|_| Self::check_reading(row.systolic, row.diastolic))
            {
                report.failed += 1;
                report.errors.push(format!("Row {}: {}", index, e));
                continue;
            }

            let duplicate = self
                .entries
                .exists_at_timestamp(&person_id.to_string(), &row.timestamp.to_rfc3339(), None)
                .await
                .map_err(Self::map_repo_error)?;

            if duplicate {
                report.skipped += 1;
                continue;
            }

            let request = CreateHealthEntryRequest {
                person_id,
                systolic: row.systolic,
                diastolic: row.diastolic,
                heart_rate: row.heart_rate,
                tags: row.tags,
                timestamp: Some(row.timestamp),
            };

            self.entries
                .create(conversions::new_entry_from_request(&request, row.timestamp))
                .await
                .map_err(Self::map_repo_error)?;

            report.imported += 1;
        }

        debug!(
            "Import for person {}: {} imported, {} skipped, {} failed",
            person_id, report.imported, report.skipped, report.failed
        );

        Ok(report)
    }
}

/// Create a default health entry service using the repositories from the
/// data layer, sharing one fallback store so person lookups see entries
/// created through the same service set.
pub fn create_default_health_entry_service(
    store: vitaltrack_data::repository::InMemoryStore,
) -> impl HealthEntryServiceTrait + Send + Sync {
    let entries = vitaltrack_data::repository::HealthEntryRepository::with_store(store.clone());
    let persons = vitaltrack_data::repository::PersonRepository::with_store(store);
    HealthEntryService::new(entries, persons)
}
