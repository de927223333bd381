use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use vitaltrack_data::repository::{PersonRepositoryTrait, RepositoryError};

use crate::entities::conversions;
use crate::entities::person::{Person, RegisterPersonRequest};

/// Person service errors
#[derive(Debug, Error)]
pub enum PersonServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Person not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),
}

/// Trait for person service operations
#[async_trait]
pub trait PersonServiceTrait {
    /// Register a new person
    async fn register_person(
        &self,
        request: RegisterPersonRequest,
    ) -> Result<Person, PersonServiceError>;

    /// Get all registered persons
    async fn list_persons(&self) -> Result<Vec<Person>, PersonServiceError>;

    /// Get a person by id
    async fn get_person(&self, id: Uuid) -> Result<Person, PersonServiceError>;
}

/// Person service for domain logic
pub struct PersonService<P> {
    persons: P,
}

impl<P: PersonRepositoryTrait> PersonService<P> {
    /// Create a new person service
    pub fn new(persons: P) -> Self {
        Self { persons }
    }

    fn map_repo_error(err: RepositoryError) -> PersonServiceError {
        match err {
            RepositoryError::NotFound(msg) => PersonServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => PersonServiceError::Validation(msg),
            _ => PersonServiceError::Repository(err.to_string()),
        }
    }
}

#[async_trait]
impl<P: PersonRepositoryTrait + Send + Sync> PersonServiceTrait for PersonService<P> {
    async fn register_person(
        &self,
        request: RegisterPersonRequest,
    ) -> Result<Person, PersonServiceError> {
        if let Err(errors) = request.validate() {
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

            return Err(PersonServiceError::Validation(message));
        }

        let record = self
            .persons
            .create(conversions::new_person_from_request(&request))
            .await
            .map_err(Self::map_repo_error)?;

        debug!("Registered person {}", record.id);
        conversions::person_from_record(record).map_err(PersonServiceError::Repository)
    }

    async fn list_persons(&self) -> Result<Vec<Person>, PersonServiceError> {
        let records = self
            .persons
            .get_all()
            .await
            .map_err(Self::map_repo_error)?;

        records
            .into_iter()
            .map(conversions::person_from_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PersonServiceError::Repository)
    }

    async fn get_person(&self, id: Uuid) -> Result<Person, PersonServiceError> {
        let record = self
            .persons
            .get_by_id(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(|| PersonServiceError::NotFound(id.to_string()))?;

        conversions::person_from_record(record).map_err(PersonServiceError::Repository)
    }
}

/// Create a default person service using the repository from the data layer
pub fn create_default_person_service(
    store: vitaltrack_data::repository::InMemoryStore,
) -> impl PersonServiceTrait + Send + Sync {
    PersonService::new(vitaltrack_data::repository::PersonRepository::with_store(store))
}
