use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use vitaltrack_domain::services::PersonServiceError;

use crate::api::AppState;
use crate::entities::person::{PersonResponse, RegisterPersonPayload};
use crate::entities::ErrorResponse;

fn person_error(e: PersonServiceError) -> ErrorResponse {
    match e {
        PersonServiceError::Validation(msg) => {
            warn!("Invalid person data: {}", msg);
            ErrorResponse::validation_error(&msg)
        }
        PersonServiceError::NotFound(id) => {
            info!("Person not found: {}", id);
            ErrorResponse::not_found("person")
        }
        PersonServiceError::Repository(msg) => {
            error!("Repository failure: {}", msg);
            ErrorResponse::internal_error()
        }
    }
}

/// Register a new person
#[utoipa::path(
    post,
    path = "/api/v1/persons",
    request_body = RegisterPersonPayload,
    responses(
        (status = 201, description = "Person registered", body = PersonResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "persons"
)]
#[instrument(skip(state, payload))]
pub async fn register_person(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPersonPayload>,
) -> Result<impl IntoResponse, ErrorResponse> {
    info!("Registering new person");

    let person = state
        .persons
        .register_person(payload.into())
        .await
        .map_err(person_error)?;

    info!("Person registered with id: {}", person.id);
    Ok((StatusCode::CREATED, Json(PersonResponse::from(person))))
}

/// List all registered persons, sorted by name
#[utoipa::path(
    get,
    path = "/api/v1/persons",
    responses(
        (status = 200, description = "Persons retrieved", body = Vec<PersonResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "persons"
)]
#[instrument(skip(state))]
pub async fn list_persons(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let persons = state.persons.list_persons().await.map_err(person_error)?;

    let response = persons
        .into_iter()
        .map(PersonResponse::from)
        .collect::<Vec<_>>();

    Ok((StatusCode::OK, Json(response)))
}

/// Get a single person by id
#[utoipa::path(
    get,
    path = "/api/v1/persons/{id}",
    params(
        ("id" = Uuid, Path, description = "Person id")
    ),
    responses(
        (status = 200, description = "Person found", body = PersonResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "persons"
)]
#[instrument(skip(state))]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let person = state.persons.get_person(id).await.map_err(person_error)?;
    Ok((StatusCode::OK, Json(PersonResponse::from(person))))
}
