//! Aggregate handlers across both genders: `/people`, `/people/{id}` and kinship.

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::extractors::JsonBody;
use crate::family::{Family, Relationship};
use crate::model::{BasePerson, Kinship, NewGenderedPerson, PersonEntry, PersonRecord};
use crate::response::{created, no_content, ok};
use crate::service::{RequestValidator, CREATE_GENDERED_PERSON};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/people",
    responses(
        (status = 200, description = "Everyone, with a gender discriminator", body = [PersonEntry]),
        (status = 500, description = "A person row without exactly one sub-type row", body = ErrorBody),
    ),
    operation_id = "list_people",
    tag = "people"
)]
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let people: Vec<PersonEntry> = state
        .store
        .list_people()
        .await?
        .into_iter()
        .map(PersonRecord::into_entry)
        .collect();
    Ok(ok(people))
}

#[utoipa::path(
    post,
    path = "/people",
    request_body = NewGenderedPerson,
    responses(
        (status = 201, description = "Created", body = PersonEntry),
        (status = 400, description = "Invalid body or unknown parent", body = ErrorBody),
    ),
    operation_id = "create_gendered_person",
    tag = "people"
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let new: NewGenderedPerson = RequestValidator::parse(body, &CREATE_GENDERED_PERSON)?;
    let (gender, new) = new.split();
    let person = state.store.create_person(gender, &new).await?;
    tracing::info!(%gender, id = %person.id, "person created");
    Ok(created(PersonRecord::new(gender, person).into_entry()))
}

#[utoipa::path(
    get,
    path = "/people/{id}",
    params(("id" = String, Path, description = "Person id")),
    responses(
        (status = 200, description = "Base person row", body = BasePerson),
        (status = 404, description = "No such person"),
    ),
    operation_id = "read_base_person",
    tag = "people"
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let person = state
        .store
        .get_base_person(id)
        .await?
        .ok_or_else(|| AppError::NotFound(id_str))?;
    Ok(ok(person))
}

#[utoipa::path(
    delete,
    path = "/people/{id}",
    params(("id" = String, Path, description = "Person id")),
    responses(
        (status = 204, description = "Deleted with any sub-type row"),
        (status = 404, description = "No such person"),
    ),
    operation_id = "delete_any_person",
    tag = "people"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.delete_any(id).await? {
        return Err(AppError::NotFound(id_str));
    }
    tracing::info!(%id, "person deleted");
    Ok(no_content())
}

#[utoipa::path(
    get,
    path = "/people/{id}/relationship/{other_id}",
    params(
        ("id" = String, Path, description = "Person the relationship is seen from"),
        ("other_id" = String, Path, description = "Relative being named"),
    ),
    responses(
        (status = 200, description = "What the relative is to the person", body = Kinship),
        (status = 404, description = "Either person does not exist"),
    ),
    operation_id = "person_relationship",
    tag = "people"
)]
pub async fn relationship(
    State(state): State<AppState>,
    Path((id_str, other_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let person_id = parse_id(&id_str)?;
    let relative_id = parse_id(&other_str)?;
    let records = state.store.list_people().await?;
    let family = Family::from_records(&records);
    family
        .get(person_id)
        .ok_or_else(|| AppError::NotFound(id_str))?;
    let relative = family
        .get(relative_id)
        .ok_or_else(|| AppError::NotFound(other_str))?;

    let relationship = family.relationship(person_id, relative_id);
    let label = relationship.label(Some(relative.gender));
    let (up, down, half) = match relationship {
        Relationship::Related { up, down, half } => (Some(up), Some(down), half),
        Relationship::Unrelated => (None, None, false),
    };
    Ok(ok(Kinship {
        person_id,
        relative_id,
        label,
        up,
        down,
        half,
    }))
}
