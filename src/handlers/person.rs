//! Per-gender handlers for `/{gender}` and `/{gender}/{id}`.

use super::{parse_id, resolve_gender};
use crate::error::{AppError, ErrorBody};
use crate::extractors::JsonBody;
use crate::model::{NewPerson, Person, PersonPatch};
use crate::response::{created, no_content, ok};
use crate::service::{RequestValidator, CREATE_PERSON, UPDATE_PERSON};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/{gender}/{id}",
    params(
        ("gender" = String, Path, description = "`male` or `female`"),
        ("id" = String, Path, description = "Person id"),
    ),
    responses(
        (status = 200, description = "Person of that gender", body = Person),
        (status = 404, description = "No such person of that gender"),
    ),
    operation_id = "read_person",
    tag = "person"
)]
pub async fn read(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let gender = resolve_gender(&segment)?;
    let id = parse_id(&id_str)?;
    let person = state
        .store
        .get_person(gender, id)
        .await?
        .ok_or_else(|| AppError::NotFound(id_str))?;
    Ok(ok(person))
}

#[utoipa::path(
    post,
    path = "/{gender}",
    params(("gender" = String, Path, description = "`male` or `female`")),
    request_body = NewPerson,
    responses(
        (status = 201, description = "Created", body = Person),
        (status = 400, description = "Invalid body or unknown parent", body = ErrorBody),
        (status = 404, description = "Unknown gender segment"),
    ),
    operation_id = "create_person",
    tag = "person"
)]
pub async fn create(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let gender = resolve_gender(&segment)?;
    let new: NewPerson = RequestValidator::parse(body, &CREATE_PERSON)?;
    let person = state.store.create_person(gender, &new).await?;
    tracing::info!(%gender, id = %person.id, "person created");
    Ok(created(person))
}

#[utoipa::path(
    patch,
    path = "/{gender}/{id}",
    params(
        ("gender" = String, Path, description = "`male` or `female`"),
        ("id" = String, Path, description = "Person id"),
    ),
    request_body = PersonPatch,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid body or unknown parent", body = ErrorBody),
        (status = 404, description = "No such person of that gender"),
    ),
    operation_id = "update_person",
    tag = "person"
)]
pub async fn update(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let gender = resolve_gender(&segment)?;
    let id = parse_id(&id_str)?;
    let patch: PersonPatch = RequestValidator::parse(body, &UPDATE_PERSON)?;
    state
        .store
        .update_person(gender, id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(id_str))?;
    tracing::info!(%gender, %id, "person updated");
    Ok(no_content())
}

#[utoipa::path(
    delete,
    path = "/{gender}/{id}",
    params(
        ("gender" = String, Path, description = "`male` or `female`"),
        ("id" = String, Path, description = "Person id"),
    ),
    responses(
        (status = 204, description = "Deleted with its base row"),
        (status = 404, description = "No such person of that gender"),
    ),
    operation_id = "delete_person",
    tag = "person"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let gender = resolve_gender(&segment)?;
    let id = parse_id(&id_str)?;
    if !state.store.delete_person(gender, id).await? {
        return Err(AppError::NotFound(id_str));
    }
    tracing::info!(%gender, %id, "person deleted");
    Ok(no_content())
}
