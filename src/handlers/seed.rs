//! `GET /`: demo bootstrap.

use crate::error::AppError;
use crate::model::{PersonEntry, PersonRecord};
use crate::response::ok;
use crate::service::seed_family;
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "The four people just created", body = [PersonEntry])),
    tag = "seed"
)]
pub async fn seed(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let people: Vec<PersonEntry> = seed_family(state.store.as_ref())
        .await?
        .into_iter()
        .map(PersonRecord::into_entry)
        .collect();
    Ok(ok(people))
}
