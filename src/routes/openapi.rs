//! OpenAPI document served at `/openapi.json`.

use crate::error::{ErrorBody, ErrorDetail, ValidationErrors, ValidationIssue};
use crate::handlers::{people, person, seed};
use crate::model::{BasePerson, Gender, Kinship, NewGenderedPerson, NewPerson, Person, PersonEntry, PersonPatch};
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Genealogy API"),
    paths(
        seed::seed,
        person::create,
        person::read,
        person::update,
        person::delete,
        people::list,
        people::create,
        people::read,
        people::delete,
        people::relationship,
    ),
    components(schemas(
        Gender,
        Person,
        BasePerson,
        PersonEntry,
        NewPerson,
        NewGenderedPerson,
        PersonPatch,
        Kinship,
        ErrorBody,
        ErrorDetail,
        ValidationErrors,
        ValidationIssue,
    )),
    tags(
        (name = "person", description = "Per-gender CRUD"),
        (name = "people", description = "Everyone, regardless of gender"),
        (name = "seed", description = "Demo data"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn openapi_routes() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}
