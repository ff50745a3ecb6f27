//! Genealogy routes. `/people` is matched before the `/:gender` segment; handlers 404 on unknown genders.

use crate::handlers::{people, person, seed};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn person_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(seed::seed))
        .route("/people", get(people::list).post(people::create))
        .route("/people/:id", get(people::read).delete(people::delete))
        .route("/people/:id/relationship/:other_id", get(people::relationship))
        .route("/:gender", post(person::create))
        .route(
            "/:gender/:id",
            get(person::read).patch(person::update).delete(person::delete),
        )
        .with_state(state)
}
