//! Router assembly.

mod common;
mod openapi;
mod person;

pub use common::common_routes;
pub use openapi::{openapi_routes, ApiDoc};
pub use person::person_routes;

use crate::config::Settings;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: common, openapi and genealogy routes behind a body limit and request tracing.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(openapi_routes())
        .merge(person_routes(state))
        .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}
