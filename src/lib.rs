//! Genealogy API: people split into male and female sub-types, stored in PostgreSQL and served over REST.

pub mod config;
pub mod error;
pub mod extractors;
pub mod family;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{load_from_env, load_from_map, Settings, StoreBackend};
pub use error::{AppError, ConfigError};
pub use model::{BasePerson, Gender, Kinship, NewPerson, Person, PersonEntry, PersonPatch, PersonRecord};
pub use routes::{app, common_routes, openapi_routes, person_routes, ApiDoc};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, MemoryPersonStore, PersonStore, PgPersonStore};
