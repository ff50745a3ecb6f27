//! HTTP handlers: per-gender CRUD, the aggregate people endpoints, and the demo seed.

pub mod people;
pub mod person;
pub mod seed;

use crate::error::AppError;
use crate::model::Gender;
use uuid::Uuid;

/// Gender path segment; anything but `male` / `female` is not a resource.
fn resolve_gender(segment: &str) -> Result<Gender, AppError> {
    Gender::from_segment(segment).ok_or_else(|| AppError::NotFound(segment.to_string()))
}

/// Ids are UUIDs; any other string cannot name a stored person.
fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::NotFound(id_str.to_string()))
}
