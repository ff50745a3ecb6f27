//! Person store: the data access contract and its PostgreSQL and in-memory implementations.

mod memory;
mod postgres;
mod schema;

pub use memory::MemoryPersonStore;
pub use postgres::PgPersonStore;
pub use schema::{ensure_database_exists, ensure_tables};

use crate::error::AppError;
use crate::model::{BasePerson, Gender, NewPerson, Person, PersonPatch, PersonRecord};
use async_trait::async_trait;
use uuid::Uuid;

/// Uniform access to people regardless of which sub-type table holds them.
/// Every multi-row write is atomic.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Insert the base row and the `gender` sub-type row linked to existing parents.
    async fn create_person(&self, gender: Gender, new: &NewPerson) -> Result<Person, AppError>;

    /// Insert every record with its own id, in order, all or nothing.
    /// Later records may name earlier ones as parents.
    async fn insert_people(&self, people: &[PersonRecord]) -> Result<(), AppError>;

    /// Sub-type row of `gender` with its names. Never looks at the other gender.
    async fn get_person(&self, gender: Gender, id: Uuid) -> Result<Option<Person>, AppError>;

    /// Apply the supplied fields. `None` when no `gender` row has this id.
    async fn update_person(
        &self,
        gender: Gender,
        id: Uuid,
        patch: &PersonPatch,
    ) -> Result<Option<Person>, AppError>;

    /// Delete the sub-type row and then the base row. `false` when the sub-type row did not exist.
    async fn delete_person(&self, gender: Gender, id: Uuid) -> Result<bool, AppError>;

    /// Every person ordered by last name, first name, id.
    async fn list_people(&self) -> Result<Vec<PersonRecord>, AppError>;

    async fn get_base_person(&self, id: Uuid) -> Result<Option<BasePerson>, AppError>;

    /// Delete whichever sub-type rows exist, then the base row. `true` iff the base row existed.
    async fn delete_any(&self, id: Uuid) -> Result<bool, AppError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Turn the optional male and female joins of one base row into a record.
/// A row with neither or both sub-types breaks the one-sub-type invariant.
pub(crate) fn classify(
    base: BasePerson,
    male: Option<(Option<Uuid>, Option<Uuid>)>,
    female: Option<(Option<Uuid>, Option<Uuid>)>,
) -> Result<PersonRecord, AppError> {
    let (gender, (mother_id, father_id)) = match (male, female) {
        (Some(links), None) => (Gender::Male, links),
        (None, Some(links)) => (Gender::Female, links),
        (None, None) => {
            return Err(AppError::InvariantViolation(format!(
                "person {} has no male or female row",
                base.id
            )))
        }
        (Some(_), Some(_)) => {
            return Err(AppError::InvariantViolation(format!(
                "person {} has both a male and a female row",
                base.id
            )))
        }
    };
    Ok(PersonRecord::new(
        gender,
        Person {
            id: base.id,
            mother_id,
            father_id,
            first_name: base.first_name,
            last_name: base.last_name,
        },
    ))
}
