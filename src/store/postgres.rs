//! PostgreSQL person store. Each multi-statement write runs in its own transaction.

use super::schema::link_constraint;
use super::{classify, PersonStore};
use crate::error::AppError;
use crate::model::{BasePerson, Gender, NewPerson, Person, PersonPatch, PersonRecord};
use crate::sql::{
    delete_by_id, insert_person, insert_subtype, lock_subtype, select_base_person, select_people, select_person,
    update_links, update_names, QueryBuf, PERSON_TABLE,
};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

type PersonRow = (Uuid, Option<Uuid>, Option<Uuid>, String, String);

type PeopleRow = (
    Uuid,
    String,
    String,
    Option<Uuid>,
    Option<Uuid>,
    Option<Uuid>,
    Option<Uuid>,
    Option<Uuid>,
    Option<Uuid>,
);

#[derive(Clone)]
pub struct PgPersonStore {
    pool: PgPool,
    schema: String,
}

impl PgPersonStore {
    /// `schema` must already be validated; it is interpolated into SQL.
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgPersonStore {
            pool,
            schema: schema.into(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Base row then sub-type row, inside the caller's transaction.
    async fn insert_tx(&self, conn: &mut PgConnection, gender: Gender, person: &Person) -> Result<(), AppError> {
        let sql = insert_person(&self.schema);
        tracing::debug!(sql = %sql, id = %person.id, "query (tx)");
        sqlx::query(&sql)
            .bind(person.id)
            .bind(&person.first_name)
            .bind(&person.last_name)
            .execute(&mut *conn)
            .await?;

        let sql = insert_subtype(&self.schema, gender);
        tracing::debug!(sql = %sql, id = %person.id, "query (tx)");
        sqlx::query(&sql)
            .bind(person.id)
            .bind(person.mother_id)
            .bind(person.father_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| reference_error(gender, e))?;
        Ok(())
    }

    async fn execute_tx(tx: &mut PgConnection, q: &QueryBuf) -> Result<u64, sqlx::Error> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.execute(&mut *tx).await?.rows_affected())
    }
}

fn person_from_row((id, mother_id, father_id, first_name, last_name): PersonRow) -> Person {
    Person {
        id,
        mother_id,
        father_id,
        first_name,
        last_name,
    }
}

/// Map a violated parent foreign key to the offending field; other errors pass through.
fn reference_error(gender: Gender, e: sqlx::Error) -> AppError {
    let message = e
        .as_database_error()
        .filter(|db| db.is_foreign_key_violation())
        .and_then(|db| db.constraint())
        .and_then(|constraint| {
            if constraint == link_constraint(gender, "mother_id") {
                Some("motherId does not reference an existing female".to_string())
            } else if constraint == link_constraint(gender, "father_id") {
                Some("fatherId does not reference an existing male".to_string())
            } else {
                None
            }
        });
    match message {
        Some(m) => AppError::UnknownReference(m),
        None => AppError::Db(e),
    }
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn create_person(&self, gender: Gender, new: &NewPerson) -> Result<Person, AppError> {
        let person = Person {
            id: Uuid::new_v4(),
            mother_id: new.mother_id,
            father_id: new.father_id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
        };
        let mut tx = self.pool.begin().await?;
        self.insert_tx(&mut *tx, gender, &person).await?;
        tx.commit().await?;
        tracing::debug!(%gender, id = %person.id, "person created");
        Ok(person)
    }

    async fn insert_people(&self, people: &[PersonRecord]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for record in people {
            self.insert_tx(&mut *tx, record.gender(), record.person()).await?;
        }
        tx.commit().await?;
        tracing::debug!(count = people.len(), "people inserted");
        Ok(())
    }

    async fn get_person(&self, gender: Gender, id: Uuid) -> Result<Option<Person>, AppError> {
        let sql = select_person(&self.schema, gender);
        tracing::debug!(sql = %sql, %id, "query");
        let row: Option<PersonRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(person_from_row))
    }

    async fn update_person(
        &self,
        gender: Gender,
        id: Uuid,
        patch: &PersonPatch,
    ) -> Result<Option<Person>, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(Uuid,)> = sqlx::query_as(&lock_subtype(&self.schema, gender))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        if let Some(q) = update_links(&self.schema, gender, id, patch) {
            Self::execute_tx(&mut *tx, &q)
                .await
                .map_err(|e| reference_error(gender, e))?;
        }
        if let Some(q) = update_names(&self.schema, id, patch) {
            Self::execute_tx(&mut *tx, &q).await?;
        }

        let row: PersonRow = sqlx::query_as(&select_person(&self.schema, gender))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(person_from_row(row)))
    }

    async fn delete_person(&self, gender: Gender, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query(&delete_by_id(&self.schema, gender.table()))
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Ok(false);
        }
        sqlx::query(&delete_by_id(&self.schema, PERSON_TABLE))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(%gender, %id, "person deleted");
        Ok(true)
    }

    async fn list_people(&self) -> Result<Vec<PersonRecord>, AppError> {
        let sql = select_people(&self.schema);
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<PeopleRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|(id, first_name, last_name, m_id, m_mother, m_father, f_id, f_mother, f_father)| {
                classify(
                    BasePerson {
                        id,
                        first_name,
                        last_name,
                    },
                    m_id.map(|_| (m_mother, m_father)),
                    f_id.map(|_| (f_mother, f_father)),
                )
            })
            .collect()
    }

    async fn get_base_person(&self, id: Uuid) -> Result<Option<BasePerson>, AppError> {
        let sql = select_base_person(&self.schema);
        tracing::debug!(sql = %sql, %id, "query");
        let row: Option<(Uuid, String, String)> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|(id, first_name, last_name)| BasePerson {
            id,
            first_name,
            last_name,
        }))
    }

    async fn delete_any(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        for gender in Gender::ALL {
            sqlx::query(&delete_by_id(&self.schema, gender.table()))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        let removed = sqlx::query(&delete_by_id(&self.schema, PERSON_TABLE))
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Ok(false);
        }
        tx.commit().await?;
        tracing::debug!(%id, "person deleted");
        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
