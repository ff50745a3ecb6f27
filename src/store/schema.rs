//! DDL for the person tables and database bootstrap. Tables live in the schema named by settings.

use crate::error::AppError;
use crate::model::Gender;
use crate::sql::{qualified_table, quoted, PERSON_TABLE};
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Create the schema, `person`, `male` and `female` if missing, then the parent foreign keys.
/// Safe to run on every start.
pub async fn ensure_tables(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;

    let person = qualified_table(schema, PERSON_TABLE);
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL
        )
        "#,
        person
    ))
    .execute(pool)
    .await?;

    for gender in Gender::ALL {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY REFERENCES {} (id),
                mother_id UUID,
                father_id UUID
            )
            "#,
            qualified_table(schema, gender.table()),
            person
        );
        sqlx::query(&ddl).execute(pool).await?;
    }

    // Parent links cross-reference both sub-type tables, so they are added once both exist.
    // ADD CONSTRAINT has no IF NOT EXISTS; on a rerun only duplicate_object is tolerated.
    for gender in Gender::ALL {
        let table = qualified_table(schema, gender.table());
        for (column, parent) in [("mother_id", Gender::Female), ("father_id", Gender::Male)] {
            let constraint = link_constraint(gender, column);
            let alter = format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} (id) ON DELETE SET NULL",
                table,
                quoted(&constraint),
                quoted(column),
                qualified_table(schema, parent.table())
            );
            match sqlx::query(&alter).execute(pool).await {
                Ok(_) => tracing::debug!(constraint = %constraint, "constraint added"),
                Err(e) if constraint_exists(&e) => {
                    tracing::debug!(constraint = %constraint, "constraint already present")
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    tracing::info!(schema = %schema, "person tables ready");
    Ok(())
}

/// Name of the foreign key behind a parent link, e.g. `male_mother_id_fkey`.
pub(crate) fn link_constraint(gender: Gender, column: &str) -> String {
    format!("{}_{}_fkey", gender.table(), column)
}

/// SQLSTATE 42710 (duplicate_object).
fn constraint_exists(e: &sqlx::Error) -> bool {
    e.as_database_error().and_then(|db| db.code()).as_deref() == Some("42710")
}

/// Ensure the database named in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
/// A URL that names no database is left to the server's default.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name.filter(|name| name != "postgres") else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

/// Connection options for the `postgres` maintenance database on the same server,
/// plus the database the URL asks for.
fn admin_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let db_name = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}
