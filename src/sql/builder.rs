//! Builds the parameterized statements used by the PostgreSQL person store.

use crate::model::{Gender, PersonPatch};
use crate::sql::PgBindValue;
use uuid::Uuid;

pub const PERSON_TABLE: &str = "person";

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }
}

/// INSERT of a base row. Params: id, first_name, last_name.
pub fn insert_person(schema: &str) -> String {
    format!(
        "INSERT INTO {} (id, first_name, last_name) VALUES ($1, $2, $3)",
        qualified_table(schema, PERSON_TABLE)
    )
}

/// INSERT of a sub-type row. Params: id, mother_id, father_id.
pub fn insert_subtype(schema: &str, gender: Gender) -> String {
    format!(
        "INSERT INTO {} (id, mother_id, father_id) VALUES ($1, $2, $3)",
        qualified_table(schema, gender.table())
    )
}

/// Sub-type row joined with its names. Param: id.
/// Columns: id, mother_id, father_id, first_name, last_name.
pub fn select_person(schema: &str, gender: Gender) -> String {
    format!(
        "SELECT g.id, g.mother_id, g.father_id, p.first_name, p.last_name \
         FROM {} g JOIN {} p ON p.id = g.id WHERE g.id = $1",
        qualified_table(schema, gender.table()),
        qualified_table(schema, PERSON_TABLE)
    )
}

/// Base row only. Param: id. Columns: id, first_name, last_name.
pub fn select_base_person(schema: &str) -> String {
    format!(
        "SELECT id, first_name, last_name FROM {} WHERE id = $1",
        qualified_table(schema, PERSON_TABLE)
    )
}

/// Every base row with both optional sub-type joins.
/// Columns: id, first_name, last_name, male id, male mother_id, male father_id,
/// female id, female mother_id, female father_id.
pub fn select_people(schema: &str) -> String {
    format!(
        "SELECT p.id, p.first_name, p.last_name, \
                m.id, m.mother_id, m.father_id, \
                f.id, f.mother_id, f.father_id \
         FROM {} p \
         LEFT JOIN {} m ON m.id = p.id \
         LEFT JOIN {} f ON f.id = p.id \
         ORDER BY p.last_name, p.first_name, p.id",
        qualified_table(schema, PERSON_TABLE),
        qualified_table(schema, Gender::Male.table()),
        qualified_table(schema, Gender::Female.table())
    )
}

/// Lock a sub-type row for the rest of the transaction. Param: id.
pub fn lock_subtype(schema: &str, gender: Gender) -> String {
    format!(
        "SELECT id FROM {} WHERE id = $1 FOR UPDATE",
        qualified_table(schema, gender.table())
    )
}

/// DELETE by primary key from any of the three tables. Param: id.
pub fn delete_by_id(schema: &str, table: &str) -> String {
    format!("DELETE FROM {} WHERE id = $1", qualified_table(schema, table))
}

/// UPDATE of the supplied parent links. None when the patch carries no link.
pub fn update_links(schema: &str, gender: Gender, id: Uuid, patch: &PersonPatch) -> Option<QueryBuf> {
    let mut sets = Vec::new();
    if let Some(mother_id) = patch.mother_id {
        sets.push(("mother_id", PgBindValue::Uuid(mother_id)));
    }
    if let Some(father_id) = patch.father_id {
        sets.push(("father_id", PgBindValue::Uuid(father_id)));
    }
    update_set(schema, gender.table(), sets, id)
}

/// UPDATE of the supplied names. None when the patch carries no name.
pub fn update_names(schema: &str, id: Uuid, patch: &PersonPatch) -> Option<QueryBuf> {
    let mut sets = Vec::new();
    if let Some(first_name) = &patch.first_name {
        sets.push(("first_name", PgBindValue::Text(first_name.clone())));
    }
    if let Some(last_name) = &patch.last_name {
        sets.push(("last_name", PgBindValue::Text(last_name.clone())));
    }
    update_set(schema, PERSON_TABLE, sets, id)
}

fn update_set(schema: &str, table: &str, sets: Vec<(&str, PgBindValue)>, id: Uuid) -> Option<QueryBuf> {
    if sets.is_empty() {
        return None;
    }
    let mut q = QueryBuf::new();
    let mut assignments = Vec::with_capacity(sets.len());
    for (column, value) in sets {
        let n = q.push_param(value);
        assignments.push(format!("{} = ${}", quoted(column), n));
    }
    let n = q.push_param(PgBindValue::Uuid(Some(id)));
    q.sql = format!(
        "UPDATE {} SET {} WHERE id = ${}",
        qualified_table(schema, table),
        assignments.join(", "),
        n
    );
    Some(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quoted("male"), "\"male\"");
        assert_eq!(quoted("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(qualified_table("genealogy", "person"), "\"genealogy\".\"person\"");
    }

    #[test]
    fn update_links_numbers_only_supplied_columns() {
        let id = Uuid::new_v4();
        let patch = PersonPatch {
            father_id: Some(None),
            ..PersonPatch::default()
        };
        let q = update_links("genealogy", Gender::Female, id, &patch).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE \"genealogy\".\"female\" SET \"father_id\" = $1 WHERE id = $2"
        );
        assert_eq!(q.params, vec![PgBindValue::Uuid(None), PgBindValue::Uuid(Some(id))]);
    }

    #[test]
    fn update_names_skips_empty_patch() {
        let id = Uuid::new_v4();
        assert!(update_names("genealogy", id, &PersonPatch::default()).is_none());
        let patch = PersonPatch {
            first_name: Some("Bartholomew".into()),
            last_name: Some("Simpson".into()),
            ..PersonPatch::default()
        };
        let q = update_names("genealogy", id, &patch).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE \"genealogy\".\"person\" SET \"first_name\" = $1, \"last_name\" = $2 WHERE id = $3"
        );
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn people_listing_joins_both_subtypes() {
        let sql = select_people("kin");
        assert!(sql.contains("LEFT JOIN \"kin\".\"male\" m"));
        assert!(sql.contains("LEFT JOIN \"kin\".\"female\" f"));
    }
}
