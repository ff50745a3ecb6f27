//! Demo family: two parents and their two children.

use crate::error::AppError;
use crate::model::{Person, PersonRecord};
use crate::store::PersonStore;
use uuid::Uuid;

fn person(first_name: &str, last_name: &str, mother_id: Option<Uuid>, father_id: Option<Uuid>) -> Person {
    Person {
        id: Uuid::new_v4(),
        mother_id,
        father_id,
        first_name: first_name.into(),
        last_name: last_name.into(),
    }
}

/// Create Homer and Marge, then Bart and Lisa linked to them, in one atomic insert.
/// Each call adds four new people.
pub async fn seed_family(store: &dyn PersonStore) -> Result<Vec<PersonRecord>, AppError> {
    let homer = person("Homer", "Simpson", None, None);
    let marge = person("Marge", "Bouvier", None, None);
    let bart = person("Bart", "Simpson", Some(marge.id), Some(homer.id));
    let lisa = person("Lisa", "Simpson", Some(marge.id), Some(homer.id));
    let family = vec![
        PersonRecord::Male(homer),
        PersonRecord::Female(marge),
        PersonRecord::Male(bart),
        PersonRecord::Female(lisa),
    ];
    store.insert_people(&family).await?;
    tracing::info!(count = family.len(), "seeded demo family");
    Ok(family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPersonStore;

    #[tokio::test]
    async fn children_link_to_seeded_parents() {
        let store = MemoryPersonStore::new();
        let seeded = seed_family(&store).await.unwrap();
        assert_eq!(seeded.len(), 4);
        let (homer, marge) = (seeded[0].person().id, seeded[1].person().id);
        for child in &seeded[2..] {
            assert_eq!(child.person().father_id, Some(homer));
            assert_eq!(child.person().mother_id, Some(marge));
        }
        assert_eq!(store.list_people().await.unwrap().len(), 4);
    }
}
