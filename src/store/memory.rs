//! In-process person store with the same contract as the PostgreSQL one.
//! Parent links are checked like foreign keys and cleared when the parent is deleted.

use super::{classify, PersonStore};
use crate::error::AppError;
use crate::model::{BasePerson, Gender, NewPerson, Person, PersonPatch, PersonRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Links {
    mother_id: Option<Uuid>,
    father_id: Option<Uuid>,
}

#[derive(Clone, Default)]
struct Tables {
    person: HashMap<Uuid, (String, String)>,
    male: HashMap<Uuid, Links>,
    female: HashMap<Uuid, Links>,
}

impl Tables {
    fn subtype(&self, gender: Gender) -> &HashMap<Uuid, Links> {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }

    fn subtype_mut(&mut self, gender: Gender) -> &mut HashMap<Uuid, Links> {
        match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
        }
    }

    fn check_links(&self, mother_id: Option<Option<Uuid>>, father_id: Option<Option<Uuid>>) -> Result<(), AppError> {
        if let Some(Some(id)) = mother_id {
            if !self.female.contains_key(&id) {
                return Err(AppError::UnknownReference(
                    "motherId does not reference an existing female".into(),
                ));
            }
        }
        if let Some(Some(id)) = father_id {
            if !self.male.contains_key(&id) {
                return Err(AppError::UnknownReference(
                    "fatherId does not reference an existing male".into(),
                ));
            }
        }
        Ok(())
    }

    fn merged(&self, gender: Gender, id: Uuid) -> Option<Person> {
        let links = self.subtype(gender).get(&id)?;
        let (first_name, last_name) = self.person.get(&id)?;
        Some(Person {
            id,
            mother_id: links.mother_id,
            father_id: links.father_id,
            first_name: first_name.clone(),
            last_name: last_name.clone(),
        })
    }

    fn insert(&mut self, gender: Gender, person: &Person) -> Result<(), AppError> {
        if self.person.contains_key(&person.id) {
            return Err(AppError::Internal(format!("duplicate person id {}", person.id)));
        }
        self.check_links(Some(person.mother_id), Some(person.father_id))?;
        self.person
            .insert(person.id, (person.first_name.clone(), person.last_name.clone()));
        self.subtype_mut(gender).insert(
            person.id,
            Links {
                mother_id: person.mother_id,
                father_id: person.father_id,
            },
        );
        Ok(())
    }

    /// Remove a sub-type row and null out the links of its children.
    fn remove_subtype(&mut self, gender: Gender, id: Uuid) -> bool {
        if self.subtype_mut(gender).remove(&id).is_none() {
            return false;
        }
        for links in self.male.values_mut().chain(self.female.values_mut()) {
            match gender {
                Gender::Female if links.mother_id == Some(id) => links.mother_id = None,
                Gender::Male if links.father_id == Some(id) => links.father_id = None,
                _ => {}
            }
        }
        true
    }
}

#[derive(Default)]
pub struct MemoryPersonStore {
    tables: RwLock<Tables>,
}

impl MemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("person store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("person store lock poisoned".into()))
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn create_person(&self, gender: Gender, new: &NewPerson) -> Result<Person, AppError> {
        let person = Person {
            id: Uuid::new_v4(),
            mother_id: new.mother_id,
            father_id: new.father_id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
        };
        self.write()?.insert(gender, &person)?;
        tracing::debug!(%gender, id = %person.id, "person created");
        Ok(person)
    }

    async fn insert_people(&self, people: &[PersonRecord]) -> Result<(), AppError> {
        let mut tables = self.write()?;
        let mut staged = tables.clone();
        for record in people {
            staged.insert(record.gender(), record.person())?;
        }
        *tables = staged;
        tracing::debug!(count = people.len(), "people inserted");
        Ok(())
    }

    async fn get_person(&self, gender: Gender, id: Uuid) -> Result<Option<Person>, AppError> {
        Ok(self.read()?.merged(gender, id))
    }

    async fn update_person(
        &self,
        gender: Gender,
        id: Uuid,
        patch: &PersonPatch,
    ) -> Result<Option<Person>, AppError> {
        let mut tables = self.write()?;
        let Some(current) = tables.subtype(gender).get(&id).copied() else {
            return Ok(None);
        };
        tables.check_links(patch.mother_id, patch.father_id)?;
        let links = Links {
            mother_id: patch.mother_id.unwrap_or(current.mother_id),
            father_id: patch.father_id.unwrap_or(current.father_id),
        };
        tables.subtype_mut(gender).insert(id, links);
        if let Some((first_name, last_name)) = tables.person.get_mut(&id) {
            if let Some(f) = &patch.first_name {
                *first_name = f.clone();
            }
            if let Some(l) = &patch.last_name {
                *last_name = l.clone();
            }
        }
        Ok(tables.merged(gender, id))
    }

    async fn delete_person(&self, gender: Gender, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        if !tables.remove_subtype(gender, id) {
            return Ok(false);
        }
        tables.person.remove(&id);
        tracing::debug!(%gender, %id, "person deleted");
        Ok(true)
    }

    async fn list_people(&self) -> Result<Vec<PersonRecord>, AppError> {
        let tables = self.read()?;
        let mut people = tables
            .person
            .iter()
            .map(|(id, (first_name, last_name))| {
                let links = |l: &Links| (l.mother_id, l.father_id);
                classify(
                    BasePerson {
                        id: *id,
                        first_name: first_name.clone(),
                        last_name: last_name.clone(),
                    },
                    tables.male.get(id).map(links),
                    tables.female.get(id).map(links),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        people.sort_by(|a, b| {
            let (a, b) = (a.person(), b.person());
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(people)
    }

    async fn get_base_person(&self, id: Uuid) -> Result<Option<BasePerson>, AppError> {
        Ok(self.read()?.person.get(&id).map(|(first_name, last_name)| BasePerson {
            id,
            first_name: first_name.clone(),
            last_name: last_name.clone(),
        }))
    }

    async fn delete_any(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        if !tables.person.contains_key(&id) {
            return Ok(false);
        }
        for gender in Gender::ALL {
            tables.remove_subtype(gender, id);
        }
        tables.person.remove(&id);
        tracing::debug!(%id, "person deleted");
        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
