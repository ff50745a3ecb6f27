//! Person types shared by the stores, handlers and kinship graph.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Which sub-type table a person lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Resolve a URL path segment (`male` / `female`).
    pub fn from_segment(segment: &str) -> Option<Gender> {
        Gender::ALL.into_iter().find(|g| g.as_str() == segment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Sub-type table name.
    pub fn table(self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-type row merged with its base row's names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub mother_id: Option<Uuid>,
    pub father_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
}

/// Raw `person` row without sub-type fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasePerson {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// A listed person: exactly one of the two sub-types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersonRecord {
    Male(Person),
    Female(Person),
}

impl PersonRecord {
    pub fn new(gender: Gender, person: Person) -> Self {
        match gender {
            Gender::Male => PersonRecord::Male(person),
            Gender::Female => PersonRecord::Female(person),
        }
    }

    pub fn gender(&self) -> Gender {
        match self {
            PersonRecord::Male(_) => Gender::Male,
            PersonRecord::Female(_) => Gender::Female,
        }
    }

    pub fn person(&self) -> &Person {
        match self {
            PersonRecord::Male(p) | PersonRecord::Female(p) => p,
        }
    }

    pub fn into_entry(self) -> PersonEntry {
        let gender = self.gender();
        let Person {
            id,
            mother_id,
            father_id,
            first_name,
            last_name,
        } = match self {
            PersonRecord::Male(p) | PersonRecord::Female(p) => p,
        };
        PersonEntry {
            id,
            gender,
            mother_id,
            father_id,
            first_name,
            last_name,
        }
    }
}

/// Flattened aggregate view with a gender discriminator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonEntry {
    pub id: Uuid,
    pub gender: Gender,
    pub mother_id: Option<Uuid>,
    pub father_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
}

/// Body of `POST /male` and `POST /female`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPerson {
    pub mother_id: Option<Uuid>,
    pub father_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
}

/// Body of `POST /people`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewGenderedPerson {
    pub gender: Gender,
    #[serde(default)]
    pub mother_id: Option<Uuid>,
    #[serde(default)]
    pub father_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
}

impl NewGenderedPerson {
    pub fn split(self) -> (Gender, NewPerson) {
        (
            self.gender,
            NewPerson {
                mother_id: self.mother_id,
                father_id: self.father_id,
                first_name: self.first_name,
                last_name: self.last_name,
            },
        )
    }
}

/// Partial update. For parent ids the outer `Option` is "supplied", the inner one is the new value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersonPatch {
    #[serde(default, deserialize_with = "supplied")]
    #[schema(value_type = Option<Uuid>)]
    pub mother_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "supplied")]
    #[schema(value_type = Option<Uuid>)]
    pub father_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl PersonPatch {
    pub fn touches_links(&self) -> bool {
        self.mother_id.is_some() || self.father_id.is_some()
    }

    pub fn touches_names(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.touches_links() && !self.touches_names()
    }
}

fn supplied<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Answer of the kinship endpoint: what `relativeId` is to `personId`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Kinship {
    pub person_id: Uuid,
    pub relative_id: Uuid,
    pub label: String,
    /// Generations from the person up to the closest common ancestor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<u32>,
    /// Generations from that ancestor down to the relative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<u32>,
    pub half: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gender_segments() {
        assert_eq!(Gender::from_segment("male"), Some(Gender::Male));
        assert_eq!(Gender::from_segment("female"), Some(Gender::Female));
        assert_eq!(Gender::from_segment("Male"), None);
        assert_eq!(Gender::from_segment("people"), None);
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: PersonPatch = serde_json::from_value(json!({ "motherId": null, "firstName": "Maggie" })).unwrap();
        assert_eq!(patch.mother_id, Some(None));
        assert_eq!(patch.father_id, None);
        assert_eq!(patch.first_name.as_deref(), Some("Maggie"));
        assert!(patch.touches_links());
        assert!(!PersonPatch::default().touches_names());
    }

    #[test]
    fn entry_flattens_gender() {
        let id = Uuid::new_v4();
        let record = PersonRecord::Female(Person {
            id,
            mother_id: None,
            father_id: None,
            first_name: "Marge".into(),
            last_name: "Bouvier".into(),
        });
        let value = serde_json::to_value(record.into_entry()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": id,
                "gender": "female",
                "motherId": null,
                "fatherId": null,
                "firstName": "Marge",
                "lastName": "Bouvier",
            })
        );
    }
}
