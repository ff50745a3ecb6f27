//! Family graph over the listed people and the kinship search between two of them.

mod relationship;

pub use relationship::{ordinal, Relationship};

use crate::model::{Gender, PersonRecord};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Member {
    pub gender: Gender,
    pub mother_id: Option<Uuid>,
    pub father_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default)]
pub struct Family {
    members: HashMap<Uuid, Member>,
}

/// A hit while walking one side's ancestors: generations on the walking side, then on the other side.
struct Meeting {
    near: u32,
    far: u32,
    half: bool,
}

impl Family {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PersonRecord>) -> Self {
        let members = records
            .into_iter()
            .map(|r| {
                let p = r.person();
                (
                    p.id,
                    Member {
                        gender: r.gender(),
                        mother_id: p.mother_id,
                        father_id: p.father_id,
                    },
                )
            })
            .collect();
        Family { members }
    }

    pub fn get(&self, id: Uuid) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Parents that are members of this family; links to people outside it are ignored.
    fn parents(&self, id: Uuid) -> (Option<Uuid>, Option<Uuid>) {
        let Some(member) = self.members.get(&id) else {
            return (None, None);
        };
        let known = |p: Option<Uuid>| p.filter(|p| self.members.contains_key(p));
        (known(member.mother_id), known(member.father_id))
    }

    /// How `other` is related to `person`, by breadth-first search of both people's
    /// ancestors in alternating steps that share one visited map.
    pub fn relationship(&self, person: Uuid, other: Uuid) -> Relationship {
        if person == other {
            return Relationship::related(0, 0);
        }
        let mut queue1 = VecDeque::from([(person, 0u32)]);
        let mut queue2 = VecDeque::from([(other, 0u32)]);
        let mut visited: HashMap<Uuid, u32> = HashMap::new();

        while !queue1.is_empty() || !queue2.is_empty() {
            if let Some((id, depth)) = queue1.pop_front() {
                if let Some(m) = self.step(id, depth, other, &mut queue1, &mut visited) {
                    return Relationship::Related {
                        up: m.near,
                        down: m.far,
                        half: m.half,
                    };
                }
            }
            if let Some((id, depth)) = queue2.pop_front() {
                if let Some(m) = self.step(id, depth, person, &mut queue2, &mut visited) {
                    return Relationship::Related {
                        up: m.far,
                        down: m.near,
                        half: m.half,
                    };
                }
            }
        }
        Relationship::Unrelated
    }

    fn step(
        &self,
        id: Uuid,
        depth: u32,
        target: Uuid,
        queue: &mut VecDeque<(Uuid, u32)>,
        visited: &mut HashMap<Uuid, u32>,
    ) -> Option<Meeting> {
        let (mother, father) = self.parents(id);
        if mother == Some(target) || father == Some(target) {
            return Some(Meeting {
                near: depth + 1,
                far: 0,
                half: false,
            });
        }

        let mother_depth = mother.and_then(|m| visited.get(&m).copied());
        let father_depth = father.and_then(|f| visited.get(&f).copied());
        match (mother_depth, father_depth) {
            (None, None) => {}
            (m, f) => {
                return Some(Meeting {
                    near: depth + 1,
                    far: m.max(f).unwrap_or_default(),
                    half: m.is_none() || f.is_none(),
                })
            }
        }

        for parent in [mother, father].into_iter().flatten() {
            queue.push_back((parent, depth + 1));
            visited.insert(parent, depth + 1);
        }
        None
    }
}
