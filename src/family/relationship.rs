//! Kinship labels. A relationship is the pair of generation counts from each
//! person up to their closest common ancestor: you and your aunt meet at your
//! grandparents, two generations up from you and one down to her, `(2, 1)`.

use crate::model::Gender;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relationship {
    Unrelated,
    Related { up: u32, down: u32, half: bool },
}

/// The 3x3 block of relatives that have a name of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BaseRelative {
    Myself,
    Child,
    Grandchild,
    Parent,
    Sibling,
    NieceOrNephew,
    Grandparent,
    AuntOrUncle,
    Cousin,
}

const BASE_RELATIVES: [[BaseRelative; 3]; 3] = [
    [BaseRelative::Myself, BaseRelative::Child, BaseRelative::Grandchild],
    [BaseRelative::Parent, BaseRelative::Sibling, BaseRelative::NieceOrNephew],
    [BaseRelative::Grandparent, BaseRelative::AuntOrUncle, BaseRelative::Cousin],
];

impl BaseRelative {
    /// (neutral, male, female)
    fn words(self) -> (Option<&'static str>, Option<&'static str>, Option<&'static str>) {
        match self {
            BaseRelative::Myself => (Some("self"), None, None),
            BaseRelative::Child => (Some("child"), Some("son"), Some("daughter")),
            BaseRelative::Grandchild => (Some("grandchild"), Some("grandson"), Some("granddaughter")),
            BaseRelative::Parent => (Some("parent"), Some("father"), Some("mother")),
            BaseRelative::Sibling => (Some("sibling"), Some("brother"), Some("sister")),
            BaseRelative::NieceOrNephew => (None, Some("nephew"), Some("niece")),
            BaseRelative::Grandparent => (Some("grandparent"), Some("grandfather"), Some("grandmother")),
            BaseRelative::AuntOrUncle => (None, Some("uncle"), Some("aunt")),
            BaseRelative::Cousin => (Some("cousin"), None, None),
        }
    }

    fn label(self, gender: Option<Gender>) -> String {
        let (neutral, male, female) = self.words();
        let word = match gender {
            Some(Gender::Male) => male.or(neutral),
            Some(Gender::Female) => female.or(neutral),
            None => neutral,
        };
        match word {
            Some(w) => w.to_string(),
            None => format!("{} or {}", female.unwrap_or_default(), male.unwrap_or_default()),
        }
    }
}

impl Relationship {
    pub fn related(up: u32, down: u32) -> Self {
        Relationship::Related { up, down, half: false }
    }

    /// English name of the relative, gendered by the relative's gender when known.
    pub fn label(&self, gender: Option<Gender>) -> String {
        let Relationship::Related { up, down, half } = *self else {
            return "unrelated".to_string();
        };
        let g = gender;
        let label = match (up, down) {
            (u, d) if u < 3 && d < 3 => BASE_RELATIVES[u as usize][d as usize].label(g),
            (0, d) => format!("{} {}", great(d - 2), BaseRelative::Grandchild.label(g)),
            (1, d) => format!("{} grand {}", great(d - 3), BaseRelative::NieceOrNephew.label(g)),
            (u, 0) => format!("{} {}", great(u - 2), BaseRelative::Grandparent.label(g)),
            (u, 1) => format!(
                "{}{} {}",
                great(u.saturating_sub(3).max(1)),
                if u > 3 { " grand" } else { "" },
                BaseRelative::AuntOrUncle.label(g)
            ),
            (u, d) => format!(
                "{} {} {}",
                ordinal(u.min(d) - 1),
                BaseRelative::Cousin.label(g),
                removed(u.abs_diff(d))
            ),
        };
        let label = label.trim();
        if half {
            format!("half {}", label)
        } else {
            label.to_string()
        }
    }
}

fn great(n: u32) -> String {
    match n {
        0 => String::new(),
        1 => "great".to_string(),
        2 => "great great".to_string(),
        n => format!("{} great", ordinal(n)),
    }
}

fn removed(n: u32) -> String {
    match n {
        0 => String::new(),
        1 => "once removed".to_string(),
        2 => "twice removed".to_string(),
        3 => "thrice removed".to_string(),
        n => format!("{} times removed", n),
    }
}

pub fn ordinal(n: u32) -> String {
    let suffix = if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        ["th", "st", "nd", "rd", "th"][(n % 10).min(4) as usize]
    };
    format!("{}{}", n, suffix)
}
