//! Request body validation against declared field schemas.
//!
//! A body is checked field by field and every problem is reported, not just the
//! first one. Only a body that passes is deserialized into its typed payload.

use crate::error::{AppError, ValidationErrors};
use crate::model::Gender;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// UUID in its string form.
    Id,
    Gender,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Id => "uuid string",
            FieldKind::Gender => "'male' | 'female'",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

const fn field(name: &'static str, kind: FieldKind, required: bool, nullable: bool) -> FieldRule {
    FieldRule {
        name,
        kind,
        required,
        nullable,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BodySchema {
    pub fields: &'static [FieldRule],
    /// Reject keys that are not declared.
    pub strict: bool,
}

/// `POST /male`, `POST /female`: both parent ids must be present, possibly null.
pub const CREATE_PERSON: BodySchema = BodySchema {
    fields: &[
        field("motherId", FieldKind::Id, true, true),
        field("fatherId", FieldKind::Id, true, true),
        field("firstName", FieldKind::Text, true, false),
        field("lastName", FieldKind::Text, true, false),
    ],
    strict: true,
};

/// `PATCH /male/{id}`, `PATCH /female/{id}`.
pub const UPDATE_PERSON: BodySchema = BodySchema {
    fields: &[
        field("motherId", FieldKind::Id, false, true),
        field("fatherId", FieldKind::Id, false, true),
        field("firstName", FieldKind::Text, false, false),
        field("lastName", FieldKind::Text, false, false),
    ],
    strict: true,
};

/// `POST /people`: unknown keys are ignored.
pub const CREATE_GENDERED_PERSON: BodySchema = BodySchema {
    fields: &[
        field("gender", FieldKind::Gender, true, false),
        field("motherId", FieldKind::Id, false, true),
        field("fatherId", FieldKind::Id, false, true),
        field("firstName", FieldKind::Text, true, false),
        field("lastName", FieldKind::Text, true, false),
    ],
    strict: false,
};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate `body` and deserialize it into `T`.
    pub fn parse<T: DeserializeOwned>(body: Value, schema: &BodySchema) -> Result<T, AppError> {
        Self::validate(&body, schema)?;
        serde_json::from_value(body).map_err(|e| AppError::Validation(ValidationErrors::single("", e.to_string())))
    }

    pub fn validate(body: &Value, schema: &BodySchema) -> Result<(), ValidationErrors> {
        let Value::Object(map) = body else {
            return Err(ValidationErrors::single(
                "",
                format!("expected object, received {}", type_name(body)),
            ));
        };
        let mut errors = ValidationErrors::default();
        for rule in schema.fields {
            match map.get(rule.name) {
                None if rule.required => errors.push(rule.name, "required"),
                None => {}
                Some(Value::Null) if rule.nullable => {}
                Some(v) => {
                    if let Some(message) = check_kind(rule.kind, v) {
                        errors.push(rule.name, message);
                    }
                }
            }
        }
        if schema.strict {
            for key in map.keys() {
                if !schema.fields.iter().any(|f| f.name == key) {
                    errors.push(key.as_str(), "unrecognized key");
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_kind(kind: FieldKind, v: &Value) -> Option<String> {
    let Some(s) = v.as_str() else {
        return Some(format!("expected {}, received {}", kind.expected(), type_name(v)));
    };
    match kind {
        FieldKind::Text => None,
        FieldKind::Id => uuid::Uuid::parse_str(s)
            .err()
            .map(|_| format!("expected {}, received '{}'", kind.expected(), s)),
        FieldKind::Gender => match Gender::from_segment(s) {
            Some(_) => None,
            None => Some(format!("expected {}, received '{}'", kind.expected(), s)),
        },
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
