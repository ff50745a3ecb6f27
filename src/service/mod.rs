//! Request validation and the demo seed on top of the person store.

mod seed;
mod validation;
pub use seed::seed_family;
pub use validation::{
    BodySchema, FieldKind, FieldRule, RequestValidator, CREATE_GENDERED_PERSON, CREATE_PERSON, UPDATE_PERSON,
};
