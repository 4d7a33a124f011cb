//! Form domain layer
//!
//! Field values, the declarative rule tables for each form, and the pure
//! validator evaluating one against the other.

mod field;
mod rules;
mod schema;

pub use field::{FieldSet, FormField, InputKind};
pub use rules::{
    is_well_formed_email, validate, ErrorKind, FieldError, FieldRule, MustEqual, RuleSet,
    ValidationResult, ValueKind,
};
pub use schema::{FormKind, FAMILY_AWARENESS_OPTIONS, VISIT_REQUEST_OPTIONS};
