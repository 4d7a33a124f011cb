//! Declarative validation rules and the pure validator that evaluates them

use super::field::FieldSet;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Value format a rule checks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    String,
    Email,
}

/// Cross-field equality constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MustEqual {
    pub field: String,
    pub message: String,
}

/// Validation rule for one field, built Yup-style:
/// `FieldRule::new("email", "Email").required().email()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: String,
    pub label: String,
    pub required: bool,
    pub kind: ValueKind,
    pub min_len: Option<usize>,
    pub one_of: Option<&'static [&'static str]>,
    pub must_equal: Option<MustEqual>,
}

impl FieldRule {
    pub fn new(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            required: false,
            kind: ValueKind::String,
            min_len: None,
            one_of: None,
            must_equal: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn email(mut self) -> Self {
        self.kind = ValueKind::Email;
        self
    }

    pub fn min(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub fn one_of(mut self, options: &'static [&'static str]) -> Self {
        self.one_of = Some(options);
        self
    }

    pub fn must_equal(mut self, field: &str, message: &str) -> Self {
        self.must_equal = Some(MustEqual {
            field: field.to_string(),
            message: message.to_string(),
        });
        self
    }

    /// First failing check for `value`, in the order required, choice,
    /// format, length, equality.
    fn check(&self, value: &str, fields: &FieldSet) -> Option<FieldError> {
        if value.is_empty() {
            if self.required {
                return Some(FieldError::new(
                    ErrorKind::Required,
                    format!("{} is a required field", self.label),
                ));
            }
        } else {
            if let Some(options) = self.one_of {
                if !options.contains(&value) {
                    return Some(FieldError::new(
                        ErrorKind::InvalidChoice,
                        format!(
                            "{} must be one of the following values: {}",
                            self.label,
                            options.join(", ")
                        ),
                    ));
                }
            }
            if self.kind == ValueKind::Email && !is_well_formed_email(value) {
                return Some(FieldError::new(
                    ErrorKind::InvalidEmail,
                    format!("{} must be a valid email", self.label),
                ));
            }
            if let Some(min) = self.min_len {
                if value.chars().count() < min {
                    return Some(FieldError::new(
                        ErrorKind::TooShort,
                        format!("{} must be at least {} characters", self.label, min),
                    ));
                }
            }
        }

        if let Some(rule) = &self.must_equal {
            let other = fields.value(&rule.field).unwrap_or_default();
            if value != other {
                return Some(FieldError::new(ErrorKind::MustMatch, rule.message.clone()));
            }
        }

        None
    }
}

/// Static rule table for one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }
}

/// Error class, independent of the label baked into the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Required,
    InvalidEmail,
    TooShort,
    MustMatch,
    InvalidChoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

/// Failing fields only; a field missing from the result is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationResult {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the errors for fields the user has touched
    pub fn visible(&self, fields: &FieldSet) -> ValidationResult {
        let errors = self
            .errors
            .iter()
            .filter(|(name, _)| fields.is_touched(name))
            .map(|(name, err)| (name.clone(), err.clone()))
            .collect();
        ValidationResult { errors }
    }
}

/// Evaluate every rule against the current values. Pure: touched state is
/// ignored here so cross-field rules always see the whole form.
pub fn validate(fields: &FieldSet, rules: &RuleSet) -> ValidationResult {
    let errors = rules
        .iter()
        .filter_map(|rule| {
            let value = fields.value(&rule.field).unwrap_or_default();
            rule.check(value, fields).map(|e| (rule.field.clone(), e))
        })
        .collect();
    ValidationResult { errors }
}

// Address pattern:
// - dot-atom local part (no leading, trailing or doubled dots)
// - no quoting, comments or angle brackets
// - dotted domain of letter/digit labels without edge hyphens
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("EMAIL_REGEX: invalid regex pattern")
});

pub fn is_well_formed_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}
