//! Field layouts and rule tables for the registration and booking forms

use super::field::{FieldSet, FormField};
use super::rules::{FieldRule, RuleSet};

pub const VISIT_REQUEST_OPTIONS: &[&str] = &["One-Time Visit", "Regular Visit"];
pub const FAMILY_AWARENESS_OPTIONS: &[&str] = &["Yes", "No"];

/// Which of the two forms a workflow drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Registration,
    Booking,
}

impl FormKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Booking => "booking",
        }
    }

    /// Fresh, empty fields in display order
    pub fn fields(&self) -> FieldSet {
        match self {
            Self::Registration => registration_fields(),
            Self::Booking => booking_fields(),
        }
    }

    pub fn rules(&self) -> RuleSet {
        match self {
            Self::Registration => registration_rules(),
            Self::Booking => booking_rules(),
        }
    }
}

fn registration_fields() -> FieldSet {
    FieldSet::new(vec![
        FormField::text("fullName", "Full Name"),
        FormField::text("email", "Email Address"),
        FormField::secret("password", "Password"),
        FormField::secret("confirmPassword", "Retype Password"),
    ])
}

fn registration_rules() -> RuleSet {
    RuleSet::new(vec![
        FieldRule::new("email", "Email").required().email(),
        FieldRule::new("fullName", "Full Name").required(),
        FieldRule::new("password", "Password").required().min(8),
        FieldRule::new("confirmPassword", "confirmPassword")
            .must_equal("password", "Passwords must match"),
    ])
}

fn booking_fields() -> FieldSet {
    FieldSet::new(vec![
        FormField::text("inmateName", "Name of Inmate"),
        FormField::text("inmateNumber", "Inmate Number (optional)"),
        FormField::select("visitRequest", "Visit request", VISIT_REQUEST_OPTIONS),
        FormField::text("relationshipToInmate", "Relationship to inmate"),
        FormField::text("reasonForVisit", "Reason for Visit"),
        FormField::select(
            "familyAwareness",
            "Is your request to visit supported by inmate's family member?",
            FAMILY_AWARENESS_OPTIONS,
        ),
    ])
}

fn booking_rules() -> RuleSet {
    RuleSet::new(vec![
        FieldRule::new("inmateName", "Name of inmate").required(),
        FieldRule::new("inmateNumber", "Inmate Number"),
        FieldRule::new("visitRequest", "Visit Request")
            .required()
            .one_of(VISIT_REQUEST_OPTIONS),
        FieldRule::new("relationshipToInmate", "Relation To Inmate").required(),
        FieldRule::new("reasonForVisit", "Reason For Visit").required(),
        FieldRule::new("familyAwareness", "Family Awareness")
            .required()
            .one_of(FAMILY_AWARENESS_OPTIONS),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::rules::{validate, ErrorKind};

    #[test]
    fn test_every_field_has_a_rule() {
        for kind in [FormKind::Registration, FormKind::Booking] {
            let rules = kind.rules();
            for field in kind.fields().iter() {
                assert!(
                    rules.rule(&field.name).is_some(),
                    "{} has no rule for {}",
                    kind.label(),
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_empty_booking_flags_required_fields_only() {
        let kind = FormKind::Booking;
        let result = validate(&kind.fields(), &kind.rules());
        assert_eq!(result.len(), 5);
        assert!(!result.contains("inmateNumber"));
        assert!(result.iter().all(|(_, e)| e.kind == ErrorKind::Required));
    }

    #[test]
    fn test_complete_booking_is_valid() {
        let kind = FormKind::Booking;
        let mut fields = kind.fields();
        fields.set_value("inmateName", "John Doe");
        fields.set_value("visitRequest", "Regular Visit");
        fields.set_value("relationshipToInmate", "Brother");
        fields.set_value("reasonForVisit", "Family matters");
        fields.set_value("familyAwareness", "Yes");
        assert!(validate(&fields, &kind.rules()).is_empty());
    }

    #[test]
    fn test_visit_request_options_on_field() {
        let fields = FormKind::Booking.fields();
        let field = fields.get("visitRequest").unwrap();
        assert_eq!(field.options(), VISIT_REQUEST_OPTIONS);
    }

    #[test]
    fn test_registration_password_fields_are_masked() {
        let fields = FormKind::Registration.fields();
        assert!(fields.get("password").unwrap().is_secret());
        assert!(fields.get("confirmPassword").unwrap().is_secret());
        assert!(!fields.get("email").unwrap().is_secret());
    }
}
