//! Wire shapes exchanged with the remote operations

use crate::state::FieldSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reply shape shared by registration and provider sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteReply {
    pub ok: bool,
    #[serde(default)]
    pub message: String,
}

/// A reply that came back with `ok: false`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitRejection {
    pub message: String,
}

impl RemoteReply {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }

    pub fn into_result(self) -> Result<String, SubmitRejection> {
        if self.ok {
            Ok(self.message)
        } else {
            Err(SubmitRejection {
                message: self.message,
            })
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationRequest {
    pub fn from_fields(fields: &FieldSet) -> Self {
        let get = |name: &str| fields.value(name).unwrap_or_default().to_string();
        Self {
            email: get("email"),
            full_name: get("fullName"),
            password: get("password"),
            confirm_password: get("confirmPassword"),
        }
    }
}

/// Booking payload: form values overlaid with profile fields
pub type BookingRequest = Map<String, Value>;

/// Visitor profile as returned by the profile lookup. The shape is owned by
/// the remote side, so it is kept as an open JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRecord(pub Map<String, Value>);

impl ProfileRecord {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileLookup {
    pub ok: bool,
    #[serde(default)]
    pub user: Option<ProfileRecord>,
}

/// Who is using the forms, supplied by the host at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// A route transition handed to the navigator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub path: String,
    pub locale: Option<String>,
}

impl NavigationRequest {
    pub fn new(path: impl Into<String>, locale: Option<String>) -> Self {
        Self {
            path: path.into(),
            locale,
        }
    }
}

/// Overlay `context` on top of the form values. Context keys win on
/// collision, so profile identity cannot be overridden from the form.
pub fn merge_booking_payload(fields: &FieldSet, context: Option<&ProfileRecord>) -> BookingRequest {
    let mut payload: BookingRequest = fields
        .iter()
        .map(|f| (f.name.clone(), Value::String(f.value.clone())))
        .collect();
    if let Some(profile) = context {
        for (key, value) in &profile.0 {
            payload.insert(key.clone(), value.clone());
        }
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_reply_into_result() {
        assert_eq!(RemoteReply::accepted("Registered").into_result(), Ok("Registered".to_string()));
        let err: SubmitRejection = RemoteReply::rejected("Email already in use")
            .into_result()
            .unwrap_err();
        assert_eq!(err.message, "Email already in use");
        assert_eq!(err.to_string(), "Email already in use");
    }

    #[test]
    fn test_reply_without_message_deserializes() {
        let reply: RemoteReply = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(reply.ok);
        assert!(reply.message.is_empty());
    }

    #[test]
    fn test_registration_request_uses_camel_case() {
        let mut fields = FormKind::Registration.fields();
        fields.set_value("email", "a@b.com");
        fields.set_value("fullName", "A B");
        fields.set_value("password", "12345678");
        fields.set_value("confirmPassword", "12345678");

        let value = serde_json::to_value(RegistrationRequest::from_fields(&fields)).unwrap();
        assert_eq!(
            value,
            json!({
                "email": "a@b.com",
                "fullName": "A B",
                "password": "12345678",
                "confirmPassword": "12345678",
            })
        );
    }

    #[test]
    fn test_profile_lookup_without_user() {
        let lookup: ProfileLookup = serde_json::from_str(r#"{"ok": false}"#).unwrap();
        assert!(!lookup.ok);
        assert!(lookup.user.is_none());
    }

    #[test]
    fn test_identity_from_json() {
        let identity: Identity = serde_json::from_str(
            r#"{"displayName": "Visitor", "email": "v@example.org", "isAnonymous": true}"#,
        )
        .unwrap();
        assert!(identity.is_anonymous);
        assert_eq!(identity.display_name, "Visitor");
    }

    #[test]
    fn test_merge_without_context_is_form_values() {
        let mut fields = FormKind::Booking.fields();
        fields.set_value("inmateName", "John Doe");
        let payload = merge_booking_payload(&fields, None);
        assert_eq!(payload.len(), fields.len());
        assert_eq!(payload["inmateName"], json!("John Doe"));
        assert_eq!(payload["inmateNumber"], json!(""));
    }

    #[test]
    fn test_merge_profile_wins_on_collision() {
        let mut fields = FormKind::Booking.fields();
        fields.set_value("inmateName", "From Form");
        let profile: ProfileRecord = serde_json::from_value(json!({
            "inmateName": "From Profile",
            "email": "v@example.org",
            "phone": "555-0100",
        }))
        .unwrap();

        let payload = merge_booking_payload(&fields, Some(&profile));
        assert_eq!(payload["inmateName"], json!("From Profile"));
        assert_eq!(payload["email"], json!("v@example.org"));
        assert_eq!(payload["phone"], json!("555-0100"));
        assert_eq!(payload.len(), fields.len() + 2);
    }
}
