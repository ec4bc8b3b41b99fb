//! Request/response structures for the contact form

use serde::{Deserialize, Serialize};

use crate::error::ContactError;

/// Acknowledgement text returned to the visitor after a successful send
pub const SUCCESS_MESSAGE: &str = "Thank you for your message! We will get back to you soon.";

/// Contact form submission
///
/// All three fields are required when decoding. Their contents are not
/// checked for shape; `email` in particular is free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Visitor's name
    pub name: String,

    /// Visitor's reply address, as typed
    pub email: String,

    /// Message body
    pub message: String,
}

impl Submission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Decode a submission from a raw JSON body
    pub fn from_json(body: &[u8]) -> Result<Self, ContactError> {
        serde_json::from_slice(body).map_err(ContactError::InvalidPayload)
    }
}

/// Response body for a delivered submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub message: String,
}

impl SubmitResponse {
    /// The fixed success acknowledgement
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Serialize to the JSON string sent on the wire
    pub fn to_json(&self) -> Result<String, ContactError> {
        serde_json::to_string(self).map_err(|e| ContactError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_submission() {
        let body = br#"{"name":"Ada","email":"ada@example.com","message":"Hello there"}"#;
        let submission = Submission::from_json(body).unwrap();
        assert_eq!(
            submission,
            Submission::new("Ada", "ada@example.com", "Hello there")
        );
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let body = br#"{"name":"Ada","email":"x","message":"m","phone":"555"}"#;
        assert!(Submission::from_json(body).is_ok());
    }

    #[test]
    fn test_email_is_not_validated() {
        let body = br#"{"name":"","email":"not an address","message":""}"#;
        let submission = Submission::from_json(body).unwrap();
        assert_eq!(submission.email, "not an address");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let body = br#"{"name":"Ada","email":"ada@example.com"}"#;
        assert!(matches!(
            Submission::from_json(body),
            Err(ContactError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_non_json_is_rejected() {
        assert!(matches!(
            Submission::from_json(b"name=Ada&email=x"),
            Err(ContactError::InvalidPayload(_))
        ));
        assert!(matches!(
            Submission::from_json(b""),
            Err(ContactError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let body = br#"{"name":1,"email":"ada@example.com","message":"hi"}"#;
        assert!(Submission::from_json(body).is_err());
    }

    #[test]
    fn test_success_body_is_exact() {
        assert_eq!(
            SubmitResponse::success().to_json().unwrap(),
            r#"{"status":"success","message":"Thank you for your message! We will get back to you soon."}"#
        );
    }
}
