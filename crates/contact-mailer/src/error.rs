//! Error types for the contact mailer

use thiserror::Error;

/// Errors raised while turning a submission into a delivered email
#[derive(Debug, Error)]
pub enum ContactError {
    /// Body is not JSON or does not match the submission shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// The HTML template failed to render
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Relay unreachable, authentication refused, or a recipient rejected
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Response body could not be serialized
    #[error("Encoding error: {0}")]
    Encode(String),
}

impl ContactError {
    /// True when the caller sent something unusable (maps to a 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ContactError::InvalidPayload(_))
    }
}

impl From<lettre::transport::smtp::Error> for ContactError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        ContactError::Delivery(err.to_string())
    }
}

impl From<lettre::address::AddressError> for ContactError {
    fn from(err: lettre::address::AddressError) -> Self {
        ContactError::Delivery(format!("invalid address: {}", err))
    }
}

impl From<lettre::error::Error> for ContactError {
    fn from(err: lettre::error::Error) -> Self {
        ContactError::Delivery(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_payload_errors_are_client_errors() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(ContactError::InvalidPayload(bad_json).is_client_error());
        assert!(!ContactError::Delivery("535 auth".into()).is_client_error());
        assert!(!ContactError::Encode("x".into()).is_client_error());
    }

    #[test]
    fn test_address_error_is_delivery_error() {
        let err = "not-an-address"
            .parse::<lettre::Address>()
            .unwrap_err();
        let contact: ContactError = err.into();
        assert!(matches!(contact, ContactError::Delivery(msg) if msg.starts_with("invalid address")));
    }
}
