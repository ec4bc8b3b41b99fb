//! Contact Mailer - contact form submissions relayed over SMTP
//!
//! This crate holds everything both deployment shapes share:
//!
//! - [`Submission`] - the `name` / `email` / `message` payload posted by the form
//! - [`DeliveryConfig`] - SMTP credentials and recipient lists, loaded once at startup
//! - [`compose`] - renders the HTML notification and assembles its headers
//! - [`MailTransport`] / [`SmtpRelay`] - authenticated delivery through the relay
//! - [`ContactService`] - the compose-then-send unit of work
//!
//! ## Architecture
//!
//! ```text
//! contact-server (axum) ─┐
//!                        ├─→ ContactService → compose → SmtpRelay → smtp.gmail.com:587
//! contact-lambda ────────┘
//! ```
//!
//! Neither adapter reaches into the composer or transport directly; each one
//! decodes its platform's request into a [`Submission`], calls
//! [`ContactService::submit`], and maps the outcome back to a response.

use std::fmt;

pub mod compose;
pub mod error;
pub mod service;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;
pub mod types;

pub use compose::{compose, ComposedMessage, EMAIL_SUBJECT};
pub use error::ContactError;
pub use service::ContactService;
pub use transport::{Envelope, MailTransport, SmtpRelay, SMTP_HOST, SMTP_PORT};
pub use types::{Submission, SubmitResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the SMTP username (also the `From` address)
pub const ENV_SMTP_USER: &str = "SMTP_USER";
/// Environment variable holding the SMTP password
pub const ENV_SMTP_PASS: &str = "SMTP_PASS";
/// Environment variable holding the comma-separated admin recipients
pub const ENV_ADMIN_EMAIL: &str = "ADMIN_EMAIL";
/// Environment variable holding the comma-separated CC recipients
pub const ENV_CC_EMAILS: &str = "CC_EMAILS";

/// Delivery configuration for the contact relay
///
/// Built once at process start and shared read-only by every request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// SMTP username; also used as the sender address
    pub smtp_user: String,

    /// SMTP password
    pub smtp_pass: String,

    /// Admin recipients, comma-joined, exactly as configured
    pub admin_recipients: String,

    /// CC recipients, comma-joined, exactly as configured
    pub cc_recipients: String,
}

impl DeliveryConfig {
    /// Build a config from explicit values
    pub fn new(
        smtp_user: impl Into<String>,
        smtp_pass: impl Into<String>,
        admin_recipients: impl Into<String>,
        cc_recipients: impl Into<String>,
    ) -> Self {
        Self {
            smtp_user: smtp_user.into(),
            smtp_pass: smtp_pass.into(),
            admin_recipients: admin_recipients.into(),
            cc_recipients: cc_recipients.into(),
        }
    }

    /// Load from environment variables
    ///
    /// Unset variables become empty strings; nothing is validated here.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (used by `from_env` and tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            smtp_user: get(ENV_SMTP_USER),
            smtp_pass: get(ENV_SMTP_PASS),
            admin_recipients: get(ENV_ADMIN_EMAIL),
            cc_recipients: get(ENV_CC_EMAILS),
        }
    }

    /// Names of the environment variables that resolved to an empty value
    pub fn missing_values(&self) -> Vec<&'static str> {
        [
            (ENV_SMTP_USER, &self.smtp_user),
            (ENV_SMTP_PASS, &self.smtp_pass),
            (ENV_ADMIN_EMAIL, &self.admin_recipients),
            (ENV_CC_EMAILS, &self.cc_recipients),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect()
    }

    /// Admin recipients followed by CC recipients, each list split on commas
    ///
    /// Order and casing are preserved and duplicates are kept.
    pub fn recipients(&self) -> Vec<String> {
        self.admin_recipients
            .split(',')
            .chain(self.cc_recipients.split(','))
            .map(str::to_owned)
            .collect()
    }
}

impl fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &"<redacted>")
            .field("admin_recipients", &self.admin_recipients)
            .field("cc_recipients", &self.cc_recipients)
            .finish()
    }
}
