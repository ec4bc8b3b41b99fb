//! SMTP relay delivery
//!
//! Sends an already-composed message through one authenticated session
//! with the relay. Each call opens its own connection; nothing is pooled
//! or retried.

use async_trait::async_trait;
use lettre::address::{Address, Envelope as SmtpEnvelope};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{error, info, instrument};

use crate::compose::ComposedMessage;
use crate::error::ContactError;
use crate::DeliveryConfig;

/// Relay host
pub const SMTP_HOST: &str = "smtp.gmail.com";

/// Relay submission port (STARTTLS)
pub const SMTP_PORT: u16 = 587;

/// Sender and recipients for one delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Envelope sender (`MAIL FROM`)
    pub from: String,

    /// Envelope recipients (`RCPT TO`), admin list then CC list
    pub recipients: Vec<String>,
}

impl Envelope {
    /// Envelope for a configured deployment
    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self {
            from: config.smtp_user.clone(),
            recipients: config.recipients(),
        }
    }

    /// Parse into lettre's envelope
    ///
    /// Surrounding whitespace is trimmed from each address and blank
    /// entries are skipped. Any address that still fails to parse, or an
    /// empty recipient set, is a delivery error.
    pub fn to_smtp(&self) -> Result<SmtpEnvelope, ContactError> {
        let from: Address = self.from.trim().parse()?;
        let to = self
            .recipients
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(|r| r.parse::<Address>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SmtpEnvelope::new(Some(from), to)?)
    }
}

/// Delivery backend
///
/// Implemented by [`SmtpRelay`] in production and by stubs in tests.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Deliver `message` to every recipient in `envelope` in a single call
    async fn deliver(
        &self,
        envelope: &Envelope,
        message: &ComposedMessage,
    ) -> Result<(), ContactError>;
}

/// Authenticated SMTP relay using lettre
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    /// Relay client for `smtp.gmail.com:587` with PLAIN authentication
    pub fn new(config: &DeliveryConfig) -> Result<Self, ContactError> {
        Self::with_relay(SMTP_HOST, SMTP_PORT, config)
    }

    /// Relay client for an arbitrary host and port
    pub fn with_relay(host: &str, port: u16, config: &DeliveryConfig) -> Result<Self, ContactError> {
        let credentials = Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(credentials)
            .authentication(vec![Mechanism::Plain])
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    #[instrument(skip(self, message), fields(recipients = envelope.recipients.len()))]
    async fn deliver(
        &self,
        envelope: &Envelope,
        message: &ComposedMessage,
    ) -> Result<(), ContactError> {
        let smtp_envelope = envelope.to_smtp()?;
        let raw = message.formatted();

        let response = self
            .transport
            .send_raw(&smtp_envelope, raw.as_bytes())
            .await
            .map_err(|e| {
                error!(error = %e, "SMTP relay send failed");
                ContactError::from(e)
            })?;

        info!(code = %response.code(), "Relay accepted message");
        Ok(())
    }
}
