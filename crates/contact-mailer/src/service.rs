//! The compose-then-send unit of work shared by both adapters

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::compose::{compose, EMAIL_SUBJECT};
use crate::error::ContactError;
use crate::transport::{Envelope, MailTransport, SmtpRelay};
use crate::types::Submission;
use crate::DeliveryConfig;

/// Relays contact form submissions to the configured recipients
///
/// Cheap to clone; the config and transport are shared behind `Arc`s and
/// never mutated after construction.
#[derive(Clone)]
pub struct ContactService {
    config: Arc<DeliveryConfig>,
    transport: Arc<dyn MailTransport>,
}

impl ContactService {
    /// Service over an explicit transport
    pub fn new(config: DeliveryConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Service delivering through the SMTP relay
    pub fn smtp(config: DeliveryConfig) -> Result<Self, ContactError> {
        let relay = SmtpRelay::new(&config)?;
        Ok(Self::new(config, Arc::new(relay)))
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Compose the notification for `submission` and hand it to the transport
    ///
    /// Blocks until the relay answers. Any failure, including a single
    /// rejected recipient, fails the whole call.
    #[instrument(skip_all)]
    pub async fn submit(&self, submission: &Submission) -> Result<(), ContactError> {
        let message = compose(submission, &self.config)?;
        let envelope = Envelope::from_config(&self.config);

        info!(subject = EMAIL_SUBJECT, "Sending email");
        debug!(message = %message.formatted(), "Message");

        self.transport
            .deliver(&envelope, &message)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to send email"))
    }
}
