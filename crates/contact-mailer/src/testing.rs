//! Stub transports for exercising the service and adapters offline

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::compose::ComposedMessage;
use crate::error::ContactError;
use crate::transport::{Envelope, MailTransport};

/// A delivery captured by [`RecordingTransport`]
#[derive(Debug, Clone)]
pub struct Delivery {
    pub envelope: Envelope,
    pub message: ComposedMessage,
}

/// Accepts every message and remembers what it was given
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().map(|d| d.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(
        &self,
        envelope: &Envelope,
        message: &ComposedMessage,
    ) -> Result<(), ContactError> {
        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.push(Delivery {
                envelope: envelope.clone(),
                message: message.clone(),
            });
        }
        Ok(())
    }
}

/// Rejects every message, counting attempts
#[derive(Debug, Clone, Default)]
pub struct FailingTransport {
    attempts: Arc<Mutex<usize>>,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|a| *a).unwrap_or(0)
    }
}

#[async_trait]
impl MailTransport for FailingTransport {
    async fn deliver(
        &self,
        _envelope: &Envelope,
        _message: &ComposedMessage,
    ) -> Result<(), ContactError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts += 1;
        }
        Err(ContactError::Delivery(
            "535 5.7.8 Username and Password not accepted".to_string(),
        ))
    }
}
