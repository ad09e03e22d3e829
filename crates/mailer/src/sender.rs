//! Mail capability.

use async_trait::async_trait;
use ingest_core::{EmailReport, Result};

/// A single-recipient outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub source: String,
    pub destination: String,
    pub report: EmailReport,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message, returning the transport's message id.
    ///
    /// Fails with `Send`. Retries, if any, belong to the transport.
    async fn send(&self, email: &OutgoingEmail) -> Result<String>;
}
