//! Email notifier.

use std::sync::Arc;

use ingest_core::{EmailReport, Result};
use mailer::{Mailer, OutgoingEmail};
use telemetry::{health, metrics};
use tracing::{error, info};

/// Sends the one report email of an invocation.
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    source: String,
    destination: String,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Send the report. A failure here is the only one an invocation surfaces.
    pub async fn notify(&self, report: EmailReport) -> Result<String> {
        let warned = report.has_warning();
        let email = OutgoingEmail {
            source: self.source.clone(),
            destination: self.destination.clone(),
            report,
        };

        match self.mailer.send(&email).await {
            Ok(message_id) => {
                metrics().emails_sent.inc();
                health().mailer.set_healthy();
                if warned {
                    metrics().warnings_reported.inc();
                }
                info!(
                    to = %self.destination,
                    message_id = %message_id,
                    warning = warned,
                    "Notification sent"
                );
                Ok(message_id)
            }
            Err(e) => {
                metrics().email_errors.inc();
                health().mailer.set_unhealthy(e.to_string());
                error!(to = %self.destination, code = e.code(), "Notification failed: {}", e);
                Err(e)
            }
        }
    }
}
