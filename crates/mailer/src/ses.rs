//! Amazon SES (v2) transport.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sesv2::error::DisplayErrorContext;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use ingest_core::{Error, Result};
use tracing::{debug, info};

use crate::config::MailerConfig;
use crate::sender::{Mailer, OutgoingEmail};

/// SES-backed mailer.
#[derive(Clone)]
pub struct SesMailer {
    inner: aws_sdk_sesv2::Client,
    config: MailerConfig,
}

impl SesMailer {
    pub async fn new(config: MailerConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        info!(
            region = config.region.as_deref().unwrap_or("default"),
            "Created SES client"
        );

        Self {
            inner: aws_sdk_sesv2::Client::new(&sdk_config),
            config,
        }
    }
}

fn content(data: &str) -> Result<Content> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| Error::send(format!("build message content: {}", e)))
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let message = Message::builder()
            .subject(content(&email.report.subject)?)
            .body(Body::builder().html(content(&email.report.body_html)?).build())
            .build();

        let output = self
            .inner
            .send_email()
            .from_email_address(&email.source)
            .destination(
                Destination::builder()
                    .to_addresses(&email.destination)
                    .build(),
            )
            .content(EmailContent::builder().simple(message).build())
            .set_configuration_set_name(self.config.configuration_set.clone())
            .send()
            .await
            .map_err(|e| Error::send(format!("SES send_email: {}", DisplayErrorContext(&e))))?;

        let message_id = output.message_id().unwrap_or_default().to_string();
        debug!(message_id = %message_id, to = %email.destination, "Email accepted by SES");

        Ok(message_id)
    }
}
