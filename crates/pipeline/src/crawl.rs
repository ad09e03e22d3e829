//! Crawl dispatch for new devices.

use std::sync::Arc;

use catalog::{CrawlOutcome, CrawlTrigger};
use serde::Serialize;
use telemetry::{health, metrics};
use tracing::{error, info};

/// What the pipeline records about a crawl request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum CrawlResult {
    Started,
    AlreadyRunning,
    Failed(String),
}

/// Fires the configured crawler once per new device.
pub struct CrawlDispatcher {
    trigger: Arc<dyn CrawlTrigger>,
    job_name: String,
}

impl CrawlDispatcher {
    pub fn new(trigger: Arc<dyn CrawlTrigger>, job_name: impl Into<String>) -> Self {
        Self {
            trigger,
            job_name: job_name.into(),
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Request a crawl. Failures are logged and returned as a value; they
    /// never stop the invocation or reach the email.
    pub async fn dispatch(&self, device: &str) -> CrawlResult {
        match self.trigger.start_crawl(&self.job_name).await {
            Ok(CrawlOutcome::Started) => {
                metrics().crawls_started.inc();
                health().catalog.set_healthy();
                info!(crawler = %self.job_name, device = %device, "Crawler started");
                CrawlResult::Started
            }
            Ok(CrawlOutcome::AlreadyRunning) => {
                metrics().crawls_already_running.inc();
                info!(crawler = %self.job_name, device = %device, "Crawler already running");
                CrawlResult::AlreadyRunning
            }
            Err(e) => {
                metrics().crawl_errors.inc();
                health().catalog.set_unhealthy(e.to_string());
                error!(
                    crawler = %self.job_name,
                    device = %device,
                    code = e.code(),
                    "Crawler start failed: {}",
                    e
                );
                CrawlResult::Failed(e.to_string())
            }
        }
    }
}
