//! AWS Glue crawler client.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_glue::error::DisplayErrorContext;
use ingest_core::{Error, Result};
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::trigger::{CrawlOutcome, CrawlTrigger};

/// Glue-backed crawl trigger.
#[derive(Clone)]
pub struct GlueCrawler {
    inner: aws_sdk_glue::Client,
    config: CatalogConfig,
}

impl GlueCrawler {
    pub async fn new(config: CatalogConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        info!(region = %config.region, "Created Glue client");

        Self {
            inner: aws_sdk_glue::Client::new(&sdk_config),
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

#[async_trait]
impl CrawlTrigger for GlueCrawler {
    async fn start_crawl(&self, name: &str) -> Result<CrawlOutcome> {
        match self.inner.start_crawler().name(name).send().await {
            Ok(_) => {
                debug!(crawler = %name, "Glue accepted crawler start");
                Ok(CrawlOutcome::Started)
            }
            Err(e) => {
                let running = e
                    .as_service_error()
                    .map(|se| se.is_crawler_running_exception())
                    .unwrap_or(false);
                if running {
                    Ok(CrawlOutcome::AlreadyRunning)
                } else {
                    Err(Error::trigger(format!(
                        "start crawler '{}': {}",
                        name,
                        DisplayErrorContext(&e)
                    )))
                }
            }
        }
    }
}
