//! Crawl trigger capability.

use async_trait::async_trait;
use ingest_core::Result;
use serde::{Deserialize, Serialize};

/// What happened when a crawl was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlOutcome {
    Started,
    /// The crawler was already running; the new objects will be picked up
    /// by that run or the next one.
    AlreadyRunning,
}

#[async_trait]
pub trait CrawlTrigger: Send + Sync {
    /// Ask the named crawler to start. Fails with `Trigger`.
    ///
    /// One attempt only; callers never retry.
    async fn start_crawl(&self, name: &str) -> Result<CrawlOutcome>;
}
