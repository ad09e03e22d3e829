//! In-memory collaborators.
//!
//! Each mock implements the same capability trait as its AWS counterpart,
//! so the real orchestrator and router run unchanged. Failure switches let
//! tests drive every error path.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use catalog::{CrawlOutcome, CrawlTrigger};
use ingest_core::{Error, Result};
use mailer::{Mailer, OutgoingEmail};
use parking_lot::Mutex;
use storage::ObjectStore;

/// A stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// Object store backed by a map of `(bucket, key)`.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<Mutex<BTreeMap<(String, String), StoredObject>>>,
    /// Keys present but left out of listings, as an eventually consistent
    /// store might.
    hidden: Arc<Mutex<BTreeSet<(String, String)>>>,
    puts: Arc<Mutex<Vec<(String, String)>>>,
    fail_get: Arc<Mutex<bool>>,
    fail_list: Arc<Mutex<bool>>,
    fail_put: Arc<Mutex<bool>>,
    get_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a put.
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.objects.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                content_type: "text/csv".to_string(),
            },
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Every `(bucket, key)` written through `put_object`, in order.
    pub fn puts(&self) -> Vec<(String, String)> {
        self.puts.lock().clone()
    }

    pub fn hide_from_listing(&self, bucket: &str, key: &str) {
        self.hidden
            .lock()
            .insert((bucket.to_string(), key.to_string()));
    }

    pub fn reveal_in_listing(&self, bucket: &str, key: &str) {
        self.hidden
            .lock()
            .remove(&(bucket.to_string(), key.to_string()));
    }

    /// Make every read wait before answering, like a slow network fetch.
    pub fn set_get_delay(&self, delay: Duration) {
        *self.get_delay.lock() = Some(delay);
    }

    pub fn set_fail_get(&self, fail: bool) {
        *self.fail_get.lock() = fail;
    }

    pub fn set_fail_list(&self, fail: bool) {
        *self.fail_list.lock() = fail;
    }

    pub fn set_fail_put(&self, fail: bool) {
        *self.fail_put.lock() = fail;
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let delay = *self.get_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_get.lock() {
            return Err(Error::read("mock get failure"));
        }
        self.object(bucket, key)
            .map(|o| o.body)
            .ok_or_else(|| Error::not_found(bucket, key))
    }

    async fn list_keys(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<String>> {
        if *self.fail_list.lock() {
            return Err(Error::listing("mock list failure"));
        }
        let hidden = self.hidden.lock().clone();
        Ok(self
            .objects
            .lock()
            .keys()
            .filter(|(b, _)| b == bucket)
            .filter(|entry| !hidden.contains(*entry))
            .map(|(_, k)| k.clone())
            .filter(|k| prefix.map_or(true, |p| k.starts_with(p)))
            .collect())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<()> {
        if *self.fail_put.lock() {
            return Err(Error::write("mock put failure"));
        }
        self.puts.lock().push((bucket.to_string(), key.to_string()));
        self.objects.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn check_bucket(&self, _bucket: &str) -> Result<()> {
        Ok(())
    }
}

/// How the mock crawler answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlMode {
    #[default]
    Start,
    AlreadyRunning,
    Fail,
}

/// Crawl trigger that records requested crawler names.
#[derive(Clone, Default)]
pub struct MockCrawlTrigger {
    calls: Arc<Mutex<Vec<String>>>,
    mode: Arc<Mutex<CrawlMode>>,
}

impl MockCrawlTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn set_mode(&self, mode: CrawlMode) {
        *self.mode.lock() = mode;
    }
}

#[async_trait]
impl CrawlTrigger for MockCrawlTrigger {
    async fn start_crawl(&self, name: &str) -> Result<CrawlOutcome> {
        self.calls.lock().push(name.to_string());
        match *self.mode.lock() {
            CrawlMode::Start => Ok(CrawlOutcome::Started),
            CrawlMode::AlreadyRunning => Ok(CrawlOutcome::AlreadyRunning),
            CrawlMode::Fail => Err(Error::trigger("mock crawler failure")),
        }
    }
}

/// Mailer that captures outgoing messages.
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    attempts: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Send attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        *self.attempts.lock() += 1;
        if *self.should_fail.lock() {
            return Err(Error::send("mock mailer failure"));
        }
        let mut sent = self.sent.lock();
        sent.push(email.clone());
        Ok(format!("mock-message-{}", sent.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_round_trip() {
        let store = MockObjectStore::new();
        store
            .put_object("b", "dev1/a.csv", Bytes::from_static(b"x"), "text/csv")
            .await
            .unwrap();

        assert_eq!(store.get_object("b", "dev1/a.csv").await.unwrap(), "x");
        assert_eq!(store.puts().len(), 1);

        let err = store.get_object("b", "missing").await.unwrap_err();
        assert_eq!(err.code(), "STORE_001");
    }

    #[tokio::test]
    async fn test_mock_store_listing_respects_prefix_and_hidden() {
        let store = MockObjectStore::new();
        store.insert("b", "dev1/x", "1");
        store.insert("b", "dev2/x", "2");
        store.insert("other", "dev1/y", "3");
        store.hide_from_listing("b", "dev2/x");

        assert_eq!(store.list_keys("b", None).await.unwrap(), vec!["dev1/x"]);
        assert!(store.list_keys("b", Some("dev2/")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_mailer_failure_mode() {
        let mailer = MockMailer::new();
        mailer.set_should_fail(true);

        let email = OutgoingEmail {
            source: "a@example.com".into(),
            destination: "b@example.com".into(),
            report: ingest_core::EmailReport::new("s", "b"),
        };
        assert!(mailer.send(&email).await.is_err());
        assert_eq!(mailer.attempts(), 1);
        assert_eq!(mailer.sent_count(), 0);
    }
}
