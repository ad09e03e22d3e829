//! Common test setup.

use std::sync::Arc;

use api::{router, AppState};
use axum::Router;
use ingest_core::UploadEvent;
use pipeline::{Pipeline, PipelineConfig, RegistryScope};

use crate::fixtures::{CRAWLER_NAME, EMAIL_DESTINATION, EMAIL_SOURCE, INPUT_BUCKET, TARGET_BUCKET};
use crate::mocks::{MockCrawlTrigger, MockMailer, MockObjectStore};

/// The real orchestrator and router wired to in-memory collaborators.
///
/// Input and target buckets live in the same mock store, so the registry
/// listing and the artifact writes can be inspected together.
pub struct TestContext {
    pub store: MockObjectStore,
    pub crawler: MockCrawlTrigger,
    pub mailer: MockMailer,
    pub pipeline: Arc<Pipeline>,
    pub router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Self::config())
    }

    pub fn with_scope(scope: RegistryScope) -> Self {
        Self::with_config(PipelineConfig {
            registry_scope: scope,
            ..Self::config()
        })
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let store = MockObjectStore::new();
        let crawler = MockCrawlTrigger::new();
        let mailer = MockMailer::new();

        let pipeline = Pipeline::new(
            config,
            Arc::new(store.clone()),
            Arc::new(crawler.clone()),
            Arc::new(mailer.clone()),
        )
        .expect("test pipeline configuration is valid");

        let state = AppState::new(pipeline);
        let pipeline = state.pipeline.clone();

        Self {
            store,
            crawler,
            mailer,
            pipeline,
            router: router(state),
        }
    }

    pub fn config() -> PipelineConfig {
        PipelineConfig {
            target_location: TARGET_BUCKET.to_string(),
            email_source: EMAIL_SOURCE.to_string(),
            email_destination: EMAIL_DESTINATION.to_string(),
            crawler_name: CRAWLER_NAME.to_string(),
            registry_scope: RegistryScope::Bucket,
        }
    }

    /// Place a capture in the input bucket, as the uploader would.
    pub fn upload(&self, key: &str, csv: impl Into<String>) {
        self.store
            .insert(INPUT_BUCKET, key, bytes::Bytes::from(csv.into()));
    }

    /// Upload event for a key in the input bucket.
    pub fn event(&self, key: &str) -> UploadEvent {
        UploadEvent::new("ObjectCreated:Put", INPUT_BUCKET, key)
    }

    /// Body of the most recent email.
    pub fn last_body(&self) -> String {
        self.mailer
            .sent()
            .last()
            .map(|e| e.report.body_html.clone())
            .unwrap_or_default()
    }

    pub fn artifact(&self, key: &str) -> Option<String> {
        self.store
            .object(TARGET_BUCKET, key)
            .map(|o| String::from_utf8_lossy(&o.body).into_owned())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
