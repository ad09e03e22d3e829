//! Pipeline orchestrator.
//!
//! Runs the stages for one upload event and always finishes with exactly one
//! notification. Stage failures become a warning in the email body; only a
//! failure to send that email is returned to the caller.

use std::sync::Arc;
use std::time::Instant;

use catalog::CrawlTrigger;
use ingest_core::{
    EmailReport, ObjectKeyFields, QualityReport, Result, S3EventNotification, UploadEvent,
};
use mailer::Mailer;
use serde::Serialize;
use storage::ObjectStore;
use telemetry::metrics;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::artifact::ArtifactWriter;
use crate::config::PipelineConfig;
use crate::crawl::{CrawlDispatcher, CrawlResult};
use crate::loader::TabularLoader;
use crate::notifier::Notifier;
use crate::registry::{DeviceRegistryChecker, DeviceStatus};

/// Invocation state. `Failed` is reachable from any stage after `Start`
/// and always moves on to `Notified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    KeyParsed,
    Loaded,
    DeviceChecked,
    QualityComputed,
    ArtifactWritten,
    Failed,
    Notified,
}

/// What the stages produced before finishing or failing.
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub stage: Stage,
    pub fields: Option<ObjectKeyFields>,
    pub row_count: Option<usize>,
    pub device_status: Option<DeviceStatus>,
    pub crawl: Option<CrawlResult>,
    pub artifact_key: Option<String>,
}

impl StageSummary {
    fn new() -> Self {
        Self {
            stage: Stage::Start,
            fields: None,
            row_count: None,
            device_status: None,
            crawl: None,
            artifact_key: None,
        }
    }

    fn advance(&mut self, stage: Stage) {
        self.stage = stage;
    }
}

/// Result of one invocation, as reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationOutcome {
    pub invocation_id: String,
    pub key: String,
    pub device: Option<String>,
    pub device_status: Option<DeviceStatus>,
    pub row_count: Option<usize>,
    pub crawl: Option<CrawlResult>,
    pub artifact_key: Option<String>,
    /// Last stage reached before notification
    pub last_stage: Stage,
    pub warning: Option<String>,
    pub message_id: String,
}

pub struct Pipeline {
    loader: TabularLoader,
    registry: DeviceRegistryChecker,
    crawler: CrawlDispatcher,
    writer: ArtifactWriter,
    notifier: Notifier,
}

impl Pipeline {
    /// Build a pipeline from validated configuration.
    ///
    /// Fails with `Config` when the configuration is incomplete, so a bad
    /// deployment is caught at startup rather than per invocation.
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn ObjectStore>,
        crawler: Arc<dyn CrawlTrigger>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self> {
        let target = config.check()?;

        info!(
            target = %target,
            crawler = %config.crawler_name,
            scope = ?config.registry_scope,
            "Pipeline configured"
        );

        Ok(Self {
            loader: TabularLoader::new(store.clone()),
            registry: DeviceRegistryChecker::new(store.clone(), config.registry_scope),
            crawler: CrawlDispatcher::new(crawler, config.crawler_name),
            writer: ArtifactWriter::new(store, target),
            notifier: Notifier::new(mailer, config.email_source, config.email_destination),
        })
    }

    /// Process every record of a notification document in order.
    ///
    /// A send failure stops the remaining records and is returned.
    pub async fn process_notification(
        &self,
        notification: &S3EventNotification,
    ) -> Result<Vec<InvocationOutcome>> {
        metrics().notifications_received.inc();

        let events = notification.upload_events();
        let mut outcomes = Vec::with_capacity(events.len());
        for event in &events {
            outcomes.push(self.process(event).await?);
        }
        Ok(outcomes)
    }

    /// Run one invocation to the `Notified` state.
    pub async fn process(&self, event: &UploadEvent) -> Result<InvocationOutcome> {
        let invocation_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "invocation",
            id = %invocation_id,
            bucket = %event.bucket_name,
            key = %event.object_key,
        );

        metrics().invocations.inc();
        metrics().in_flight_invocations.inc();
        let started = Instant::now();

        let result = self.invoke(event, invocation_id).instrument(span).await;

        metrics().in_flight_invocations.dec();
        metrics()
            .invocation_latency_ms
            .observe(started.elapsed().as_millis() as u64);

        result
    }

    async fn invoke(&self, event: &UploadEvent, invocation_id: String) -> Result<InvocationOutcome> {
        info!(action = %event.action, "Processing upload");

        let mut summary = StageSummary::new();
        let outcome = self.run_stages(event, &mut summary).await;

        let mut report = EmailReport::for_event(event, summary.row_count);
        if let (Some(DeviceStatus::New), Some(fields)) = (summary.device_status, &summary.fields) {
            report.note_new_device(&fields.device);
        }

        let last_stage = summary.stage;
        let warning = match outcome {
            Ok(()) => None,
            Err(e) => {
                warn!(stage = ?last_stage, code = e.code(), "Processing failed: {}", e);
                summary.advance(Stage::Failed);
                let text = e.to_string();
                report.warn(&text);
                Some(text)
            }
        };

        let message_id = self.notifier.notify(report).await?;
        summary.advance(Stage::Notified);

        info!(
            warning = warning.is_some(),
            rows = ?summary.row_count,
            artifact = ?summary.artifact_key,
            "Invocation complete"
        );

        Ok(InvocationOutcome {
            invocation_id,
            key: event.object_key.clone(),
            device: summary.fields.map(|f| f.device),
            device_status: summary.device_status,
            row_count: summary.row_count,
            crawl: summary.crawl,
            artifact_key: summary.artifact_key,
            last_stage,
            warning,
            message_id,
        })
    }

    /// Parse through artifact write. Any error returned here ends up as the
    /// email warning.
    async fn run_stages(&self, event: &UploadEvent, summary: &mut StageSummary) -> Result<()> {
        let fields = ObjectKeyFields::parse(&event.object_key).inspect_err(|_| {
            metrics().keys_rejected.inc();
        })?;
        summary.fields = Some(fields.clone());
        summary.advance(Stage::KeyParsed);

        let dataset = self
            .loader
            .load(&event.bucket_name, &event.object_key)
            .await?;
        summary.row_count = Some(dataset.row_count());
        summary.advance(Stage::Loaded);

        let status = self
            .registry
            .check(&event.bucket_name, &fields.device)
            .await;
        summary.device_status = Some(status);
        if status.is_new() {
            summary.crawl = Some(self.crawler.dispatch(&fields.device).await);
        }
        summary.advance(Stage::DeviceChecked);

        let report = QualityReport::compute(&dataset, &fields);
        summary.advance(Stage::QualityComputed);

        let key = self.writer.write(&report, &fields).await?;
        summary.artifact_key = Some(key);
        summary.advance(Stage::ArtifactWritten);

        Ok(())
    }
}

