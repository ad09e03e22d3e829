//! Quality artifact writer.

use std::sync::Arc;

use bytes::Bytes;
use ingest_core::{ObjectKeyFields, QualityReport, Result};
use storage::{ObjectStore, TargetLocation};
use telemetry::metrics;
use tracing::{info, warn};

pub const ARTIFACT_CONTENT_TYPE: &str = "text/csv";

/// Persists quality reports under the target location.
pub struct ArtifactWriter {
    store: Arc<dyn ObjectStore>,
    target: TargetLocation,
}

impl ArtifactWriter {
    pub fn new(store: Arc<dyn ObjectStore>, target: TargetLocation) -> Self {
        Self { store, target }
    }

    pub fn target(&self) -> &TargetLocation {
        &self.target
    }

    /// Write the report and return the key it was stored under.
    ///
    /// Same input, same key, same bytes: a re-delivered event overwrites
    /// the artifact with identical content.
    pub async fn write(&self, report: &QualityReport, fields: &ObjectKeyFields) -> Result<String> {
        let key = self.target.qualify(&fields.artifact_key());
        let body = Bytes::from(report.to_csv()?);
        let size = body.len();

        match self
            .store
            .put_object(&self.target.bucket, &key, body, ARTIFACT_CONTENT_TYPE)
            .await
        {
            Ok(()) => {
                metrics().artifacts_written.inc();
                info!(bucket = %self.target.bucket, key = %key, bytes = size, "Artifact written");
                Ok(key)
            }
            Err(e) => {
                metrics().artifact_errors.inc();
                warn!(bucket = %self.target.bucket, key = %key, "Artifact write failed: {}", e);
                Err(e)
            }
        }
    }
}
