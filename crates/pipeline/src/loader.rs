//! Tabular loader.

use std::sync::Arc;

use ingest_core::{Dataset, Result};
use storage::ObjectStore;
use telemetry::metrics;
use tracing::{debug, warn};

/// Reads an uploaded object and parses it as a headed CSV table.
pub struct TabularLoader {
    store: Arc<dyn ObjectStore>,
}

impl TabularLoader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Load `bucket/key` into a dataset.
    ///
    /// Fails with `ObjectNotFound`, `Read` or `Parse`. Never retries.
    pub async fn load(&self, bucket: &str, key: &str) -> Result<Dataset> {
        let result = match self.store.get_object(bucket, key).await {
            Ok(body) => Dataset::from_csv_bytes(&body),
            Err(e) => Err(e),
        };

        match result {
            Ok(dataset) => {
                metrics().objects_loaded.inc();
                metrics().rows_loaded.inc_by(dataset.row_count() as u64);
                debug!(
                    bucket = %bucket,
                    key = %key,
                    rows = dataset.row_count(),
                    columns = dataset.column_count(),
                    "Loaded dataset"
                );
                Ok(dataset)
            }
            Err(e) => {
                metrics().load_errors.inc();
                warn!(bucket = %bucket, key = %key, code = e.code(), "Load failed: {}", e);
                Err(e)
            }
        }
    }
}
