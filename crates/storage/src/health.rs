//! Object store health checks.

use tracing::{debug, error};

use crate::store::ObjectStore;

/// Check that a bucket is reachable with the current credentials.
pub async fn check_connection(store: &dyn ObjectStore, bucket: &str) -> bool {
    match store.check_bucket(bucket).await {
        Ok(()) => {
            debug!(bucket = %bucket, "Object store connection healthy");
            true
        }
        Err(e) => {
            error!(bucket = %bucket, "Object store health check failed: {}", e);
            false
        }
    }
}
