//! Device registry check.
//!
//! A device is new when exactly one object in the bucket has it as its first
//! key segment: the object that triggered this invocation. The check is a
//! point-in-time listing with no locking, so two concurrent first uploads for
//! the same device can both see a count of one and both trigger a crawl.

use std::collections::HashMap;
use std::sync::Arc;

use ingest_core::key::first_segment;
use serde::{Deserialize, Serialize};
use storage::ObjectStore;
use telemetry::metrics;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    New,
    Known,
}

impl DeviceStatus {
    /// Exactly one object means this upload is the device's first.
    pub fn from_occurrences(count: usize) -> Self {
        if count == 1 {
            Self::New
        } else {
            Self::Known
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }
}

/// Which keys the registry enumerates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryScope {
    /// List the whole bucket.
    #[default]
    Bucket,
    /// List only `<device>/`. Same answer for every key containing a `/`.
    DevicePrefix,
}

/// Occurrence count of each first key segment at listing time.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    devices: HashMap<String, usize>,
}

impl RegistrySnapshot {
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut devices = HashMap::new();
        for key in keys {
            *devices
                .entry(first_segment(key.as_ref()).to_string())
                .or_insert(0) += 1;
        }
        Self { devices }
    }

    pub fn occurrences(&self, device: &str) -> usize {
        self.devices.get(device).copied().unwrap_or(0)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

/// Classify a device against a set of keys.
pub fn classify<S: AsRef<str>>(keys: &[S], device: &str) -> DeviceStatus {
    DeviceStatus::from_occurrences(RegistrySnapshot::from_keys(keys).occurrences(device))
}

/// Lists the bucket and classifies devices.
pub struct DeviceRegistryChecker {
    store: Arc<dyn ObjectStore>,
    scope: RegistryScope,
}

impl DeviceRegistryChecker {
    pub fn new(store: Arc<dyn ObjectStore>, scope: RegistryScope) -> Self {
        Self { store, scope }
    }

    /// Classify `device` in `bucket`.
    ///
    /// A listing failure is logged and classified as known; it never fails
    /// the invocation.
    pub async fn check(&self, bucket: &str, device: &str) -> DeviceStatus {
        let prefix = match self.scope {
            RegistryScope::Bucket => None,
            RegistryScope::DevicePrefix => Some(format!("{}/", device)),
        };

        let keys = match self.store.list_keys(bucket, prefix.as_deref()).await {
            Ok(keys) => keys,
            Err(e) => {
                metrics().listing_errors.inc();
                warn!(
                    bucket = %bucket,
                    device = %device,
                    code = e.code(),
                    "Device listing failed, treating device as known: {}",
                    e
                );
                return DeviceStatus::Known;
            }
        };

        let snapshot = RegistrySnapshot::from_keys(&keys);
        let occurrences = snapshot.occurrences(device);
        let status = DeviceStatus::from_occurrences(occurrences);

        if occurrences == 0 {
            // The triggering object should always be listed. If the store's
            // consistency hides it, the device is reported as known and the
            // crawl is skipped for this upload.
            warn!(
                bucket = %bucket,
                device = %device,
                "Triggering object not visible in listing; device classified as known"
            );
        }

        debug!(
            bucket = %bucket,
            device = %device,
            occurrences = occurrences,
            listed_keys = keys.len(),
            devices = snapshot.device_count(),
            "Device registry checked"
        );

        if status.is_new() {
            metrics().new_devices.inc();
            info!(device = %device, "New device observed");
        }

        status
    }
}
