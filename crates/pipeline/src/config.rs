//! Pipeline configuration.

use ingest_core::{Error, Result};
use serde::{Deserialize, Serialize};
use storage::TargetLocation;
use validator::Validate;

use crate::registry::RegistryScope;

/// Settings every invocation needs. Validated once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Where quality artifacts go: a bucket name or `s3://bucket/prefix`
    #[serde(default)]
    #[validate(length(min = 1, message = "target location is required"))]
    pub target_location: String,
    /// Sender address for notifications
    #[serde(default)]
    #[validate(email(message = "email source must be an address"))]
    pub email_source: String,
    /// Single recipient for notifications
    #[serde(default)]
    #[validate(email(message = "email destination must be an address"))]
    pub email_destination: String,
    /// Catalog crawler started for new devices
    #[serde(default = "default_crawler_name")]
    #[validate(length(min = 1))]
    pub crawler_name: String,
    /// How much of the bucket the device registry lists
    #[serde(default)]
    pub registry_scope: RegistryScope,
}

fn default_crawler_name() -> String {
    "baiot-input-data".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_location: String::new(),
            email_source: String::new(),
            email_destination: String::new(),
            crawler_name: default_crawler_name(),
            registry_scope: RegistryScope::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate fields and resolve the target location.
    pub fn check(&self) -> Result<TargetLocation> {
        self.validate()
            .map_err(|e| Error::config(format!("invalid pipeline configuration: {}", e)))?;
        TargetLocation::parse(&self.target_location)
    }
}
