//! S3 configuration.

use serde::{Deserialize, Serialize};

/// S3 client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Region override; the SDK default chain is used when unset
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (required by most S3-compatible stores)
    #[serde(default)]
    pub force_path_style: bool,
    /// Operation timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            force_path_style: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}
