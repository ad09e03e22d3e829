//! Crawler configuration.

use serde::{Deserialize, Serialize};

/// Catalog client configuration. The crawler name is chosen per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Region the crawler lives in
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
        }
    }
}
