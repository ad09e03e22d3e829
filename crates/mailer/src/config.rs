//! Mail transport configuration.

use serde::{Deserialize, Serialize};

/// SES client configuration. Addresses live in the pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailerConfig {
    /// Region override; the SDK default chain is used when unset
    #[serde(default)]
    pub region: Option<String>,
    /// Optional SES configuration set for delivery tracking
    #[serde(default)]
    pub configuration_set: Option<String>,
}
