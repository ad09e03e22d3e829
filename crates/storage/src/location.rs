//! Target location for derived artifacts.

use std::fmt;
use std::str::FromStr;

use ingest_core::{Error, Result};
use url::Url;

/// Bucket plus optional base prefix.
///
/// Accepts a bare bucket name (`quality-bucket`) or an S3 URL
/// (`s3://quality-bucket/base/prefix`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLocation {
    pub bucket: String,
    pub prefix: Option<String>,
}

impl TargetLocation {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::config("target location is empty"));
        }

        if !raw.contains("://") {
            if raw.contains('/') {
                return Err(Error::config(format!(
                    "target '{}' is neither a bucket name nor an s3:// URL",
                    raw
                )));
            }
            return Ok(Self {
                bucket: raw.to_string(),
                prefix: None,
            });
        }

        let url = Url::parse(raw)
            .map_err(|e| Error::config(format!("invalid target URL '{}': {}", raw, e)))?;

        if url.scheme() != "s3" {
            return Err(Error::config(format!(
                "unsupported target scheme '{}', expected s3",
                url.scheme()
            )));
        }

        let bucket = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::config(format!("target URL '{}' has no bucket", raw)))?
            .to_string();

        let prefix = url.path().trim_matches('/');
        let prefix = (!prefix.is_empty()).then(|| prefix.to_string());

        Ok(Self { bucket, prefix })
    }

    /// Qualify a relative key with the base prefix.
    pub fn qualify(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix, key),
            None => key.to_string(),
        }
    }
}

impl FromStr for TargetLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "s3://{}/{}", self.bucket, prefix),
            None => write!(f, "s3://{}", self.bucket),
        }
    }
}
