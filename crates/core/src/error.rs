//! Unified error types for the ingest pipeline.
//!
//! Error codes:
//! - KEY_001: Object key does not split into four segments
//! - STORE_001-004: Object store read, listing and write errors
//! - DATA_001: Tabular parse errors
//! - CATALOG_001: Crawler invocation errors
//! - MAIL_001: Notification delivery errors
//! - EVENT_001: Undecodable trigger documents

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the ingest pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed object key '{key}': expected 4 '/'-separated segments, found {segments}")]
    MalformedKey { key: String, segments: usize },

    #[error("object not found: s3://{bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("read error: {0}")]
    Read(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("listing error: {0}")]
    Listing(String),

    #[error("trigger error: {0}")]
    Trigger(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("send error: {0}")]
    Send(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn malformed_key(key: impl Into<String>, segments: usize) -> Self {
        Self::MalformedKey {
            key: key.into(),
            segments,
        }
    }

    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn listing(msg: impl Into<String>) -> Self {
        Self::Listing(msg.into())
    }

    pub fn trigger(msg: impl Into<String>) -> Self {
        Self::Trigger(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    pub fn send(msg: impl Into<String>) -> Self {
        Self::Send(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable code used in logs and API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedKey { .. } => "KEY_001",
            Self::ObjectNotFound { .. } => "STORE_001",
            Self::Read(_) => "STORE_002",
            Self::Listing(_) => "STORE_003",
            Self::Write(_) => "STORE_004",
            Self::Parse(_) => "DATA_001",
            Self::Trigger(_) => "CATALOG_001",
            Self::Send(_) => "MAIL_001",
            Self::Config(_) => "CONFIG_001",
            Self::Serialization(_) => "EVENT_001",
            Self::Internal(_) => "INTERNAL_001",
        }
    }

    /// Whether this error may escape an invocation.
    ///
    /// Only a failed notification has no further channel to be reported on;
    /// everything else is folded into the email as a warning.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Send(_))
    }
}
