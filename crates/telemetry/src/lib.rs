//! Telemetry for the device ingest pipeline.
//!
//! Structured logging setup, an in-process metrics registry, and component
//! health used by the readiness probe.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
