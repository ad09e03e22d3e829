//! The per-object ingest pipeline.
//!
//! One invocation per uploaded object:
//! - Parse the key into device / traffic type / attack / file name
//! - Load the capture from the object store
//! - Classify the device as new or known from a bucket listing
//! - Trigger the catalog crawler for new devices
//! - Write the zero-to-one quality artifact
//! - Send exactly one email, with a warning if any step failed

pub mod artifact;
pub mod config;
pub mod crawl;
pub mod loader;
pub mod notifier;
pub mod orchestrator;
pub mod registry;

pub use config::PipelineConfig;
pub use crawl::CrawlResult;
pub use orchestrator::*;
pub use registry::{DeviceStatus, RegistryScope};
