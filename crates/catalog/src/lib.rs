//! Catalog refresh trigger for the device ingest pipeline.

pub mod config;
pub mod glue;
pub mod trigger;

pub use config::*;
pub use glue::GlueCrawler;
pub use trigger::*;
