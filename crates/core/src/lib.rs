//! Core types for the device ingest pipeline.
//!
//! Everything in this crate is pure: key parsing, the typed dataset and its
//! CSV decoding, the zero-to-one quality aggregation, and notification
//! composition. Storage, mail and crawler access live in their own crates.

pub mod dataset;
pub mod email;
pub mod error;
pub mod events;
pub mod key;
pub mod quality;

pub use dataset::{Column, Dataset, Value};
pub use email::EmailReport;
pub use error::{Error, Result};
pub use events::*;
pub use key::ObjectKeyFields;
pub use quality::QualityReport;
