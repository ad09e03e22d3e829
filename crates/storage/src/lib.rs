//! Object store access for the device ingest pipeline.

pub mod client;
pub mod config;
pub mod health;
pub mod location;
pub mod store;

pub use client::*;
pub use config::*;
pub use location::TargetLocation;
pub use store::ObjectStore;
