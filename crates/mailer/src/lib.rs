//! Notification delivery for the device ingest pipeline.

pub mod config;
pub mod sender;
pub mod ses;

pub use config::*;
pub use sender::*;
pub use ses::SesMailer;
