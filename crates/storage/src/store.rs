//! Object store capability.
//!
//! The pipeline only ever needs three operations: read an object, enumerate
//! keys, and write an object. Keeping them behind a trait lets the listing be
//! swapped for a cheaper indexed lookup, and lets tests run without S3.

use async_trait::async_trait;
use bytes::Bytes;
use ingest_core::Result;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full body of an object.
    ///
    /// Fails with `ObjectNotFound` when the key does not exist and `Read`
    /// for any other failure.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Enumerate every key in the bucket, optionally under a prefix.
    ///
    /// Implementations must follow continuation tokens; a partial listing
    /// is never returned. Fails with `Listing`.
    async fn list_keys(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<String>>;

    /// Write an object, overwriting any existing one. Fails with `Write`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<()>;

    /// Cheap reachability probe for a bucket.
    async fn check_bucket(&self, bucket: &str) -> Result<()>;
}
