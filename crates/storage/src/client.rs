//! S3 client wrapper.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use ingest_core::{Error, Result};
use telemetry::metrics;
use tracing::{debug, info};

use crate::config::S3Config;
use crate::store::ObjectStore;

/// S3-backed object store.
#[derive(Clone)]
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    config: S3Config,
}

impl S3Client {
    /// Creates a new client from the default AWS credential chain.
    pub async fn new(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(config.timeout_secs))
                    .build(),
            )
            .build();

        info!(
            region = config.region.as_deref().unwrap_or("default"),
            endpoint = config.endpoint_url.as_deref().unwrap_or("aws"),
            "Created S3 client"
        );

        Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            config,
        }
    }

    /// Returns the inner SDK client.
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    /// Returns the configuration.
    pub fn config(&self) -> &S3Config {
        &self.config
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let start = Instant::now();

        let output = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    Error::not_found(bucket, key)
                } else {
                    Error::read(format!(
                        "get s3://{}/{}: {}",
                        bucket,
                        key,
                        DisplayErrorContext(&e)
                    ))
                }
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| Error::read(format!("read body of s3://{}/{}: {}", bucket, key, e)))?
            .into_bytes();

        metrics()
            .load_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        debug!(bucket = %bucket, key = %key, bytes = body.len(), "Fetched object");

        Ok(body)
    }

    async fn list_keys(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<String>> {
        let start = Instant::now();

        let mut pages = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(str::to_string))
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                Error::listing(format!("list s3://{}: {}", bucket, DisplayErrorContext(&e)))
            })?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }

        metrics()
            .listing_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        debug!(bucket = %bucket, prefix = ?prefix, count = keys.len(), "Listed keys");

        Ok(keys)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<()> {
        let size = body.len();

        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                Error::write(format!(
                    "put s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(bucket = %bucket, key = %key, bytes = size, "Wrote object");
        Ok(())
    }

    async fn check_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| Error::read(format!("head s3://{}: {}", bucket, DisplayErrorContext(&e))))?;
        Ok(())
    }
}
