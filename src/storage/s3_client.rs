//! S3-compatible storage client
//!
//! Wraps the AWS SDK for S3-compatible storage access.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    primitives::{ByteStream, DateTime as SmithyDateTime},
    Client,
};
use chrono::{DateTime, Utc};

use crate::config::StorageConfig;
use crate::error::StorageError;

use super::types::{public_object_url, ListOptions, ObjectList, ObjectMetadata};
use super::{BlobStore, StorageResult};

/// S3-compatible storage client
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Client {
    /// Create a new S3 client from configuration
    ///
    /// Credentials come from the default provider chain of the hosting
    /// environment (env vars, shared profile, instance role).
    pub async fn new(config: &StorageConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region().to_string()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            // Required for MinIO and other S3-compatible services
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt operations anyway.",
                    bucket,
                    DisplayErrorContext(&e)
                );
            }
        }

        Self {
            client,
            bucket,
            public_base_url: config.public_base_url(),
        }
    }

    fn sdk_error<E, R>(&self, err: &SdkError<E, R>, action: String) -> StorageError
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        classify_error(
            err.code(),
            &self.bucket,
            format!("{}: {}", action, DisplayErrorContext(err)),
        )
    }
}

/// Map an S3 error code to a storage error carrying the upstream text
fn classify_error(code: Option<&str>, bucket: &str, detail: String) -> StorageError {
    match code {
        Some("NoSuchBucket") => StorageError::BucketNotFound(format!("{} ({})", bucket, detail)),
        Some("AccessDenied") => StorageError::AccessDenied(detail),
        _ => StorageError::SdkError(detail),
    }
}

fn to_chrono(dt: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait]
impl BlobStore for S3Client {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<ObjectMetadata> {
        let size = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| self.sdk_error(&e, format!("Failed to put object {}", key)))?;

        tracing::debug!(key = %key, size = size, "Object stored");

        // PUT does not echo size or creation time; read them back from the store
        self.head_object(key).await
    }

    async fn head_object(&self, key: &str) -> StorageResult<ObjectMetadata> {
        let response = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                    StorageError::ObjectNotFound(key.to_string())
                } else {
                    self.sdk_error(&e, format!("Failed to head object {}", key))
                }
            })?;

        Ok(ObjectMetadata {
            key: key.to_string(),
            size: response.content_length().unwrap_or(0),
            last_modified: response.last_modified().and_then(to_chrono),
            content_type: response.content_type().map(|s| s.to_string()),
        })
    }

    async fn list_objects(&self, options: ListOptions) -> StorageResult<ObjectList> {
        let mut request = self.client.list_objects_v2().bucket(&self.bucket);

        if let Some(prefix) = options.prefix {
            request = request.prefix(prefix);
        }

        if let Some(max_keys) = options.max_keys {
            request = request.max_keys(max_keys);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.sdk_error(&e, "Failed to list objects".to_string()))?;

        let objects: Vec<ObjectMetadata> = response
            .contents()
            .iter()
            .map(|obj| ObjectMetadata {
                key: obj.key().unwrap_or_default().to_string(),
                size: obj.size().unwrap_or(0),
                last_modified: obj.last_modified().and_then(to_chrono),
                content_type: None, // Not available in list response
            })
            .collect();

        Ok(ObjectList { objects })
    }

    fn public_url(&self, key: &str) -> String {
        public_object_url(&self.public_base_url, key)
    }
}
