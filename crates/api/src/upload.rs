// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report upload to S3-compatible object storage.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::settings::{DEFAULT_PRESIGN_EXPIRY_SECONDS, S3Settings};

/// Errors that can occur while uploading a report.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("S3 bucket must be provided to upload reports")]
    MissingBucket,

    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),
}

/// Parameters of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Bucket override; the configured bucket is used when absent.
    pub bucket: Option<String>,
    /// Object key override; defaults to the file name.
    pub key: Option<String>,
    /// Store with `public-read` and return the plain object URL.
    pub public: bool,
    /// Lifetime of the presigned URL for private uploads.
    pub expire_seconds: u64,
}

impl UploadRequest {
    /// Creates a request with the default key and presign lifetime.
    #[must_use]
    pub const fn new(bucket: Option<String>, public: bool) -> Self {
        Self {
            bucket,
            key: None,
            public,
            expire_seconds: DEFAULT_PRESIGN_EXPIRY_SECONDS,
        }
    }
}

/// Where an uploaded report ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadInfo {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

/// Uploads report files.
#[async_trait]
pub trait ReportUploader: Send + Sync {
    /// Uploads the file at `path`.
    async fn upload(&self, path: &Path, request: &UploadRequest)
    -> Result<UploadInfo, UploadError>;
}

/// Picks the request bucket, else the configured one.
///
/// # Errors
///
/// Returns [`UploadError::MissingBucket`] if neither is set.
pub fn resolve_bucket(request: &UploadRequest, settings: &S3Settings) -> Result<String, UploadError> {
    [request.bucket.as_deref(), settings.bucket.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|b| !b.is_empty())
        .map(str::to_string)
        .ok_or(UploadError::MissingBucket)
}

/// Returns the object key for `path`.
///
/// An explicit key is used as given. Otherwise the file name is used,
/// behind the configured key prefix if any.
#[must_use]
pub fn object_key(path: &Path, request: &UploadRequest, settings: &S3Settings) -> String {
    if let Some(key) = request.key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        return key.to_string();
    }

    let file_name: String = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match settings
        .key_prefix
        .as_deref()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
    {
        Some(prefix) => format!("{prefix}/{file_name}"),
        None => file_name,
    }
}

/// Returns the URL of a public object.
#[must_use]
pub fn public_url(bucket: &str, key: &str, endpoint: Option<&str>) -> String {
    match endpoint.map(|e| e.trim_end_matches('/')).filter(|e| !e.is_empty()) {
        Some(endpoint) => format!("{endpoint}/{bucket}/{key}"),
        None => format!("https://{bucket}.s3.amazonaws.com/{key}"),
    }
}

/// Uploads a report, turning a failure into a warning message.
///
/// Returns the upload on success, or the warning to show the user.
pub async fn try_upload(
    uploader: &dyn ReportUploader,
    path: &Path,
    request: &UploadRequest,
) -> (Option<UploadInfo>, Option<String>) {
    match uploader.upload(path, request).await {
        Ok(info) => (Some(info), None),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Report upload failed");
            (None, Some(format!("S3 upload failed: {e}")))
        }
    }
}

/// Uploader backed by the AWS SDK.
pub struct S3ReportUploader {
    client: aws_sdk_s3::Client,
    settings: S3Settings,
}

impl S3ReportUploader {
    /// Builds a client from the environment plus the given settings.
    pub async fn new(settings: S3Settings) -> Self {
        info!(bucket = ?settings.bucket, region = ?settings.region, "Initializing S3 report uploader");

        let mut sdk_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            sdk_config_builder = sdk_config_builder.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = sdk_config_builder.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &settings.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }
        if settings.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        Self::from_client(aws_sdk_s3::Client::from_conf(s3_config_builder.build()), settings)
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn from_client(client: aws_sdk_s3::Client, settings: S3Settings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl ReportUploader for S3ReportUploader {
    async fn upload(
        &self,
        path: &Path,
        request: &UploadRequest,
    ) -> Result<UploadInfo, UploadError> {
        let bucket: String = resolve_bucket(request, &self.settings)?;
        let key: String = object_key(path, request, &self.settings);
        let body: Vec<u8> = tokio::fs::read(path).await?;
        debug!(%bucket, %key, size = body.len(), "Uploading report to S3");

        let mut put = self
            .client
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .body(aws_sdk_s3::primitives::ByteStream::from(body));
        if request.public {
            put = put.acl(aws_sdk_s3::types::ObjectCannedAcl::PublicRead);
        }
        put.send().await.map_err(|e| {
            error!(error = %e, "Failed to upload report to S3");
            UploadError::S3(e.to_string())
        })?;

        let url: String = if request.public {
            public_url(&bucket, &key, self.settings.endpoint.as_deref())
        } else {
            let presign = aws_sdk_s3::presigning::PresigningConfig::expires_in(
                Duration::from_secs(request.expire_seconds),
            )
            .map_err(|e| UploadError::S3(e.to_string()))?;
            self.client
                .get_object()
                .bucket(&bucket)
                .key(&key)
                .presigned(presign)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to presign report URL");
                    UploadError::S3(e.to_string())
                })?
                .uri()
                .to_string()
        };

        info!(%bucket, %key, public = request.public, "Report uploaded to S3");
        Ok(UploadInfo { bucket, key, url })
    }
}
