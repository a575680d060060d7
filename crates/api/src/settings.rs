// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Runtime settings shared by the server and the command-line tool.

use std::path::{Path, PathBuf};

/// Default lifetime of a presigned report URL.
pub const DEFAULT_PRESIGN_EXPIRY_SECONDS: u64 = 3600;

/// Object storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    /// Bucket used when a request names none.
    pub bucket: Option<String>,
    /// AWS region override.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services.
    pub endpoint: Option<String>,
    /// Use path-style addressing (needed by most S3-compatible services).
    pub force_path_style: bool,
    /// Prefix prepended to generated object keys.
    pub key_prefix: Option<String>,
    /// Lifetime of presigned URLs.
    pub presign_expiry_seconds: u64,
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            bucket: None,
            region: None,
            endpoint: None,
            force_path_style: false,
            key_prefix: None,
            presign_expiry_seconds: DEFAULT_PRESIGN_EXPIRY_SECONDS,
        }
    }
}

/// Filesystem and URL settings for reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory that relative report paths resolve against.
    pub media_root: PathBuf,
    /// Public URL prefix for files under the media root.
    pub media_url: String,
    /// Object storage settings.
    pub s3: S3Settings,
}

impl Settings {
    /// Creates settings with default S3 configuration.
    #[must_use]
    pub fn new(media_root: PathBuf, media_url: String) -> Self {
        Self {
            media_root,
            media_url,
            s3: S3Settings::default(),
        }
    }

    /// Returns `path` relative to the media root with `/` separators, or
    /// `None` when the path lies outside it.
    #[must_use]
    pub fn media_relative(&self, path: &Path) -> Option<String> {
        let relative: &Path = path.strip_prefix(&self.media_root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }

    /// Returns the public media URL for a media-relative path.
    #[must_use]
    pub fn media_url_for(&self, relative: &str) -> String {
        format!("{}/{relative}", self.media_url.trim_end_matches('/'))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(PathBuf::from("media"), String::from("/media/"))
    }
}
