// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Path guard for the report download route.

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::error::ApiError;
use crate::settings::Settings;

/// Resolves a requested report path to a file under the media root.
///
/// Every failure is reported as [`ApiError::ReportNotFound`] so callers
/// cannot probe the filesystem outside the media root.
///
/// # Errors
///
/// Returns an error if the path is absolute, contains `..`, resolves
/// (through symlinks) outside the media root, or is not a regular file.
pub fn resolve_download(settings: &Settings, requested: &str) -> Result<PathBuf, ApiError> {
    let not_found = || ApiError::ReportNotFound {
        path: requested.to_string(),
    };

    let relative: &Path = Path::new(requested);
    if requested.is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        warn!(requested, "Rejected report download path");
        return Err(not_found());
    }

    let root: PathBuf = settings.media_root.canonicalize().map_err(|_| not_found())?;
    let target: PathBuf = root
        .join(relative)
        .canonicalize()
        .map_err(|_| not_found())?;

    if !target.starts_with(&root) {
        warn!(requested, "Report download resolved outside the media root");
        return Err(not_found());
    }

    if !target.is_file() {
        return Err(not_found());
    }

    Ok(target)
}
