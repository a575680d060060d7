// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use kentsel_persistence::{NewUser, Persistence};
use tempfile::TempDir;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{ReportUploader, Settings, UploadError, UploadInfo, UploadRequest};

pub fn setup_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

pub fn create_user(persistence: &mut Persistence, username: &str, email: Option<&str>) -> i64 {
    persistence
        .create_user(&NewUser {
            username,
            email,
            password: "secret-password",
            is_staff: false,
            is_superuser: false,
        })
        .expect("Failed to create user")
}

pub fn create_staff(persistence: &mut Persistence, username: &str) -> i64 {
    persistence
        .create_user(&NewUser {
            username,
            email: None,
            password: "secret-password",
            is_staff: true,
            is_superuser: false,
        })
        .expect("Failed to create staff user")
}

pub fn test_settings(dir: &TempDir) -> Settings {
    Settings::new(dir.path().to_path_buf(), String::from("/media/"))
}

pub const fn fixed_now() -> OffsetDateTime {
    datetime!(2026-03-14 09:26:53 UTC)
}

pub fn members(persistence: &mut Persistence, group: &str) -> Vec<String> {
    let group = persistence
        .get_group_by_name(group)
        .unwrap()
        .expect("group should exist");
    persistence.list_group_members(group.group_id).unwrap()
}

/// Records uploads instead of talking to S3.
pub struct FakeUploader {
    pub calls: Mutex<Vec<(PathBuf, UploadRequest)>>,
    pub fail: bool,
}

impl FakeUploader {
    pub const fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub const fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, UploadRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportUploader for FakeUploader {
    async fn upload(
        &self,
        path: &Path,
        request: &UploadRequest,
    ) -> Result<UploadInfo, UploadError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), request.clone()));
        if self.fail {
            return Err(UploadError::S3(String::from("access denied")));
        }
        let bucket: String = request.bucket.clone().unwrap_or_else(|| String::from("reports"));
        let key: String = request.key.clone().unwrap_or_else(|| {
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        });
        Ok(UploadInfo {
            url: format!("https://{bucket}.s3.amazonaws.com/{key}"),
            bucket,
            key,
        })
    }
}
