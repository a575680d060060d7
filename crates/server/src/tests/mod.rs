// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod download_tests;

use std::path::Path as FsPath;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use kentsel_api::{
    ReportUploader, Settings, UploadError, UploadInfo, UploadRequest, bootstrap_defaults,
};
use kentsel_persistence::{NewUser, Persistence};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const PASSWORD: &str = "correct-horse";

/// Uploader that succeeds without network access.
pub struct FakeUploader;

#[async_trait]
impl ReportUploader for FakeUploader {
    async fn upload(
        &self,
        path: &FsPath,
        request: &UploadRequest,
    ) -> Result<UploadInfo, UploadError> {
        let bucket: String = request.bucket.clone().ok_or(UploadError::MissingBucket)?;
        let key: String = path.file_name().unwrap().to_string_lossy().into_owned();
        Ok(UploadInfo {
            url: format!("https://{bucket}.s3.amazonaws.com/{key}"),
            bucket,
            key,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media: TempDir,
}

/// An app with a staff account `admin`, a plain account `clerk`, the
/// default groups, and a media root in a temp dir.
pub fn test_app() -> TestApp {
    let media = TempDir::new().unwrap();
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    for (username, is_staff) in [("admin", true), ("clerk", false)] {
        persistence
            .create_user(&NewUser {
                username,
                email: Some(&format!("{username}@example.com")),
                password: PASSWORD,
                is_staff,
                is_superuser: false,
            })
            .unwrap();
    }
    bootstrap_defaults(&mut persistence).unwrap();

    let state = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(Settings::new(
            media.path().to_path_buf(),
            String::from("/media/"),
        )),
        uploader: Some(Arc::new(FakeUploader)),
    };

    TestApp {
        router: build_router(state.clone()),
        state,
        media,
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn login(router: &Router, username: &str) -> String {
    let response = send(
        router,
        json_request(
            "POST",
            "/session",
            None,
            &serde_json::json!({ "username": username, "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["session_token"]
        .as_str()
        .unwrap()
        .to_string()
}
