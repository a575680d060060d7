// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use kentsel_api::{
    ApiError, AuthenticationService, LoginRequest, LoginResponse, OwnerAssignConfirmRequest,
    OwnerAssignConfirmation, OwnerAssignRequest, OwnerAssignResult, OwnerRun, ReportUploader,
    S3ReportUploader, S3Settings, Settings, build_confirmation, finish_owner_assignment,
    report_timestamp, resolve_download, run_owner_assignment,
};
use kentsel_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::StaffSession;

/// Kentsel Server - admin HTTP endpoints for owner group assignment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "KENTSEL_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Directory where reports are written and served from
    #[arg(long, env = "KENTSEL_MEDIA_ROOT", default_value = "media")]
    media_root: PathBuf,

    /// Public URL prefix of the media directory
    #[arg(long, default_value = "/media/")]
    media_url: String,

    /// Default bucket for report uploads
    #[arg(long, env = "KENTSEL_S3_BUCKET")]
    s3_bucket: Option<String>,

    /// AWS region for report uploads
    #[arg(long)]
    s3_region: Option<String>,

    /// Custom endpoint for S3-compatible storage
    #[arg(long)]
    s3_endpoint: Option<String>,

    /// Use path-style S3 addressing
    #[arg(long)]
    s3_force_path_style: bool,

    /// Prefix for generated object keys
    #[arg(long)]
    s3_key_prefix: Option<String>,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            media_root: self.media_root.clone(),
            media_url: self.media_url.clone(),
            s3: S3Settings {
                bucket: self.s3_bucket.clone(),
                region: self.s3_region.clone(),
                endpoint: self.s3_endpoint.clone(),
                force_path_style: self.s3_force_path_style,
                key_prefix: self.s3_key_prefix.clone(),
                ..S3Settings::default()
            },
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Report locations.
    settings: Arc<Settings>,
    /// Report uploader; uploads are reported as unavailable when absent.
    uploader: Option<Arc<dyn ReportUploader>>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. }
            | ApiError::InvalidCsvFormat { .. }
            | ApiError::GroupNotFound { .. } => StatusCode::BAD_REQUEST,
            ApiError::ReportNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::ReportIo { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Handler for POST `/session`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let (session_token, expires_at, user) =
        AuthenticationService::login(&mut persistence, &req.username, &req.password)
            .map_err(ApiError::from)?;

    Ok(Json(LoginResponse {
        session_token,
        username: user.username,
        expires_at,
    }))
}

/// Handler for DELETE `/session`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(user, token): StaffSession,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    AuthenticationService::logout(&mut persistence, &token).map_err(ApiError::from)?;
    info!(username = %user.username, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/admin/owners/assign-group/confirm`.
async fn handle_owner_assign_confirm(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(_user, _): StaffSession,
    Json(req): Json<OwnerAssignConfirmRequest>,
) -> Result<Json<OwnerAssignConfirmation>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let confirmation: OwnerAssignConfirmation = build_confirmation(&mut persistence, &req.owner_ids)?;
    Ok(Json(confirmation))
}

/// Handler for POST `/admin/owners/assign-group`.
///
/// The database lock is released before the report is written.
async fn handle_owner_assign(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(user, _): StaffSession,
    Json(req): Json<OwnerAssignRequest>,
) -> Result<Json<OwnerAssignResult>, HttpError> {
    info!(
        username = %user.username,
        owners = req.owner_ids.len(),
        group_id = req.group_id,
        dry_run = req.dry_run,
        "Owner group assignment requested"
    );

    let run: OwnerRun = {
        let mut persistence = app_state.persistence.lock().await;
        run_owner_assignment(&mut persistence, &req)?
    };

    let result: OwnerAssignResult = finish_owner_assignment(
        &app_state.settings,
        app_state.uploader.as_deref(),
        &req,
        run,
        report_timestamp(),
    )
    .await?;

    Ok(Json(result))
}

fn content_type_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => "text/csv; charset=utf-8",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Handler for GET `/reports/download/{*path}`.
async fn handle_report_download(
    AxumState(app_state): AxumState<AppState>,
    StaffSession(user, _): StaffSession,
    Path(requested): Path<String>,
) -> Result<Response, HttpError> {
    let path: PathBuf = resolve_download(&app_state.settings, &requested)?;
    let body: Vec<u8> = tokio::fs::read(&path).await.map_err(|_| {
        HttpError::from(ApiError::ReportNotFound {
            path: requested.clone(),
        })
    })?;

    let file_name: String = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(username = %user.username, report = %requested, "Report downloaded");

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&path).to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        body,
    )
        .into_response())
}

/// Builds an `attachment` disposition for `file_name`.
///
/// Names outside printable ASCII, or containing `"` or `\`, get an
/// underscore-substituted `filename` plus an RFC 5987 `filename*`.
fn content_disposition(file_name: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == file_name {
        return format!("attachment; filename=\"{file_name}\"");
    }

    let mut encoded: String = String::with_capacity(file_name.len() * 3);
    for b in file_name.bytes() {
        if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
            encoded.push(char::from(b));
        } else {
            encoded.push('%');
            encoded.push(char::from(HEX[usize::from(b >> 4)]));
            encoded.push(char::from(HEX[usize::from(b & 0x0f)]));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/session", post(handle_login))
        .route("/session", delete(handle_logout))
        .route(
            "/admin/owners/assign-group/confirm",
            post(handle_owner_assign_confirm),
        )
        .route("/admin/owners/assign-group", post(handle_owner_assign))
        .route("/reports/download/{*path}", get(handle_report_download))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Kentsel Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let settings: Settings = args.settings();
    std::fs::create_dir_all(&settings.media_root)?;
    let uploader: Arc<dyn ReportUploader> =
        Arc::new(S3ReportUploader::new(settings.s3.clone()).await);

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(settings),
        uploader: Some(uploader),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
