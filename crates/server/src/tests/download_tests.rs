// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report download endpoint.

use axum::http::{StatusCode, header};

use super::{body_bytes, get_request, login, send, test_app};

#[tokio::test]
async fn test_download_serves_report() {
    let app = test_app();
    std::fs::create_dir_all(app.media.path().join("reports")).unwrap();
    std::fs::write(
        app.media.path().join("reports/r.csv"),
        "ident,user,group,status,reason\n",
    )
    .unwrap();
    let token: String = login(&app.router, "admin").await;

    let response = send(&app.router, get_request("/reports/download/reports/r.csv", &token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"r.csv\""
    );
    let body = body_bytes(response).await;
    assert_eq!(body, b"ident,user,group,status,reason\n");
}

#[tokio::test]
async fn test_download_escapes_quotes_in_file_name() {
    let app = test_app();
    std::fs::create_dir_all(app.media.path().join("reports")).unwrap();
    std::fs::write(app.media.path().join("reports/we\"ird.csv"), "x\n").unwrap();
    let token: String = login(&app.router, "admin").await;

    let response = send(
        &app.router,
        get_request("/reports/download/reports/we%22ird.csv", &token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"we_ird.csv\"; filename*=UTF-8''we%22ird.csv"
    );
}

#[tokio::test]
async fn test_download_encodes_non_ascii_file_name() {
    let app = test_app();
    std::fs::create_dir_all(app.media.path().join("reports")).unwrap();
    std::fs::write(app.media.path().join("reports/rapor_ç.csv"), "x\n").unwrap();
    let token: String = login(&app.router, "admin").await;

    let response = send(
        &app.router,
        get_request("/reports/download/reports/rapor_%C3%A7.csv", &token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"rapor__.csv\"; filename*=UTF-8''rapor_%C3%A7.csv"
    );
}

#[tokio::test]
async fn test_download_requires_staff() {
    let app = test_app();
    let token: String = login(&app.router, "clerk").await;

    let response = send(&app.router, get_request("/reports/download/reports/r.csv", &token)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_download_traversal_is_not_found() {
    let app = test_app();
    std::fs::write(app.media.path().join("inside.txt"), "ok").unwrap();
    let token: String = login(&app.router, "admin").await;

    let response = send(
        &app.router,
        get_request("/reports/download/reports/%2E%2E/%2E%2E/etc/passwd", &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app.router, get_request("/reports/download/missing.csv", &token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
