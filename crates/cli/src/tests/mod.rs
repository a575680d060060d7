// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use clap::Parser;
use kentsel_api::{ReportUploader, Settings, UploadError, UploadInfo, UploadRequest};
use kentsel_domain::ReportFormat;
use kentsel_persistence::{NewUser, Persistence};
use tempfile::TempDir;

use crate::{Cli, Command, execute};

/// Records upload requests and reports a fixed URL.
struct FakeUploader {
    keys: Mutex<Vec<String>>,
}

impl FakeUploader {
    const fn new() -> Self {
        Self {
            keys: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ReportUploader for FakeUploader {
    async fn upload(&self, path: &Path, request: &UploadRequest) -> Result<UploadInfo, UploadError> {
        let key: String = request.key.clone().unwrap_or_else(|| {
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        });
        self.keys.lock().unwrap().push(key.clone());
        let bucket: String = request.bucket.clone().unwrap_or_else(|| String::from("reports"));
        Ok(UploadInfo {
            url: format!("https://storage.test/{bucket}/{key}"),
            bucket,
            key,
        })
    }
}

struct Fixture {
    dir: TempDir,
    persistence: Persistence,
}

impl Fixture {
    fn new() -> Self {
        let dir: TempDir = TempDir::new().unwrap();
        let persistence: Persistence =
            Persistence::new_with_file(dir.path().join("kentsel.db")).unwrap();
        Self { dir, persistence }
    }

    fn media(&self) -> String {
        self.dir.path().join("media").to_string_lossy().into_owned()
    }

    fn add_user(&mut self, username: &str, email: Option<&str>) {
        self.persistence
            .create_user(&NewUser {
                username,
                email,
                password: "secret-password",
                is_staff: false,
                is_superuser: false,
            })
            .unwrap();
    }

    fn parse(&self, args: &[&str]) -> Cli {
        let media: String = self.media();
        let mut full: Vec<&str> = vec!["kentsel", "--media-root", &media];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    async fn run(
        &mut self,
        args: &[&str],
        uploader: Option<&dyn ReportUploader>,
    ) -> color_eyre::Result<String> {
        let cli: Cli = self.parse(args);
        let settings: Settings = cli.storage.settings();
        let mut out: Vec<u8> = Vec::new();
        execute(&cli, &mut self.persistence, &settings, uploader, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn reports(&self) -> Vec<String> {
        let dir = Path::new(&self.media()).join("reports");
        let mut names: Vec<String> = fs::read_dir(dir)
            .map(|entries| {
                entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[test]
fn test_assign_group_requires_a_source() {
    let result = Cli::try_parse_from(["kentsel", "assign-group", "--group", "MUHASEBE"]);
    assert!(result.is_err());
}

#[test]
fn test_assign_group_rejects_two_sources() {
    let result = Cli::try_parse_from([
        "kentsel",
        "assign-group",
        "--username",
        "alice",
        "--users",
        "bob,carol",
        "--group",
        "MUHASEBE",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_assign_group_rejects_unknown_report_format() {
    let result = Cli::try_parse_from([
        "kentsel",
        "assign-group",
        "--users",
        "alice",
        "--group",
        "MUHASEBE",
        "--report-format",
        "xml",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_assign_group_parses_options() {
    let cli: Cli = Cli::try_parse_from([
        "kentsel",
        "--database",
        "other.db",
        "assign-group",
        "--users",
        "alice, bob",
        "--group",
        "MUHASEBE",
        "--dry-run",
        "--report-format",
        "JSON",
        "--label",
        "march",
    ])
    .unwrap();

    assert_eq!(cli.storage.database, Path::new("other.db"));
    let Command::AssignGroup(args) = &cli.command else {
        panic!("expected assign-group");
    };
    let options = args.options(None).unwrap();
    assert!(options.dry_run);
    assert_eq!(options.report_format, ReportFormat::Json);
    assert_eq!(options.label.as_deref(), Some("march"));
    assert_eq!(options.group.as_deref(), Some("MUHASEBE"));
}

#[tokio::test]
async fn test_create_user_then_assign_single_user() {
    let mut fixture: Fixture = Fixture::new();

    let created: String = fixture
        .run(
            &["create-user", "--username", "alice", "--password", "pw"],
            None,
        )
        .await
        .unwrap();
    assert_eq!(created.trim(), "Created user alice");

    let output: String = fixture
        .run(
            &["assign-group", "--username", "alice", "--group", "MUHASEBE"],
            None,
        )
        .await
        .unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Added user alice to group 'MUHASEBE'");
    assert!(lines[1].starts_with("Report written to "));
    assert_eq!(fixture.reports().len(), 1);
    assert!(fixture.reports()[0].starts_with("proje_assign_"));

    let group = fixture
        .persistence
        .get_group_by_name("MUHASEBE")
        .unwrap()
        .unwrap();
    assert_eq!(
        fixture.persistence.list_group_members(group.group_id).unwrap(),
        vec![String::from("alice")]
    );
}

#[tokio::test]
async fn test_assign_unknown_single_user_fails() {
    let mut fixture: Fixture = Fixture::new();

    let err = fixture
        .run(
            &["assign-group", "--username", "ghost", "--group", "MUHASEBE"],
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "User 'ghost' not found");
    assert!(fixture.persistence.get_group_by_name("MUHASEBE").unwrap().is_none());
    assert!(fixture.reports().is_empty());
}

#[tokio::test]
async fn test_dry_run_user_list_reports_counts() {
    let mut fixture: Fixture = Fixture::new();
    fixture.add_user("alice", Some("alice@example.com"));

    let output: String = fixture
        .run(
            &[
                "assign-group",
                "--users",
                "alice@example.com,ghost",
                "--group",
                "MUHASEBE",
                "--dry-run",
                "--verbose-rows",
                "--label",
                "trial run",
            ],
            None,
        )
        .await
        .unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Would add 1 of 2");
    assert_eq!(
        lines[1],
        "not_found: ghost (group 'MUHASEBE') [user_not_found]"
    );
    assert!(fixture.reports()[0].starts_with("proje_assign_trial_run_"));
    assert!(fixture.persistence.get_group_by_name("MUHASEBE").unwrap().is_none());
}

#[tokio::test]
async fn test_assign_from_csv_file() {
    let mut fixture: Fixture = Fixture::new();
    fixture.add_user("alice", None);
    fixture.add_user("bob", Some("bob@example.com"));

    let csv_path = fixture.dir.path().join("people.csv");
    fs::write(
        &csv_path,
        "username,email,group\nalice,,HUKUK\n,bob@example.com,\n",
    )
    .unwrap();
    let csv_arg: String = csv_path.to_string_lossy().into_owned();

    let output: String = fixture
        .run(
            &[
                "assign-group",
                "--file",
                &csv_arg,
                "--group",
                "MUHASEBE",
                "--report-file",
                "reports/out.json",
                "--report-format",
                "json",
            ],
            None,
        )
        .await
        .unwrap();

    assert_eq!(output.lines().next(), Some("Assigned 2 of 2"));
    assert_eq!(fixture.reports(), vec![String::from("out.json")]);

    let hukuk = fixture
        .persistence
        .get_group_by_name("HUKUK")
        .unwrap()
        .unwrap();
    assert_eq!(
        fixture.persistence.list_group_members(hukuk.group_id).unwrap(),
        vec![String::from("alice")]
    );
    let muhasebe = fixture
        .persistence
        .get_group_by_name("MUHASEBE")
        .unwrap()
        .unwrap();
    assert_eq!(
        fixture
            .persistence
            .list_group_members(muhasebe.group_id)
            .unwrap(),
        vec![String::from("bob")]
    );
}

#[tokio::test]
async fn test_assign_uploads_report() {
    let mut fixture: Fixture = Fixture::new();
    fixture.add_user("alice", None);
    let uploader: FakeUploader = FakeUploader::new();

    let output: String = fixture
        .run(
            &[
                "--s3-bucket",
                "archive",
                "assign-group",
                "--users",
                "alice",
                "--group",
                "MUHASEBE",
                "--upload-s3",
                "--s3-key",
                "runs/latest.csv",
            ],
            Some(&uploader),
        )
        .await
        .unwrap();

    assert!(
        output
            .lines()
            .any(|l| l == "Uploaded report to S3: https://storage.test/archive/runs/latest.csv")
    );
    assert_eq!(
        *uploader.keys.lock().unwrap(),
        vec![String::from("runs/latest.csv")]
    );
}

#[tokio::test]
async fn test_bootstrap_defaults_is_idempotent() {
    let mut fixture: Fixture = Fixture::new();

    let first: String = fixture.run(&["bootstrap-defaults"], None).await.unwrap();
    assert!(first.starts_with("Created: group:"));

    let second: String = fixture.run(&["bootstrap-defaults"], None).await.unwrap();
    assert_eq!(second.trim(), "Created:");
}
