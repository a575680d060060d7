// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `kentsel` - command-line tools for the Kentsel back-office.
//!
//! - `assign-group` adds one user, a list of users, or the users named in
//!   a CSV file to a group and writes a report.
//! - `bootstrap-defaults` creates the default groups, departments, titles
//!   and group permissions.
//! - `create-user` adds an account.
//!
//! Summaries go to stdout; logs go to stderr.

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

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use color_eyre::{Result, eyre::eyre};
use kentsel_api::{
    BatchOptions, BatchSource, BatchSummary, ReportUploader, S3ReportUploader, S3Settings,
    Settings, bootstrap_defaults, report_timestamp, run_batch,
};
use kentsel_domain::ReportFormat;
use kentsel_persistence::{NewUser, Persistence};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli: Cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .without_time()
        .init();

    run(&cli, &mut io::stdout()).await
}

#[derive(Debug, Parser)]
#[command(name = "kentsel", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    storage: StorageArgs,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

/// Database, media and object storage locations.
#[derive(Debug, clap::Args)]
struct StorageArgs {
    /// Path to the `SQLite` database file
    #[arg(
        long,
        env = "KENTSEL_DATABASE",
        default_value = "kentsel.db",
        global = true
    )]
    database: PathBuf,

    /// Directory that relative report paths resolve against
    #[arg(long, env = "KENTSEL_MEDIA_ROOT", default_value = "media", global = true)]
    media_root: PathBuf,

    /// Public URL prefix of the media directory
    #[arg(long, default_value = "/media/", global = true)]
    media_url: String,

    /// Bucket for report uploads
    #[arg(long, env = "KENTSEL_S3_BUCKET", global = true)]
    s3_bucket: Option<String>,

    /// AWS region for report uploads
    #[arg(long, global = true)]
    s3_region: Option<String>,

    /// Custom endpoint for S3-compatible storage
    #[arg(long, global = true)]
    s3_endpoint: Option<String>,

    /// Use path-style S3 addressing
    #[arg(long, global = true)]
    s3_force_path_style: bool,

    /// Prefix for generated object keys
    #[arg(long, global = true)]
    s3_key_prefix: Option<String>,
}

impl StorageArgs {
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

#[derive(Debug, Subcommand)]
enum Command {
    /// Add users to a group and write a report
    #[command(visible_alias = "ag")]
    AssignGroup(AssignGroupArgs),

    /// Create default groups, departments, titles and permissions
    BootstrapDefaults,

    /// Create an account
    CreateUser(CreateUserArgs),
}

#[derive(Debug, clap::Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["username", "users", "file"]),
))]
#[allow(clippy::struct_excessive_bools)]
struct AssignGroupArgs {
    /// Username or email of one user
    #[arg(long)]
    username: Option<String>,

    /// Comma-separated usernames or emails
    #[arg(long)]
    users: Option<String>,

    /// CSV file with a `username` or `email` column and an optional `group` column
    #[arg(long)]
    file: Option<PathBuf>,

    /// Group to assign; for --file, the default for rows without a group
    #[arg(long)]
    group: Option<String>,

    /// Report what would change without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Report path; relative paths are placed under the media root
    #[arg(long)]
    report_file: Option<PathBuf>,

    /// Report format (csv or json)
    #[arg(long, default_value_t = ReportFormat::Csv)]
    report_format: ReportFormat,

    /// Text included in generated report file names
    #[arg(long)]
    label: Option<String>,

    /// Upload the report to S3
    #[arg(long)]
    upload_s3: bool,

    /// Object key for the upload (defaults to the report file name)
    #[arg(long)]
    s3_key: Option<String>,

    /// Make the uploaded report publicly readable
    #[arg(long)]
    s3_public: bool,

    /// Print a line for every row that was not assigned
    #[arg(long)]
    verbose_rows: bool,
}

impl AssignGroupArgs {
    fn source(&self) -> Option<BatchSource> {
        self.username
            .clone()
            .map(BatchSource::Username)
            .or_else(|| self.users.clone().map(BatchSource::Users))
            .or_else(|| self.file.clone().map(BatchSource::File))
    }

    fn options(&self, s3_bucket: Option<String>) -> Option<BatchOptions> {
        Some(BatchOptions {
            dry_run: self.dry_run,
            report_file: self.report_file.clone(),
            report_format: self.report_format,
            label: self.label.clone(),
            upload_s3: self.upload_s3,
            s3_bucket,
            s3_key: self.s3_key.clone(),
            s3_public: self.s3_public,
            verbose_rows: self.verbose_rows,
            ..BatchOptions::new(self.source()?, self.group.clone())
        })
    }
}

#[derive(Debug, clap::Args)]
struct CreateUserArgs {
    /// Login name
    #[arg(long)]
    username: String,

    /// Email address, also accepted as a login identifier by assign-group
    #[arg(long)]
    email: Option<String>,

    /// Password
    #[arg(long, env = "KENTSEL_PASSWORD")]
    password: String,

    /// Allow use of the admin routes
    #[arg(long)]
    staff: bool,

    /// Superuser account
    #[arg(long)]
    superuser: bool,
}

/// Opens the database and runs the command, building an S3 uploader only
/// when the command asks for an upload.
async fn run<W: Write + Send>(cli: &Cli, out: &mut W) -> Result<()> {
    let settings: Settings = cli.storage.settings();
    let uploader: Option<S3ReportUploader> = match &cli.command {
        Command::AssignGroup(args) if args.upload_s3 => {
            Some(S3ReportUploader::new(settings.s3.clone()).await)
        }
        _ => None,
    };

    let mut persistence: Persistence = Persistence::new_with_file(&cli.storage.database)?;
    execute(
        cli,
        &mut persistence,
        &settings,
        uploader.as_ref().map(|u| u as &dyn ReportUploader),
        out,
    )
    .await
}

async fn execute<W: Write + Send>(
    cli: &Cli,
    persistence: &mut Persistence,
    settings: &Settings,
    uploader: Option<&dyn ReportUploader>,
    out: &mut W,
) -> Result<()> {
    match &cli.command {
        Command::AssignGroup(args) => {
            let options: BatchOptions = args
                .options(cli.storage.s3_bucket.clone())
                .ok_or_else(|| eyre!("one of --username, --users or --file is required"))?;
            let summary: BatchSummary =
                run_batch(persistence, settings, uploader, &options, report_timestamp()).await?;
            for line in &summary.lines {
                writeln!(out, "{line}")?;
            }
            for warning in &summary.warnings {
                eprintln!("Warning: {warning}");
            }
        }
        Command::BootstrapDefaults => {
            let summary = bootstrap_defaults(persistence)?;
            writeln!(out, "{}", summary.line())?;
        }
        Command::CreateUser(args) => {
            let user_id: i64 = persistence.create_user(&NewUser {
                username: &args.username,
                email: args.email.as_deref(),
                password: &args.password,
                is_staff: args.staff,
                is_superuser: args.superuser,
            })?;
            info!(user_id, username = %args.username, "Account created");
            writeln!(out, "Created user {}", args.username)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
