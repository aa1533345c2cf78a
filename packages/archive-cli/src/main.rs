//! Archive one URL on the Wayback Machine.
//!
//! Prints a JSON outcome on stdout; logs go to stderr. Exits 0 when the URL
//! was archived (or, with `--dry-run`, would be), 2 when the recency or
//! liveness check rejected it, and 1 on any other failure.

mod config;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;
use wayback_archiver::{ArchiveDecision, ArchiveError, ArchiveResult, Archiver};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "archive-url")]
#[command(about = "Submit a URL to the Wayback Machine unless it was captured recently")]
struct Cli {
    /// URL to archive
    url: String,

    /// Minimum age in seconds of the last snapshot before re-archiving
    #[arg(long)]
    min_interval: Option<u64>,

    /// Archive service origin
    #[arg(long)]
    base_url: Option<Url>,

    /// Only report the decision, do not submit
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Response<'a> {
    status: &'static str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a ArchiveResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_seconds: Option<u64>,
}

impl<'a> Response<'a> {
    fn new(status: &'static str, url: &'a str) -> Self {
        Self {
            status,
            url,
            result: None,
            elapsed_seconds: None,
            min_seconds: None,
        }
    }

    fn too_soon(url: &'a str, elapsed: u64, min: u64) -> Self {
        Self {
            elapsed_seconds: Some(elapsed),
            min_seconds: Some(min),
            ..Self::new("too_soon", url)
        }
    }
}

fn output(resp: &Response<'_>) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(resp).context("Failed to serialize response")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wayback_archiver=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_overrides(cli.min_interval, cli.base_url);
    let archive_config = config.archive_config();
    tracing::info!(
        url = %cli.url,
        base_url = %archive_config.base_url,
        min_interval_secs = archive_config.min_interval_secs,
        dry_run = cli.dry_run,
        "Configuration loaded"
    );
    let archiver = Archiver::new(archive_config).context("Failed to build archiver")?;

    if cli.dry_run {
        let decision = archiver
            .check(&cli.url)
            .await
            .context("Archive check failed")?;
        let resp = match decision {
            ArchiveDecision::Proceed => Response::new("would_archive", &cli.url),
            ArchiveDecision::TooSoon {
                elapsed_seconds,
                min_seconds,
            } => Response::too_soon(&cli.url, elapsed_seconds, min_seconds),
            ArchiveDecision::NotLive => Response::new("not_live", &cli.url),
        };
        output(&resp)?;
        return Ok(if decision.is_proceed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(2)
        });
    }

    match archiver.run(&cli.url).await {
        Ok(result) => {
            output(&Response {
                result: Some(&result),
                ..Response::new("archived", &cli.url)
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Err(ArchiveError::TooSoon { elapsed, min, .. }) => {
            output(&Response::too_soon(&cli.url, elapsed, min))?;
            Ok(ExitCode::from(2))
        }
        Err(ArchiveError::NotLive { .. }) => {
            output(&Response::new("not_live", &cli.url))?;
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e).context("Archive request failed"),
    }
}
