use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use url::Url;
use wayback_archiver::ArchiveConfig;

/// Settings loaded from environment variables. All optional; unset values
/// fall back to the library defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub min_interval_secs: Option<u64>,
    pub base_url: Option<Url>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            min_interval_secs: optional_var("ARCHIVE_MIN_INTERVAL_SECS")?
                .map(|v| v.parse())
                .transpose()
                .context("ARCHIVE_MIN_INTERVAL_SECS must be a whole number of seconds")?,
            base_url: optional_var("ARCHIVE_BASE_URL")?
                .map(|v| Url::parse(&v))
                .transpose()
                .context("ARCHIVE_BASE_URL must be an absolute URL")?,
            request_timeout_secs: optional_var("ARCHIVE_REQUEST_TIMEOUT_SECS")?
                .map(|v| parse_timeout_secs(&v))
                .transpose()
                .context("ARCHIVE_REQUEST_TIMEOUT_SECS must be a positive whole number of seconds")?,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, min_interval_secs: Option<u64>, base_url: Option<Url>) -> Self {
        if min_interval_secs.is_some() {
            self.min_interval_secs = min_interval_secs;
        }
        if base_url.is_some() {
            self.base_url = base_url;
        }
        self
    }

    pub fn archive_config(&self) -> ArchiveConfig {
        let mut config = ArchiveConfig::default();
        if let Some(secs) = self.min_interval_secs {
            config = config.with_min_interval(secs);
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = self.request_timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        config
    }
}

/// A zero timeout would fail every request immediately.
fn parse_timeout_secs(value: &str) -> Result<u64> {
    let secs: u64 = value.trim().parse().context("not a whole number")?;
    if secs == 0 {
        bail!("timeout must be greater than zero");
    }
    Ok(secs)
}

fn optional_var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("{} is not valid unicode", name)),
    }
}
