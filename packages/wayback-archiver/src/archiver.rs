//! Lookup → decide → submit.

use std::sync::Arc;

use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::http::ReqwestTransport;
use crate::lookup::SnapshotLookupClient;
use crate::policy::ArchivePolicy;
use crate::submit::ArchiveSubmissionClient;
use crate::traits::HttpTransport;
use crate::types::{ArchiveDecision, ArchiveResult};

/// Archives a URL if the policy allows it.
///
/// Holds no per-request state, so one instance can serve concurrent calls
/// for different URLs.
#[derive(Clone)]
pub struct Archiver {
    lookup: SnapshotLookupClient,
    submission: ArchiveSubmissionClient,
    policy: ArchivePolicy,
    clock: Arc<dyn Clock>,
}

impl Archiver {
    /// Production archiver: reqwest transport and the system clock.
    pub fn new(config: ArchiveConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Self::with_transport(config, Arc::new(transport), Arc::new(SystemClock))
    }

    pub fn with_transport(
        config: ArchiveConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let headers = config.client_headers()?;
        Ok(Self {
            lookup: SnapshotLookupClient::new(
                Arc::clone(&transport),
                config.base_url.clone(),
                headers.clone(),
            ),
            submission: ArchiveSubmissionClient::new(transport, config.base_url, headers),
            policy: ArchivePolicy::new(config.min_interval_secs),
            clock,
        })
    }

    /// Look up `url` and decide, without submitting anything.
    pub async fn check(&self, url: &str) -> Result<ArchiveDecision> {
        let info = self.lookup.lookup(url).await?;
        let decision = self.policy.decide(&info, self.clock.now())?;
        info!(url, ?decision, "Archive decision");
        Ok(decision)
    }

    /// Archive `url` unless the policy rejects it.
    ///
    /// At most one lookup and one submission; rejections come back as
    /// `TooSoon` / `NotLive` errors and nothing is submitted.
    pub async fn run(&self, url: &str) -> Result<ArchiveResult> {
        let decision = self.check(url).await?;
        if let Err(rejection) = decision.into_result(url) {
            warn!(url, error = %rejection, "Archive skipped");
            return Err(rejection);
        }

        let result = self.submission.submit(url).await?;
        info!(url, location = %result.location, "Archived");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::testing::MockTransport;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_check_never_submits() {
        let mock = MockTransport::new().with_snapshot(serde_json::json!({ "is_live": true }));
        let archiver = Archiver::with_transport(
            ArchiveConfig::default(),
            Arc::new(mock.clone()),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())),
        )
        .unwrap();

        let decision = archiver.check("http://x.test/").await.unwrap();

        assert_eq!(decision, ArchiveDecision::Proceed);
        assert_eq!(mock.get_call_count(), 1);
        assert_eq!(mock.head_call_count(), 0);
    }

    #[tokio::test]
    async fn test_min_interval_comes_from_config() {
        let mock = MockTransport::new()
            .with_snapshot(serde_json::json!({ "last_ts": "20240101000000", "is_live": true }));
        let archiver = Archiver::with_transport(
            ArchiveConfig::new().with_min_interval(3600),
            Arc::new(mock),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap())),
        )
        .unwrap();

        let decision = archiver.check("http://x.test/").await.unwrap();
        assert_eq!(decision, ArchiveDecision::Proceed);
    }
}
