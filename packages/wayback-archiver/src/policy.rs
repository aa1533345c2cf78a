//! Archive decision policy.
//!
//! A URL with capture history is re-archived only once the last capture is
//! older than the minimum interval, whatever its current liveness. A URL
//! with no history is archived only if the archive reports it live.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::timestamp::elapsed_seconds;
use crate::types::{ArchiveDecision, SnapshotInfo};

/// One week, the default minimum re-archive interval.
pub const WEEK_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivePolicy {
    min_interval_secs: u64,
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self::new(WEEK_SECONDS)
    }
}

impl ArchivePolicy {
    pub fn new(min_interval_secs: u64) -> Self {
        Self { min_interval_secs }
    }

    pub fn min_interval_secs(&self) -> u64 {
        self.min_interval_secs
    }

    /// Decide whether `info.url` should be submitted at `now`.
    ///
    /// A last capture exactly `min_interval_secs` old is still too soon.
    pub fn decide(&self, info: &SnapshotInfo, now: DateTime<Utc>) -> Result<ArchiveDecision> {
        let decision = match info.last_timestamp.as_deref() {
            Some(ts) => {
                let elapsed = elapsed_seconds(ts, now)?;
                debug!(url = %info.url, last_ts = ts, elapsed, "Found previous snapshot");
                if elapsed > self.min_interval_secs {
                    ArchiveDecision::Proceed
                } else {
                    ArchiveDecision::TooSoon {
                        elapsed_seconds: elapsed,
                        min_seconds: self.min_interval_secs,
                    }
                }
            }
            None if info.is_live => ArchiveDecision::Proceed,
            None => ArchiveDecision::NotLive,
        };
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn captured(ts: &str, is_live: bool) -> SnapshotInfo {
        SnapshotInfo::new("http://x.test/")
            .with_last_timestamp(ts)
            .with_live(is_live)
    }

    #[test]
    fn test_default_is_one_week() {
        assert_eq!(ArchivePolicy::default().min_interval_secs(), 604_800);
    }

    #[test]
    fn test_never_archived_and_live_proceeds() {
        let info = SnapshotInfo::new("http://x.test/").with_live(true);
        let decision = ArchivePolicy::default().decide(&info, Utc::now()).unwrap();
        assert_eq!(decision, ArchiveDecision::Proceed);
    }

    #[test]
    fn test_never_archived_and_dead_is_not_live() {
        let info = SnapshotInfo::new("http://x.test/");
        let decision = ArchivePolicy::default().decide(&info, Utc::now()).unwrap();
        assert_eq!(decision, ArchiveDecision::NotLive);
    }

    #[test]
    fn test_recent_snapshot_is_too_soon() {
        let now = at("2024-01-02T00:00:00Z");
        let decision = ArchivePolicy::new(604_800)
            .decide(&captured("20240101000000", true), now)
            .unwrap();
        assert_eq!(
            decision,
            ArchiveDecision::TooSoon {
                elapsed_seconds: 86_400,
                min_seconds: 604_800
            }
        );
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        let now = at("2024-01-02T00:00:00Z");
        let info = captured("20240101000000", true);

        let below = ArchivePolicy::new(86_401).decide(&info, now).unwrap();
        let equal = ArchivePolicy::new(86_400).decide(&info, now).unwrap();
        let above = ArchivePolicy::new(86_399).decide(&info, now).unwrap();

        assert!(matches!(below, ArchiveDecision::TooSoon { .. }));
        assert_eq!(
            equal,
            ArchiveDecision::TooSoon {
                elapsed_seconds: 86_400,
                min_seconds: 86_400
            }
        );
        assert_eq!(above, ArchiveDecision::Proceed);
    }

    // Liveness is not consulted once a capture exists, so a URL that has
    // since gone dead is still eligible. Kept as-is pending product guidance.
    #[test]
    fn test_old_snapshot_proceeds_even_when_not_live() {
        let now = at("2024-03-01T00:00:00Z");
        let decision = ArchivePolicy::default()
            .decide(&captured("20240101000000", false), now)
            .unwrap();
        assert_eq!(decision, ArchiveDecision::Proceed);
    }

    #[test]
    fn test_future_snapshot_is_too_soon() {
        let now = at("2024-01-01T00:00:00Z");
        let decision = ArchivePolicy::new(0)
            .decide(&captured("20240102000000", true), now)
            .unwrap();
        assert_eq!(
            decision,
            ArchiveDecision::TooSoon {
                elapsed_seconds: 0,
                min_seconds: 0
            }
        );
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        let result = ArchivePolicy::default().decide(&captured("2024", true), Utc::now());
        assert!(matches!(result, Err(ArchiveError::Timestamp(_))));
    }
}
