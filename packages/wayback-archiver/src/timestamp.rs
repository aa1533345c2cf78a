//! Archive timestamp decoding and age math.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::TimestampError;

const TIMESTAMP_LEN: usize = 14;

/// Parse a `YYYYMMDDHHMMSS` UTC timestamp as returned by the archive index.
///
/// Months in the timestamp are 1-based and chrono's constructor is 1-based
/// too, so the month digits are used as-is.
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>, TimestampError> {
    if ts.len() != TIMESTAMP_LEN || !ts.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::Malformed(ts.to_string()));
    }

    // All bytes are ASCII digits, so slicing and parsing cannot fail.
    let field = |range: std::ops::Range<usize>| -> u32 {
        ts[range]
            .bytes()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
    };

    let year = field(0..4) as i32;
    let month = field(4..6);
    let day = field(6..8);
    let hour = field(8..10);
    let minute = field(10..12);
    let second = field(12..14);

    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .ok_or_else(|| TimestampError::OutOfRange(ts.to_string()))
}

/// Whole seconds between `ts` and `now`, rounded to nearest, never negative.
pub fn elapsed_seconds(ts: &str, now: DateTime<Utc>) -> Result<u64, TimestampError> {
    let then = parse_timestamp(ts)?;
    let millis = (now - then).num_milliseconds();
    // Halves round up.
    let secs = (millis + 500).div_euclid(1000);
    Ok(secs.max(0) as u64)
}
