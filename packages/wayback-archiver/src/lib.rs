//! Wayback Machine archiving with a recency policy.
//!
//! Before asking the Internet Archive to capture a URL, the archiver checks
//! the archive's own index: a URL captured less than the minimum interval ago
//! is rejected as too soon, and a URL that was never captured must be live.
//! Only then is a single Save Page Now request issued.
//!
//! # Example
//!
//! ```rust,ignore
//! use wayback_archiver::{ArchiveConfig, ArchiveError, Archiver};
//!
//! let archiver = Archiver::new(ArchiveConfig::default())?;
//!
//! match archiver.run("https://example.com/").await {
//!     Ok(result) => println!("archived at {}", result.location),
//!     Err(ArchiveError::TooSoon { elapsed, .. }) => println!("captured {elapsed}s ago"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! # Modules
//!
//! - [`timestamp`] - Archive timestamp decoding and age math
//! - [`lookup`] - Snapshot index client
//! - [`policy`] - Proceed / too soon / not live decision
//! - [`submit`] - Save request and response validation
//! - [`archiver`] - Orchestration
//! - [`testing`] - Mock transport for tests

pub mod archiver;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod lookup;
pub mod policy;
pub mod submit;
pub mod testing;
pub mod timestamp;
pub mod traits;
pub mod types;

pub use archiver::Archiver;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ArchiveConfig, DEFAULT_USER_AGENT};
pub use error::{ArchiveError, Result, TimestampError};
pub use http::ReqwestTransport;
pub use lookup::SnapshotLookupClient;
pub use policy::{ArchivePolicy, WEEK_SECONDS};
pub use submit::{parse_save_response, ArchiveSubmissionClient};
pub use timestamp::{elapsed_seconds, parse_timestamp};
pub use traits::HttpTransport;
pub use types::{ArchiveDecision, ArchiveResult, ResponseHead, SnapshotInfo};
