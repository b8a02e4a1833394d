//! ScanBuddy core data models.
//!
//! This crate defines the data structures shared by the stillness engine
//! and its hosts: motion samples, tracker configuration, progress snapshots,
//! and the challenge event log.

#![warn(missing_docs)]

// Identities
mod id;

// Inputs
mod sample;
mod config;

// Outputs
mod snapshot;
mod event;

// Challenge copy
mod scan;

// Re-exports
pub use id::SessionId;

pub use sample::{MotionSample, STANDARD_GRAVITY};
pub use config::{ConfigError, TrackerConfig};

pub use snapshot::{TrackerPhase, TrackerSnapshot};
pub use event::{ChallengeEvent, ChallengeEventKind};

pub use scan::{ScanType, CHALLENGE_TITLE};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
