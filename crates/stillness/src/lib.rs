//! Stillness detection and goal tracking (the practice challenge engine).
//!
//! [`StillnessTracker`] holds the pure classification and accumulation
//! logic. [`ChallengeSession`] hosts one tracker, feeding it from an
//! injected [`MotionSource`] and [`Clock`] on a single task.

#![warn(missing_docs)]

pub mod classifier;
pub mod tracker;
pub mod source;
pub mod clock;
pub mod session;
pub mod presentation;

pub use classifier::{Motion, MotionClassifier};
pub use tracker::{CompletionCallback, StillnessTracker};
pub use source::{
    ChannelMotionSource, JsonLinesMotionSource, MotionAvailability, MotionSource,
    ScriptStep, ScriptedMotionSource, SourceError,
};
pub use clock::{Clock, IntervalClock, ManualClock, ManualTicker};
pub use session::{ChallengeSession, SessionError, SessionHandle, SessionOutcome, SessionReport};
