//! Snapshot model - the presentation-facing view of a tracker.

use serde::{Deserialize, Serialize};

/// Read-only copy of tracker state taken after a sample or tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    /// Consecutive seconds of stillness, never above `goal_seconds`
    pub elapsed_still_seconds: f64,

    /// Target duration
    pub goal_seconds: f64,

    /// Classification of the latest sample
    pub is_currently_still: bool,

    /// Whether a motion source feeds this tracker
    pub has_motion_source: bool,

    /// Whether the goal has been reached
    pub is_finished: bool,

    /// `elapsed_still_seconds / goal_seconds`, within [0, 1]
    pub progress_fraction: f64,

    /// Ticks processed while running
    pub ticks: u64,
}

impl TrackerSnapshot {
    /// The state-machine view of this snapshot.
    pub fn phase(&self) -> TrackerPhase {
        if self.is_finished {
            TrackerPhase::Finished
        } else {
            TrackerPhase::Running {
                elapsed: self.elapsed_still_seconds,
            }
        }
    }

    /// Whole seconds of stillness, as shown on the counter.
    pub fn whole_seconds(&self) -> u64 {
        self.elapsed_still_seconds.floor() as u64
    }
}

/// Tracker state machine.
///
/// `Running(0)` is initial; `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackerPhase {
    /// Accumulating stillness
    Running {
        /// Seconds accumulated so far
        elapsed: f64,
    },
    /// Goal reached
    Finished,
}
