//! Stillness tracker - classification and goal accumulation.

use scanbuddy_core::{ConfigError, MotionSample, TrackerConfig, TrackerPhase, TrackerSnapshot};
use tracing::{debug, info, warn};

use crate::classifier::{Motion, MotionClassifier};

/// Called once when the tracker reaches its goal.
pub type CompletionCallback = Box<dyn FnOnce(&TrackerSnapshot) + Send>;

/// Accumulates continuous stillness toward a goal.
///
/// Samples only update the still/moving flag. Progress moves on ticks:
/// ```text
/// Running(e) --tick, still-->  Running(e + Δ)
/// Running(e) --tick, moving--> Running(0)
/// Running(e) --e + Δ ≥ goal--> Finished
/// ```
/// `Finished` is terminal; build a new tracker to run again.
pub struct StillnessTracker {
    config: TrackerConfig,
    classifier: MotionClassifier,
    has_motion_source: bool,
    is_currently_still: bool,
    still_ticks: u64,
    goal_ticks: u64,
    elapsed_still_seconds: f64,
    is_finished: bool,
    ticks: u64,
    on_finished: Option<CompletionCallback>,
}

impl StillnessTracker {
    /// Create a tracker. Rejects invalid configs, including `goal_seconds <= 0`.
    pub fn new(config: TrackerConfig, has_motion_source: bool) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            goal = config.goal_seconds,
            threshold = config.movement_threshold,
            has_motion_source,
            "Created stillness tracker"
        );

        Ok(Self {
            classifier: MotionClassifier::from_config(&config),
            config,
            has_motion_source,
            is_currently_still: true,
            still_ticks: 0,
            goal_ticks: goal_ticks(&config),
            elapsed_still_seconds: 0.0,
            is_finished: false,
            ticks: 0,
            on_finished: None,
        })
    }

    /// Set the completion callback.
    pub fn with_completion(
        mut self,
        callback: impl FnOnce(&TrackerSnapshot) + Send + 'static,
    ) -> Self {
        self.on_finished = Some(Box::new(callback));
        self
    }

    /// Set the completion callback on an existing tracker.
    pub fn set_completion(&mut self, callback: CompletionCallback) {
        self.on_finished = Some(callback);
    }

    /// Classify a sample and remember whether it was still.
    ///
    /// Ignored once finished, or when the tracker was built without a
    /// motion source.
    pub fn on_motion_sample(&mut self, sample: MotionSample) {
        if self.is_finished {
            return;
        }
        if !self.has_motion_source {
            warn!("Ignoring motion sample: tracker has no motion source");
            return;
        }

        let motion = self.classifier.classify(&sample);
        if motion == Motion::Moving && !sample.is_finite() {
            warn!(?sample, "Non-finite motion sample treated as movement");
        }
        self.is_currently_still = motion.is_still();
    }

    /// Record a sample the source could not deliver. Counts as movement.
    pub fn on_unreadable_sample(&mut self) {
        if self.is_finished || !self.has_motion_source {
            return;
        }
        self.is_currently_still = false;
    }

    /// Advance by one tick interval and return the resulting snapshot.
    ///
    /// No-op once finished.
    pub fn on_tick(&mut self) -> TrackerSnapshot {
        if self.is_finished {
            return self.snapshot();
        }
        self.ticks += 1;

        if !self.has_motion_source || self.is_currently_still {
            self.still_ticks += 1;
            self.elapsed_still_seconds = (self.still_ticks as f64
                * self.config.tick_interval_seconds)
                .min(self.config.goal_seconds);
        } else {
            if self.still_ticks > 0 {
                debug!(discarded = self.elapsed_still_seconds, "Movement reset stillness");
            }
            self.still_ticks = 0;
            self.elapsed_still_seconds = 0.0;
        }

        if self.still_ticks >= self.goal_ticks {
            self.elapsed_still_seconds = self.config.goal_seconds;
            self.is_finished = true;
            info!(ticks = self.ticks, goal = self.config.goal_seconds, "Stillness goal reached");

            let snapshot = self.snapshot();
            if let Some(callback) = self.on_finished.take() {
                callback(&snapshot);
            }
            return snapshot;
        }

        self.snapshot()
    }

    /// `elapsed / goal`, clamped to [0, 1].
    pub fn progress_fraction(&self) -> f64 {
        let fraction = self.elapsed_still_seconds / self.config.goal_seconds;
        if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            elapsed_still_seconds: self.elapsed_still_seconds,
            goal_seconds: self.config.goal_seconds,
            is_currently_still: self.is_currently_still,
            has_motion_source: self.has_motion_source,
            is_finished: self.is_finished,
            progress_fraction: self.progress_fraction(),
            ticks: self.ticks,
        }
    }

    /// Current state-machine phase.
    pub fn phase(&self) -> TrackerPhase {
        self.snapshot().phase()
    }

    /// Seconds of continuous stillness so far.
    pub fn elapsed_still_seconds(&self) -> f64 {
        self.elapsed_still_seconds
    }

    /// Whether the latest sample was still.
    pub fn is_currently_still(&self) -> bool {
        self.is_currently_still
    }

    /// Whether a motion source feeds this tracker.
    pub fn has_motion_source(&self) -> bool {
        self.has_motion_source
    }

    /// Whether the goal was reached. Hosts stop ticking once this is true.
    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    /// The tracker's configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

/// Still ticks needed to reach the goal.
///
/// Counted in whole ticks so a sum that lands on the goal up to rounding
/// (0.3 + 0.3 + 0.3 against 0.9) finishes on that tick.
fn goal_ticks(config: &TrackerConfig) -> u64 {
    const TOLERANCE: f64 = 1e-9;
    let ticks = (config.goal_seconds / config.tick_interval_seconds - TOLERANCE).ceil();
    if ticks.is_finite() {
        (ticks as u64).max(1)
    } else {
        u64::MAX
    }
}

impl std::fmt::Debug for StillnessTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StillnessTracker")
            .field("config", &self.config)
            .field("has_motion_source", &self.has_motion_source)
            .field("is_currently_still", &self.is_currently_still)
            .field("elapsed_still_seconds", &self.elapsed_still_seconds)
            .field("is_finished", &self.is_finished)
            .finish_non_exhaustive()
    }
}
