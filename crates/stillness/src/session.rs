//! Challenge session - hosts one tracker on one task.
//!
//! Samples, ticks and the stop signal are multiplexed with `select!`, so
//! the tracker is only ever touched from a single task. Branches are polled
//! stop, tick, sample: a source that always has samples ready cannot hold
//! off ticks, and a sample arriving on the same instant as a tick is
//! classified after that tick is scored.

use std::future::Future;

use scanbuddy_core::{
    ChallengeEvent, ChallengeEventKind, ConfigError, MotionSample, SessionId, TrackerConfig,
    TrackerSnapshot,
};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::source::{MotionAvailability, MotionSource, SourceError};
use crate::tracker::StillnessTracker;

/// Errors from a spawned session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session task panicked or was aborted
    #[error("Session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The task already failed and there is no report to return
    #[error("Session task already joined without a report")]
    AlreadyJoined,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Goal reached
    Completed,
    /// Stopped by the host, or the clock shut down, before the goal
    Cancelled,
}

/// Summary returned when a session ends.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Session identifier
    pub session_id: SessionId,
    /// How it ended
    pub outcome: SessionOutcome,
    /// Tracker state at the end
    pub final_snapshot: TrackerSnapshot,
    /// Transitions observed, oldest first
    pub events: Vec<ChallengeEvent>,
}

/// One practice challenge: a tracker plus its motion source and clock.
pub struct ChallengeSession<S, C> {
    id: SessionId,
    tracker: StillnessTracker,
    source: MotionAvailability<S>,
    clock: C,
    snapshots: watch::Sender<TrackerSnapshot>,
}

impl<S: MotionSource, C: Clock> ChallengeSession<S, C> {
    /// Create a session. The tracker's motion capability follows `source`.
    pub fn new(
        config: TrackerConfig,
        source: MotionAvailability<S>,
        clock: C,
    ) -> Result<Self, ConfigError> {
        let tracker = StillnessTracker::new(config, source.is_available())?;
        let (snapshots, _) = watch::channel(tracker.snapshot());
        Ok(Self {
            id: SessionId::new(),
            tracker,
            source,
            clock,
            snapshots,
        })
    }

    /// Set the callback fired once when the goal is reached.
    pub fn on_finished(mut self, callback: impl FnOnce(&TrackerSnapshot) + Send + 'static) -> Self {
        self.tracker.set_completion(Box::new(callback));
        self
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Receive a snapshot after every sample and tick.
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.snapshots.subscribe()
    }

    /// Run until the goal is reached or `stop` resolves.
    pub async fn run<F>(self, stop: F) -> SessionReport
    where
        F: Future<Output = ()>,
    {
        let Self {
            id,
            mut tracker,
            mut source,
            mut clock,
            snapshots,
        } = self;
        let mut events = vec![ChallengeEvent::new(id, ChallengeEventKind::Started, 0.0)];
        let mut source_open = source.is_available();
        tokio::pin!(stop);

        info!(session = %id, has_motion_source = source_open, "Challenge started");

        let outcome = loop {
            tokio::select! {
                biased;

                _ = &mut stop => {
                    info!(session = %id, "Challenge stopped by host");
                    break SessionOutcome::Cancelled;
                }

                ticked = clock.tick() => {
                    if !ticked {
                        info!(session = %id, "Clock shut down");
                        break SessionOutcome::Cancelled;
                    }

                    let before = tracker.elapsed_still_seconds();
                    let snapshot = tracker.on_tick();
                    snapshots.send_replace(snapshot);
                    debug!(
                        session = %id,
                        elapsed = snapshot.elapsed_still_seconds,
                        still = snapshot.is_currently_still,
                        "Tick"
                    );

                    if before > 0.0 && snapshot.elapsed_still_seconds == 0.0 {
                        events.push(ChallengeEvent::new(id, ChallengeEventKind::Reset, before));
                    }
                    if snapshot.is_finished {
                        break SessionOutcome::Completed;
                    }
                }

                next = next_sample(&mut source), if source_open => {
                    match next {
                        Some(Ok(sample)) => tracker.on_motion_sample(sample),
                        Some(Err(e)) => {
                            warn!(session = %id, "Unreadable motion sample: {}", e);
                            tracker.on_unreadable_sample();
                        }
                        None => {
                            warn!(session = %id, "Motion source ended; keeping last reading");
                            source_open = false;
                        }
                    }
                    snapshots.send_replace(tracker.snapshot());
                }
            }
        };

        let final_snapshot = tracker.snapshot();
        let kind = match outcome {
            SessionOutcome::Completed => ChallengeEventKind::Finished,
            SessionOutcome::Cancelled => ChallengeEventKind::Cancelled,
        };
        events.push(ChallengeEvent::new(id, kind, final_snapshot.elapsed_still_seconds));
        info!(
            session = %id,
            outcome = %kind,
            elapsed = final_snapshot.elapsed_still_seconds,
            "Challenge ended"
        );

        SessionReport {
            session_id: id,
            outcome,
            final_snapshot,
            events,
        }
    }
}

impl<S, C> ChallengeSession<S, C>
where
    S: MotionSource + 'static,
    C: Clock + 'static,
{
    /// Run on a new task. Stopping or dropping the handle ends the session.
    pub fn spawn(self) -> SessionHandle {
        let id = self.id;
        let snapshots = self.subscribe();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let join = tokio::spawn(self.run(async move {
            let _ = stop_rx.await;
        }));

        SessionHandle {
            id,
            stop: Some(stop_tx),
            snapshots,
            join: Some(join),
            report: None,
        }
    }
}

async fn next_sample<S: MotionSource>(
    source: &mut MotionAvailability<S>,
) -> Option<Result<MotionSample, SourceError>> {
    match source.source_mut() {
        Some(source) => source.next_sample().await,
        None => std::future::pending().await,
    }
}

/// Control handle for a spawned session.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    stop: Option<oneshot::Sender<()>>,
    snapshots: watch::Receiver<TrackerSnapshot>,
    join: Option<JoinHandle<SessionReport>>,
    report: Option<SessionReport>,
}

impl SessionHandle {
    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Receive snapshots as they change.
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.snapshots.clone()
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> TrackerSnapshot {
        *self.snapshots.borrow()
    }

    /// Ask the session to stop. Idempotent.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    /// Wait for the session to end.
    ///
    /// Later calls return the same report without waiting again.
    pub async fn wait(&mut self) -> Result<SessionReport, SessionError> {
        if let Some(report) = &self.report {
            return Ok(report.clone());
        }
        let Some(join) = self.join.as_mut() else {
            return Err(SessionError::AlreadyJoined);
        };

        let result = join.await;
        self.join = None;
        let report = result?;
        self.report = Some(report.clone());
        Ok(report)
    }
}
