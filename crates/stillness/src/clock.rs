//! Tick scheduler capability.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// A repeating trigger, owned and cancelled by the caller.
///
/// [`Clock::tick`] must be cancel-safe.
#[async_trait]
pub trait Clock: Send {
    /// Wait for the next tick. Returns `false` once the clock has shut down.
    async fn tick(&mut self) -> bool;
}

/// Ticks every `period`, starting one period from creation.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    /// Create a clock with the given period.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// The tick period.
    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl Clock for IntervalClock {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// A clock driven by explicit calls, for hosts that own their own timer.
#[derive(Debug)]
pub struct ManualClock {
    receiver: mpsc::UnboundedReceiver<()>,
}

/// Fires ticks on a [`ManualClock`]. Dropping it shuts the clock down.
#[derive(Debug, Clone)]
pub struct ManualTicker {
    sender: mpsc::UnboundedSender<()>,
}

impl ManualClock {
    /// Create a clock and its ticker.
    pub fn new() -> (ManualTicker, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (ManualTicker { sender }, Self { receiver })
    }
}

impl ManualTicker {
    /// Queue one tick. Returns `false` if the clock is gone.
    pub fn tick(&self) -> bool {
        self.sender.send(()).is_ok()
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn tick(&mut self) -> bool {
        self.receiver.recv().await.is_some()
    }
}
