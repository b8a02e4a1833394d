//! Motion source capability and adapters.
//!
//! A session selects over its source and clock, so every
//! [`MotionSource::next_sample`] implementation must be cancel-safe:
//! dropping the future before it resolves must not lose a sample.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use scanbuddy_core::MotionSample;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Errors a motion source can report for a single sample.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error reading the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sample could not be decoded
    #[error("Malformed sample: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A push stream of accelerometer samples.
#[async_trait]
pub trait MotionSource: Send {
    /// Wait for the next sample. `None` means the stream has ended.
    async fn next_sample(&mut self) -> Option<Result<MotionSample, SourceError>>;
}

#[async_trait]
impl<S: MotionSource + ?Sized> MotionSource for Box<S> {
    async fn next_sample(&mut self) -> Option<Result<MotionSample, SourceError>> {
        (**self).next_sample().await
    }
}

/// Whether a motion sensor exists, fixed for a session's lifetime.
#[derive(Debug)]
pub enum MotionAvailability<S> {
    /// Samples arrive from this source
    Available(S),
    /// No sensor; the challenge runs as a plain countdown
    Unavailable,
}

impl<S> MotionAvailability<S> {
    /// Whether a source is present.
    pub fn is_available(&self) -> bool {
        matches!(self, MotionAvailability::Available(_))
    }

    /// Mutable access to the source, if any.
    pub fn source_mut(&mut self) -> Option<&mut S> {
        match self {
            MotionAvailability::Available(source) => Some(source),
            MotionAvailability::Unavailable => None,
        }
    }
}

impl<S> From<Option<S>> for MotionAvailability<S> {
    fn from(source: Option<S>) -> Self {
        match source {
            Some(source) => MotionAvailability::Available(source),
            None => MotionAvailability::Unavailable,
        }
    }
}

/// One entry of a recorded sample script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Delay after the previous step, in milliseconds
    #[serde(default)]
    pub after_ms: u64,

    /// The sample delivered
    #[serde(flatten)]
    pub sample: MotionSample,
}

/// Replays a fixed sequence of samples on a timeline anchored at creation.
///
/// Deadlines are absolute, so a cancelled wait resumes toward the same
/// instant instead of restarting its delay.
#[derive(Debug)]
pub struct ScriptedMotionSource {
    origin: Instant,
    cursor: Duration,
    pending: VecDeque<(Duration, MotionSample)>,
}

impl ScriptedMotionSource {
    /// Create an empty script starting now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            cursor: Duration::ZERO,
            pending: VecDeque::new(),
        }
    }

    /// Build a script from recorded steps.
    pub fn from_steps(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        steps.into_iter().fold(Self::new(), |script, step| {
            script.then_after(Duration::from_millis(step.after_ms), step.sample)
        })
    }

    /// Parse recorded steps from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let steps: Vec<ScriptStep> = serde_json::from_str(json)?;
        Ok(Self::from_steps(steps))
    }

    /// Deliver `sample` `delay` after the previous one.
    pub fn then_after(mut self, delay: Duration, sample: MotionSample) -> Self {
        self.cursor += delay;
        self.pending.push_back((self.cursor, sample));
        self
    }

    /// Deliver `sample` `count` times, `every` apart.
    pub fn repeat(mut self, sample: MotionSample, every: Duration, count: usize) -> Self {
        for _ in 0..count {
            self = self.then_after(every, sample);
        }
        self
    }

    /// Samples not yet delivered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Default for ScriptedMotionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MotionSource for ScriptedMotionSource {
    async fn next_sample(&mut self) -> Option<Result<MotionSample, SourceError>> {
        let (offset, _) = *self.pending.front()?;
        tokio::time::sleep_until(self.origin + offset).await;
        self.pending.pop_front().map(|(_, sample)| Ok(sample))
    }
}

/// Reads one JSON sample per line, e.g. `{"x":0.1,"y":0.0,"z":9.8}`.
///
/// Blank lines are skipped. A malformed line yields
/// [`SourceError::Decode`] and the stream continues.
pub struct JsonLinesMotionSource<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesMotionSource<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> MotionSource for JsonLinesMotionSource<R> {
    async fn next_sample(&mut self) -> Option<Result<MotionSample, SourceError>> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    return Some(serde_json::from_str(line.trim()).map_err(SourceError::from))
                }
                Ok(None) => return None,
                Err(e) => return Some(Err(SourceError::Io(e))),
            }
        }
    }
}

/// Receives samples pushed from a sensor callback.
#[derive(Debug)]
pub struct ChannelMotionSource {
    receiver: mpsc::Receiver<MotionSample>,
}

impl ChannelMotionSource {
    /// Wrap an existing receiver.
    pub fn new(receiver: mpsc::Receiver<MotionSample>) -> Self {
        Self { receiver }
    }

    /// Create a sender for the sensor side and the matching source.
    pub fn pair(capacity: usize) -> (mpsc::Sender<MotionSample>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl MotionSource for ChannelMotionSource {
    async fn next_sample(&mut self) -> Option<Result<MotionSample, SourceError>> {
        self.receiver.recv().await.map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_scripted_source_honours_delays() {
        let start = Instant::now();
        let mut source = ScriptedMotionSource::new()
            .then_after(Duration::from_millis(200), MotionSample::at_rest(9.81))
            .then_after(Duration::from_millis(300), MotionSample::new(1.0, 0.0, 9.81));

        let first = source.next_sample().await.unwrap().unwrap();
        assert_eq!(first, MotionSample::at_rest(9.81));
        assert_eq!(start.elapsed(), Duration::from_millis(200));

        source.next_sample().await.unwrap().unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(500));
        assert!(source.next_sample().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scripted_source_is_cancel_safe() {
        let start = Instant::now();
        let mut source = ScriptedMotionSource::new()
            .then_after(Duration::from_secs(2), MotionSample::at_rest(9.81));

        let interrupted = tokio::time::timeout(Duration::from_secs(1), source.next_sample()).await;
        assert!(interrupted.is_err());
        assert_eq!(source.remaining(), 1);

        source.next_sample().await.unwrap().unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_builds_evenly_spaced_samples() {
        let source = ScriptedMotionSource::new().repeat(
            MotionSample::at_rest(9.81),
            Duration::from_millis(100),
            5,
        );
        assert_eq!(source.remaining(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_from_json() {
        let mut source = ScriptedMotionSource::from_json(
            r#"[{"after_ms": 100, "x": 0, "y": 0, "z": 9.81}, {"x": 4, "y": 0, "z": 9.81}]"#,
        )
        .unwrap();
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_sample().await.unwrap().unwrap(), MotionSample::at_rest(9.81));
        assert_eq!(source.next_sample().await.unwrap().unwrap(), MotionSample::new(4.0, 0.0, 9.81));
    }

    #[test]
    fn test_script_from_bad_json() {
        assert!(matches!(ScriptedMotionSource::from_json("[{"), Err(SourceError::Decode(_))));
    }

    #[tokio::test]
    async fn test_json_lines_source() {
        let input: &[u8] =
            b"{\"x\":0.0,\"y\":0.0,\"z\":9.81}\n\nnot json\n{\"x\":1,\"y\":2,\"z\":3}\n";
        let mut source = JsonLinesMotionSource::new(input);

        assert_eq!(source.next_sample().await.unwrap().unwrap(), MotionSample::at_rest(9.81));
        assert!(matches!(source.next_sample().await, Some(Err(SourceError::Decode(_)))));
        assert_eq!(source.next_sample().await.unwrap().unwrap(), MotionSample::new(1.0, 2.0, 3.0));
        assert!(source.next_sample().await.is_none());
    }

    #[tokio::test]
    async fn test_channel_source_ends_when_sender_drops() {
        let (sender, mut source) = ChannelMotionSource::pair(4);
        sender.send(MotionSample::at_rest(9.81)).await.unwrap();
        drop(sender);

        assert!(source.next_sample().await.unwrap().is_ok());
        assert!(source.next_sample().await.is_none());
    }

    #[tokio::test]
    async fn test_boxed_source_delegates() {
        let (sender, source) = ChannelMotionSource::pair(1);
        let mut boxed: Box<dyn MotionSource> = Box::new(source);
        sender.send(MotionSample::new(0.5, 0.5, 0.5)).await.unwrap();
        assert_eq!(boxed.next_sample().await.unwrap().unwrap(), MotionSample::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_availability_from_option() {
        let available: MotionAvailability<ChannelMotionSource> =
            Some(ChannelMotionSource::pair(1).1).into();
        assert!(available.is_available());
        let unavailable: MotionAvailability<ChannelMotionSource> = None.into();
        assert!(!unavailable.is_available());
    }
}
