//! Text shown alongside the challenge progress bar.

use scanbuddy_core::{ScanType, TrackerSnapshot, CHALLENGE_TITLE};

/// Shown while the latest reading is still.
pub const KEEP_GOING: &str = "Great job. Keep going!";

/// Shown while the latest reading is moving.
pub const TRY_AGAIN: &str = "Oops! Try to freeze like a statue.";

/// Shown once when the goal is reached.
pub const FINISHED: &str = "You did it! You stayed still like a statue!";

/// Encouragement for the current classification.
pub fn status_line(snapshot: &TrackerSnapshot) -> &'static str {
    if snapshot.is_currently_still {
        KEEP_GOING
    } else {
        TRY_AGAIN
    }
}

/// "Stay still: 3 / 15 s"
pub fn counter_line(snapshot: &TrackerSnapshot) -> String {
    format!("Stay still: {} / {} s", snapshot.whole_seconds(), snapshot.goal_seconds)
}

/// Informational note for sessions without a sensor.
pub fn sensor_notice(snapshot: &TrackerSnapshot) -> Option<&'static str> {
    (!snapshot.has_motion_source)
        .then_some("No motion sensor found, so this is a countdown. Try to stay still anyway!")
}

/// `[#####-----]` filled by progress fraction.
pub fn progress_bar(snapshot: &TrackerSnapshot, width: usize) -> String {
    let filled = ((snapshot.progress_fraction * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Title and scan-specific hint for the challenge header.
pub fn header(scan: ScanType) -> String {
    format!("{}\n{}", CHALLENGE_TITLE, scan.challenge_hint())
}

/// One full status frame: bar, counter, status line.
pub fn frame(snapshot: &TrackerSnapshot, width: usize) -> String {
    format!(
        "{} {}  {}",
        progress_bar(snapshot, width),
        counter_line(snapshot),
        status_line(snapshot)
    )
}
