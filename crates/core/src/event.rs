//! Event model - what happened during a challenge session.

use serde::{Deserialize, Serialize};

use crate::id::SessionId;
use crate::Time;

/// A notable transition in a challenge session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeEvent {
    /// Owning session
    pub session_id: SessionId,

    /// When it happened
    pub timestamp: Time,

    /// What happened
    pub kind: ChallengeEventKind,

    /// Stillness accumulated at the time of the event
    pub elapsed_still_seconds: f64,
}

impl ChallengeEvent {
    /// Create a new event stamped with the current time.
    pub fn new(
        session_id: SessionId,
        kind: ChallengeEventKind,
        elapsed_still_seconds: f64,
    ) -> Self {
        Self {
            session_id,
            timestamp: chrono::Utc::now(),
            kind,
            elapsed_still_seconds,
        }
    }
}

/// Kind of challenge event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeEventKind {
    /// Session began ticking
    Started,
    /// Movement discarded accumulated progress
    Reset,
    /// Goal reached
    Finished,
    /// Host stopped the session before the goal
    Cancelled,
}

impl std::fmt::Display for ChallengeEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChallengeEventKind::Started => write!(f, "started"),
            ChallengeEventKind::Reset => write!(f, "reset"),
            ChallengeEventKind::Finished => write!(f, "finished"),
            ChallengeEventKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let session = SessionId::new();
        let event = ChallengeEvent::new(session, ChallengeEventKind::Reset, 4.0);
        assert_eq!(event.session_id, session);
        assert_eq!(event.kind, ChallengeEventKind::Reset);
        assert_eq!(event.elapsed_still_seconds, 4.0);
        assert!(event.timestamp <= chrono::Utc::now());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ChallengeEventKind::Started.to_string(), "started");
        assert_eq!(ChallengeEventKind::Finished.to_string(), "finished");
    }
}
