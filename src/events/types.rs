//! Event types published by the transmission engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successfully emitted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentRecord {
    /// 1-based sequence number within the run.
    pub seq: u64,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Full message text.
    pub text: String,
}

/// Why a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `stop()` was called.
    Manual,
    /// The configured message count was reached.
    CountReached,
    /// The configured duration elapsed.
    DurationReached,
}

/// Events published over the run lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransmissionEvent {
    /// A run began.
    Started {
        rate_hz: f64,
        timestamp: DateTime<Utc>,
    },
    /// A message was emitted.
    Sent(SentRecord),
    /// The source failed to produce a message; the tick was skipped.
    SourceFailed { detail: String },
    /// The sink failed to persist a message; the emission still counts.
    PersistFailed { detail: String },
    /// The run terminated.
    Stopped { reason: StopReason, emitted: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sent_event_serializes_tagged() {
        let event = TransmissionEvent::Sent(SentRecord {
            seq: 3,
            timestamp: Utc::now(),
            text: "MSH|".to_string(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"sent\""));
        assert!(json.contains("\"seq\":3"));
    }

    #[test]
    fn test_stop_reason_snake_case() {
        let json = serde_json::to_string(&StopReason::CountReached).unwrap();
        assert_eq!(json, "\"count_reached\"");
    }

    #[test]
    fn test_stopped_event_round_trips() {
        let event = TransmissionEvent::Stopped {
            reason: StopReason::DurationReached,
            emitted: 42,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: TransmissionEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            TransmissionEvent::Stopped {
                reason: StopReason::DurationReached,
                emitted: 42,
            }
        ));
    }
}
