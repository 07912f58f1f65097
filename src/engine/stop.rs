//! Stop-condition evaluation.

use crate::events::StopReason;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Optional run limits. An unset limit never triggers; with both unset the
/// run only stops manually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StopLimits {
    /// Stop at or above this many emitted messages.
    pub count: Option<u64>,
    /// Stop at or above this many elapsed seconds.
    pub seconds: Option<f64>,
}

impl StopLimits {
    /// No limits; manual stop only.
    pub fn none() -> Self {
        Self::default()
    }

    /// Limit by emitted-message count.
    pub fn after_count(count: u64) -> Self {
        Self {
            count: Some(count),
            seconds: None,
        }
    }

    /// Limit by elapsed seconds.
    pub fn after_seconds(seconds: f64) -> Self {
        Self {
            count: None,
            seconds: Some(seconds),
        }
    }

    /// Which limit, if any, has been reached. A pure OR of two independent
    /// predicates; whichever is hit first ends the run.
    pub fn trigger(&self, emitted: u64, elapsed: Duration) -> Option<StopReason> {
        if self.count.is_some_and(|n| emitted >= n) {
            return Some(StopReason::CountReached);
        }
        if self.seconds.is_some_and(|s| elapsed.as_secs_f64() >= s) {
            return Some(StopReason::DurationReached);
        }
        None
    }

    /// Whether either limit has been reached.
    pub fn reached(&self, emitted: u64, elapsed: Duration) -> bool {
        self.trigger(emitted, elapsed).is_some()
    }
}
