//! Broadcast bus carrying transmission events.

use super::{SentRecord, StopReason, TransmissionEvent};
use chrono::Utc;
use tokio::sync::broadcast;

/// Sender half of the event bus.
#[derive(Clone)]
pub struct EventSender {
    tx: broadcast::Sender<TransmissionEvent>,
}

impl EventSender {
    /// Send an event.
    pub fn send(&self, event: TransmissionEvent) -> Result<(), BusError> {
        self.tx.send(event).map_err(|_| BusError::Closed)?;
        Ok(())
    }

    /// Announce a run start.
    pub fn started(&self, rate_hz: f64) {
        let _ = self.send(TransmissionEvent::Started {
            rate_hz,
            timestamp: Utc::now(),
        });
    }

    /// Record an emitted message.
    pub fn sent(&self, record: SentRecord) {
        let _ = self.send(TransmissionEvent::Sent(record));
    }

    /// Record a skipped tick.
    pub fn source_failed(&self, detail: impl Into<String>) {
        let _ = self.send(TransmissionEvent::SourceFailed {
            detail: detail.into(),
        });
    }

    /// Record a failed persist.
    pub fn persist_failed(&self, detail: impl Into<String>) {
        let _ = self.send(TransmissionEvent::PersistFailed {
            detail: detail.into(),
        });
    }

    /// Announce run termination.
    pub fn stopped(&self, reason: StopReason, emitted: u64) {
        let _ = self.send(TransmissionEvent::Stopped { reason, emitted });
    }
}

/// Receiver half of the event bus.
pub struct EventReceiver {
    rx: broadcast::Receiver<TransmissionEvent>,
}

impl EventReceiver {
    /// Receive the next event.
    pub async fn recv(&mut self) -> Result<TransmissionEvent, BusError> {
        self.rx.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => BusError::Closed,
            broadcast::error::RecvError::Lagged(n) => BusError::Lagged(n),
        })
    }

    /// Try to receive an event without waiting.
    pub fn try_recv(&mut self) -> Result<Option<TransmissionEvent>, BusError> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Closed) => Err(BusError::Closed),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Err(BusError::Lagged(n)),
        }
    }
}

/// Event bus for engine-to-UI communication.
pub struct EventBus {
    tx: broadcast::Sender<TransmissionEvent>,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    /// Get a sender.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus errors.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Channel closed")]
    Closed,
    #[error("Lagged behind by {0} events")]
    Lagged(u64),
}
