//! Transmission events.
//!
//! The engine publishes a structured record for everything that happens
//! during a run onto a broadcast bus; any number of subscribers (terminal
//! renderer, NDJSON bridge, counters) consume them without ever mutating
//! engine state.

mod bus;
mod types;

pub use bus::{BusError, EventBus, EventReceiver, EventSender};
pub use types::{SentRecord, StopReason, TransmissionEvent};
