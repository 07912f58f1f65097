//! hl7pump Library
//!
//! Core functionality for the hl7pump CLI: a synthetic HL7 test-message
//! transmitter with rate control, corpus replay, and per-message
//! persistence.
//!
//! ## Main Components
//!
//! - [`template`] - Segment templates, `{TIMESTAMP}` rendering, named snapshots
//! - [`patients`] - Builtin test-patient catalog
//! - [`source`] - Message sources (synthetic generation, corpus replay)
//! - [`sink`] - Best-effort per-message file persistence
//! - [`engine`] - The rate-controlled transmission loop
//! - [`events`] - Transmission event types and broadcast bus
//! - [`render`] - Terminal/NDJSON views of the transmission log
//! - [`config`] - Run configuration and validation
//!
//! ## Quick Start
//!
//! ```ignore
//! use hl7pump::{RunPlan, StopLimits, TemplateSet, Transmitter};
//!
//! let engine = Transmitter::new();
//! engine.set_rate(2.0)?;
//! engine.start(
//!     RunPlan::new(TemplateSet::default()).with_limits(StopLimits::after_count(5)),
//! )?;
//! engine.wait_until_idle().await;
//! ```

pub mod config;
pub mod engine;
pub mod events;
pub mod patients;
pub mod render;
pub mod sink;
pub mod source;
pub mod template;

// Re-export commonly used types
pub use config::{parse_stop_after, validate_rate, ConfigError, RunConfig};
pub use engine::{EngineError, EngineState, RunPlan, RunStatus, StopLimits, Transmitter};
pub use events::{
    BusError, EventBus, EventReceiver, EventSender, SentRecord, StopReason, TransmissionEvent,
};
pub use patients::{builtin_patients, find_patient, TestPatient};
pub use render::{LogRenderer, OutputMode, RenderStyle};
pub use sink::{FileSink, PersistError};
pub use source::{BoxedSource, Corpus, MessageSource, ReplaySource, SourceError, SyntheticSource};
pub use template::{TemplateError, TemplateRegistry, TemplateSet, TIMESTAMP_TOKEN};
