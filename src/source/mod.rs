//! Message sources.
//!
//! A source produces one complete message per request. Two variants exist:
//! [`SyntheticSource`] renders messages from a template snapshot, and
//! [`ReplaySource`] replays pre-existing message files from a corpus,
//! sampled uniformly with replacement.

mod replay;
mod synthetic;

pub use replay::{Corpus, ReplaySource};
pub use synthetic::SyntheticSource;

use std::path::PathBuf;
use thiserror::Error;

/// Trait for message producers driven by the transmission loop.
///
/// Implementations must tolerate being called repeatedly at the configured
/// rate. A failed call is recoverable: the loop records it and moves on to
/// its next scheduling decision.
pub trait MessageSource: Send {
    /// Produce the next message.
    fn next(&mut self) -> Result<String, SourceError>;
}

/// Boxed source for dynamic dispatch.
pub type BoxedSource = Box<dyn MessageSource>;

/// Source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read corpus file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
