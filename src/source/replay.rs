//! Corpus replay.

use super::{MessageSource, SourceError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;

/// A non-empty, ordered collection of message files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    paths: Vec<PathBuf>,
}

impl Corpus {
    /// Build a corpus from operator-supplied paths.
    ///
    /// Returns `None` for an empty list so callers can fall back to
    /// synthetic generation.
    pub fn new(paths: Vec<PathBuf>) -> Option<Self> {
        if paths.is_empty() {
            None
        } else {
            Some(Self { paths })
        }
    }

    /// Number of files in the corpus.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The member paths, in operator order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Replays corpus files, one per call, sampled uniformly with replacement.
///
/// Repetition is expected: previously chosen files are never excluded.
pub struct ReplaySource {
    corpus: Corpus,
    rng: StdRng,
}

impl ReplaySource {
    /// Create a replay source over a corpus.
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create with a seeded RNG for deterministic selection.
    pub fn with_seed(corpus: Corpus, seed: u64) -> Self {
        Self {
            corpus,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MessageSource for ReplaySource {
    fn next(&mut self) -> Result<String, SourceError> {
        let index = self.rng.gen_range(0..self.corpus.len());
        let path = &self.corpus.paths()[index];
        fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.clone(),
            source,
        })
    }
}
