//! Chunked, order-preserving parallel file processing.
//!
//! [`ChunkedRunner`] splits an input file into line-aligned byte ranges,
//! runs a [`UnitTransform`] over each range in an isolated worker, and
//! reassembles the output in input order — byte-identical to sequential
//! processing for any worker count.
//!
//! The per-unit invariant that makes this correct: a unit's output depends
//! only on its own content and the read-only corpus-global lexicon, never
//! on sibling units or on which worker processed it.

pub mod chunk;
pub mod cleaner;
pub mod document;
pub mod observer;
pub mod runner;
mod worker;

pub use chunk::{plan_chunks, Chunk};
pub use cleaner::{CleanConfig, CleanPipeline};
pub use observer::{LogObserver, NoopObserver, ProgressObserver};
pub use runner::{ChunkedRunner, RunReport};

/// A per-unit text transform applied by workers.
///
/// Stateless with respect to sibling units; implementations may hold
/// read-only shared state (compiled patterns, the lexicon). Returning
/// `None` drops the unit — there is no partial survival.
pub trait UnitTransform: Send + Sync {
    fn apply(&self, unit: &str) -> Option<String>;
}

/// How the input file maps to transform units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFormat {
    /// One unit per input line.
    Lines,
    /// One logical document per input line, internal newlines escaped as
    /// the two-character sequence `\n`. Documents are unescaped before the
    /// transform; output is re-escaped one-per-line, or joined with a
    /// blank-line separator.
    EscapedDocs { escape_output: bool },
    /// Documents delimited by two or more consecutive blank lines.
    /// Boundaries cannot be chunk-aligned, so this format always runs on
    /// the sequential path regardless of the configured worker count.
    BlankLineDocs,
}
