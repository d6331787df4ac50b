//! Error taxonomy for the cleaning pipeline.
//!
//! Fatal conditions (missing input, worker failure) surface as
//! [`PipelineError`]; recoverable conditions never reach this type —
//! undecodable bytes are replaced inline and a missing or malformed lexicon
//! degrades to rule-only resolution with a logged warning.

use std::path::PathBuf;

use thiserror::Error;

/// Run-level pipeline failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file is missing or unreadable. Raised before any chunk is
    /// dispatched.
    #[error("input file {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A worker failed mid-range. The whole run fails; intermediate
    /// artifacts are discarded and no partial output is published.
    #[error("worker failed on chunk {chunk}: {source}")]
    Worker {
        chunk: usize,
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// An invalid pattern in a user-supplied classifier configuration.
    #[error("invalid classifier pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O outside any specific chunk (output creation, final merge).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lexicon artifact serialization.
    #[error("lexicon artifact: {0}")]
    Artifact(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
