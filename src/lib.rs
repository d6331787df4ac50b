//! # shuddhi
//!
//! Corpus-scale Malayalam script normalization and cleaning, built for
//! preparing multi-gigabyte LM training corpora under bounded memory.
//!
//! Two concerns meet here:
//!
//! - **Script normalization** — legacy encodings of chillu letters
//!   (consonant + virama, with or without zero-width joiners) are resolved
//!   to the atomic Unicode codepoints, misencoded visarga marks become the
//!   colons they were meant to be, and a corpus-mined [`script::Lexicon`]
//!   covers the cases the rules alone cannot decide.
//! - **Noise removal** — a structural character filter (allow-listing,
//!   stray combining marks, punctuation/whitespace collapsing) and a
//!   per-line boilerplate classifier (keywords, patterns, heuristics).
//!
//! Both run inside [`pipeline::ChunkedRunner`], which splits a file into
//! line-aligned byte ranges, processes each range in an isolated worker,
//! and merges the results in input order — output is byte-identical to a
//! sequential run for any worker count.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use shuddhi::pipeline::{ChunkedRunner, CleanConfig, CleanPipeline, NoopObserver, UnitFormat};
//! use shuddhi::script::Lexicon;
//!
//! # fn main() -> Result<(), shuddhi::error::PipelineError> {
//! let lexicon = Arc::new(Lexicon::empty());
//! let pipeline = CleanPipeline::new(lexicon, CleanConfig::default());
//! let runner = ChunkedRunner::new(4);
//! let report = runner.run(
//!     "corpus_raw.txt".as_ref(),
//!     "corpus_clean.txt".as_ref(),
//!     &pipeline,
//!     UnitFormat::Lines,
//!     &NoopObserver,
//! )?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod mine;
pub mod pipeline;
pub mod script;

pub use error::PipelineError;
pub use pipeline::{ChunkedRunner, CleanConfig, CleanPipeline, UnitFormat};
pub use script::Lexicon;
