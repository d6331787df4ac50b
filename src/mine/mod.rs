//! Offline pair mining: discover word-level corrections that are safe by
//! corpus self-consistency.
//!
//! Two passes over a corpus:
//!
//! 1. [`extract_vocabulary`] — chunked parallel scan collecting the
//!    deduplicated set of Malayalam words that carry a chillu-relevant
//!    sequence;
//! 2. [`mine_pairs`] — for every such word, apply the rule-based chillu
//!    resolution mechanically and accept the rewrite only when the
//!    canonical spelling is independently attested in the same vocabulary.
//!
//! The attestation requirement is what makes the output a *validated*
//! mapping: the corpus itself must already contain undisputed evidence
//! that the canonical spelling is a real word.

mod pairs;
mod vocabulary;

pub use pairs::{mine_pairs, save_pairs};
pub use vocabulary::{extract_vocabulary, save_vocabulary};
