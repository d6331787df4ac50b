//! Self-consistency pair mining over an extracted vocabulary.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::script::ChilluNormalizer;

/// Mine legacy → canonical correction pairs.
///
/// A pair `(word, canonical)` is accepted only when the rule-based rewrite
/// changes the word **and** the canonical spelling independently occurs in
/// the vocabulary. Words whose rewrite is unattested produce no pair —
/// mining never manufactures spellings the corpus has not itself seen.
///
/// Membership testing is symmetric, so the result is invariant to
/// iteration order.
pub fn mine_pairs(vocabulary: &FxHashSet<String>) -> FxHashMap<String, String> {
    let normalizer = ChilluNormalizer::new();
    let mut pairs = FxHashMap::default();

    for word in vocabulary {
        let canonical = normalizer.normalize(word);
        if canonical.as_ref() != word && vocabulary.contains(canonical.as_ref()) {
            pairs.insert(word.clone(), canonical.into_owned());
        }
    }
    pairs
}

/// Persist the mapping as a sorted JSON object.
///
/// Serializing through a `BTreeMap` makes the artifact byte-deterministic
/// regardless of hash-map iteration order.
pub fn save_pairs(path: &Path, pairs: &FxHashMap<String, String>) -> Result<()> {
    let sorted: BTreeMap<&String, &String> = pairs.iter().collect();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &sorted)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[&str]) -> FxHashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_attested_pair_emitted() {
        // Both the legacy spelling and its canonical form occur.
        let pairs = mine_pairs(&vocab(&["അവന്", "അവൻ"]));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.get("അവന്").map(String::as_str), Some("അവൻ"));
    }

    #[test]
    fn test_unattested_rewrite_suppressed() {
        // The canonical spelling never occurs on its own: no pair.
        let pairs = mine_pairs(&vocab(&["അവന്"]));
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_already_canonical_words_produce_nothing() {
        let pairs = mine_pairs(&vocab(&["അവൻ", "ചിലർ"]));
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_multiple_pairs() {
        let pairs = mine_pairs(&vocab(&["അവന്", "അവൻ", "ആര്", "ആർ", "കഥ"]));
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.get("ആര്").map(String::as_str), Some("ആർ"));
    }

    #[test]
    fn test_saved_artifact_is_sorted_and_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.json");

        let pairs = mine_pairs(&vocab(&["അവന്", "അവൻ", "ആര്", "ആർ"]));
        save_pairs(&path, &pairs).unwrap();

        let loaded: BTreeMap<String, String> =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("അവന്").map(String::as_str), Some("അവൻ"));

        // Deterministic artifact: saving the same mapping twice is
        // byte-identical.
        let again = dir.path().join("pairs2.json");
        save_pairs(&again, &pairs).unwrap();
        assert_eq!(
            std::fs::read(&path).unwrap(),
            std::fs::read(&again).unwrap()
        );
    }
}
