//! The corpus-validated lexicon: word-level corrections the rules alone
//! cannot justify.
//!
//! Two artifacts, both produced offline and immutable after load:
//!
//! - **chillu pairs** — JSON object mapping a legacy surface word to its
//!   canonical spelling, mined by [`crate::mine`] with a corpus
//!   self-consistency check;
//! - **visarga words** — plain text, one word per line, listing legitimate
//!   visarga-final words that must not be rewritten to a colon.
//!
//! Loading is tolerant: a missing or malformed artifact logs a warning and
//! the resolvers degrade gracefully to rule-only behavior. The lexicon is
//! shared read-only across workers for the lifetime of a run.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;

/// Punctuation peeled off a token before dictionary lookup: ASCII
/// punctuation plus the smart quotes common in scraped news text.
const TOKEN_PUNCTUATION: &[char] = &[
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<',
    '=', '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~', '\u{2018}', '\u{2019}',
    '\u{201C}', '\u{201D}',
];

/// Read-only word-level correction tables.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    chillu_pairs: FxHashMap<String, String>,
    visarga_words: FxHashSet<String>,
}

impl Lexicon {
    /// An empty lexicon — resolvers run rule-only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from in-memory tables (used by tests and the miner).
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            chillu_pairs: pairs.into_iter().collect(),
            visarga_words: FxHashSet::default(),
        }
    }

    /// Build from a list of legitimate visarga-final words.
    pub fn with_visarga_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chillu_pairs: FxHashMap::default(),
            visarga_words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Load both artifacts, degrading per-artifact on failure.
    ///
    /// `None` paths are skipped silently; a present-but-unloadable artifact
    /// logs a warning and contributes nothing. Never fails.
    pub fn load_or_default(pairs: Option<&Path>, visarga_words: Option<&Path>) -> Self {
        let mut lexicon = Self::empty();

        if let Some(path) = pairs {
            match Self::load_pairs(path) {
                Ok(map) => {
                    info!("loaded {} chillu correction pairs from {}", map.len(), path.display());
                    lexicon.chillu_pairs = map;
                }
                Err(e) => {
                    warn!(
                        "chillu pair mapping {} unavailable ({e}); continuing rule-only",
                        path.display()
                    );
                }
            }
        }

        if let Some(path) = visarga_words {
            match Self::load_visarga_words(path) {
                Ok(set) => {
                    info!("loaded {} visarga-final words from {}", set.len(), path.display());
                    lexicon.visarga_words = set;
                }
                Err(e) => {
                    warn!(
                        "visarga word list {} unavailable ({e}); continuing rule-only",
                        path.display()
                    );
                }
            }
        }

        lexicon
    }

    fn load_pairs(path: &Path) -> Result<FxHashMap<String, String>> {
        let reader = BufReader::new(File::open(path)?);
        let map: FxHashMap<String, String> = serde_json::from_reader(reader)?;
        Ok(map)
    }

    fn load_visarga_words(path: &Path) -> Result<FxHashSet<String>> {
        let reader = BufReader::new(File::open(path)?);
        let mut set = FxHashSet::default();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                set.insert(word.to_string());
            }
        }
        Ok(set)
    }

    /// True when neither table has entries.
    pub fn is_empty(&self) -> bool {
        self.chillu_pairs.is_empty() && self.visarga_words.is_empty()
    }

    /// Number of chillu correction pairs.
    pub fn pair_count(&self) -> usize {
        self.chillu_pairs.len()
    }

    /// Is `token` a known legitimate visarga-final word?
    pub fn is_visarga_word(&self, token: &str) -> bool {
        self.visarga_words.contains(token)
    }

    /// Rewrite one whitespace-delimited token through the pair mapping.
    ///
    /// Leading and trailing punctuation is peeled off, the core word looked
    /// up, and the punctuation reattached on a hit. Unknown words come back
    /// unchanged.
    pub fn rewrite_word<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        let l_stripped = raw.trim_start_matches(TOKEN_PUNCTUATION);
        let leading = &raw[..raw.len() - l_stripped.len()];
        let core = l_stripped.trim_end_matches(TOKEN_PUNCTUATION);
        let trailing = &l_stripped[core.len()..];

        match self.chillu_pairs.get(core) {
            Some(canonical) => Cow::Owned(format!("{leading}{canonical}{trailing}")),
            None => Cow::Borrowed(raw),
        }
    }

    /// Rewrite every token of a line, rejoining with single spaces.
    ///
    /// With no pairs loaded the line passes through untouched (including
    /// its whitespace).
    pub fn rewrite_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if self.chillu_pairs.is_empty() {
            return Cow::Borrowed(line);
        }

        let mut out = String::with_capacity(line.len());
        for (i, word) in line.split_whitespace().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&self.rewrite_word(word));
        }
        Cow::Owned(out)
    }
}
