//! Structural cleanup: codepoint allow-listing, stray combining marks,
//! punctuation and whitespace collapsing.
//!
//! A single left-to-right scan with one scalar of lookback does the
//! character-level work; the lookback is over the *post-filtering* stream,
//! so a vowel sign whose base was just dropped is correctly recognized as
//! stray. Everything here is referentially transparent — the returned text
//! is the only effect.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::script::{is_dependent_sign, is_valid_sign_base, ZWJ, ZWNJ};

/// Extra non-ASCII symbols kept by the allow-list: degree, copyright,
/// registered, common fractions, rupee, ellipsis.
const ALLOWED_EXTRA: &[char] = &[
    '\u{00B0}', '\u{00A9}', '\u{00AE}', '\u{00BD}', '\u{00BC}', '\u{20B9}', '\u{2026}',
];

/// Punctuation whose runs of 2+ identical marks collapse to one.
const COLLAPSIBLE_PUNCT: &[char] = &['.', '!', '?', ',', ';', ':', '-', '*', '#'];

/// Character-level structural filter.
///
/// Compiles its patterns once at construction; no process-wide caches.
#[derive(Debug, Clone)]
pub struct StructuralFilter {
    html_tag: Regex,
    ellipsis: Regex,
    spaced_punct: Regex,
    multi_space: Regex,
    multi_blank: Regex,
    asterisk_line: Regex,
}

impl Default for StructuralFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralFilter {
    pub fn new() -> Self {
        // Fixed patterns; compilation cannot fail.
        Self {
            html_tag: Regex::new(r"</?[a-zA-Z][^>]*/?>").expect("fixed pattern"),
            ellipsis: Regex::new(r"[.…]{2,}").expect("fixed pattern"),
            spaced_punct: Regex::new(r"([.!?,;:])(\s*[.!?,;:])+").expect("fixed pattern"),
            multi_space: Regex::new(r"[ \t]{2,}").expect("fixed pattern"),
            multi_blank: Regex::new(r"\n{3,}").expect("fixed pattern"),
            asterisk_line: Regex::new(r"^[\s*]+$").expect("fixed pattern"),
        }
    }

    /// Run the full structural cleanup on one unit of text.
    pub fn clean(&self, text: &str) -> String {
        let text: String = text.nfc().collect();
        let text = self.html_tag.replace_all(&text, "");
        let text = self.filter_chars(&text);
        let text = self.ellipsis.replace_all(&text, ".");
        let text = collapse_punct_runs(&text);
        let text = self.spaced_punct.replace_all(&text, "$1");
        let text = self.multi_space.replace_all(&text, " ");

        let mut lines: Vec<&str> = Vec::new();
        for line in text.split('\n') {
            let line = line.trim();
            if line.is_empty() || self.asterisk_line.is_match(line) {
                continue;
            }
            lines.push(line);
        }
        let text = lines.join("\n");
        self.multi_blank.replace_all(&text, "\n\n").into_owned()
    }

    /// Fused allow-list + stray-sign pass.
    ///
    /// `prev` tracks the previous scalar that *survived* filtering; dropped
    /// scalars neither emit nor update it, which is what makes a sign whose
    /// base was removed count as stray.
    fn filter_chars(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut prev: Option<char> = None;

        for c in text.chars() {
            if !is_allowed(c) {
                continue;
            }
            if is_dependent_sign(c) && !prev.is_some_and(is_valid_sign_base) {
                continue;
            }
            out.push(c);
            prev = Some(c);
        }
        out
    }
}

/// Allow-list: Malayalam block, printable ASCII, tab/newline/CR, the
/// joiners (consumed earlier by the resolver where they mark a legacy
/// sequence; any that remain are preserved, since deleting them can corrupt
/// valid conjuncts), and a small set of extra symbols.
fn is_allowed(c: char) -> bool {
    matches!(c, '\u{0D00}'..='\u{0D7F}' | '\u{0020}'..='\u{007E}' | '\t' | '\n' | '\r')
        || c == ZWJ
        || c == ZWNJ
        || ALLOWED_EXTRA.contains(&c)
}

/// Collapse runs of 2+ identical collapsible punctuation marks to one.
/// Manual scan — the regex crate has no backreferences.
fn collapse_punct_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if prev == Some(c) && COLLAPSIBLE_PUNCT.contains(&c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
