//! Visarga resolution — misencoded colons back to punctuation.
//!
//! The visarga (ഃ) is visually close to a colon, and OCR / lossy
//! transliteration frequently substitutes one for the other. A visarga that
//! ends a whitespace-delimited token is almost always a misencoded colon
//! ("Labelഃ value"); a visarga inside a token is legitimate orthography
//! (ദുഃഖം). A small set of real words *does* end in visarga — those are
//! protected by the corpus-validated word list in the [`Lexicon`].

use std::borrow::Cow;

use super::{Lexicon, VISARGA};

/// Resolver for token-final visarga marks.
///
/// Pure transform; an empty lexicon degrades to rule-only resolution
/// (every token-final visarga becomes a colon).
#[derive(Debug, Clone, Copy, Default)]
pub struct VisargaNormalizer;

impl VisargaNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Replace each token-final visarga with `:` unless the token is a
    /// known legitimate visarga-final word. Mid-token visargas are never
    /// touched.
    ///
    /// The token is the maximal run of non-whitespace characters ending at
    /// the visarga, exactly as it appears in the text.
    pub fn normalize<'a>(&self, text: &'a str, lexicon: &Lexicon) -> Cow<'a, str> {
        if !text.contains(VISARGA) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        let mut token = String::new();

        for c in text.chars() {
            if c.is_whitespace() {
                Self::flush(&mut out, &mut token, lexicon);
                out.push(c);
            } else {
                token.push(c);
            }
        }
        Self::flush(&mut out, &mut token, lexicon);

        Cow::Owned(out)
    }

    fn flush(out: &mut String, token: &mut String, lexicon: &Lexicon) {
        if token.ends_with(VISARGA) && !lexicon.is_visarga_word(token) {
            token.pop();
            token.push(':');
        }
        out.push_str(token);
        token.clear();
    }
}
