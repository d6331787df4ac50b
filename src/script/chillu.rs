//! Chillu resolution — legacy consonant+virama sequences to canonical form.
//!
//! Legacy Malayalam text encodes an atomic final consonant ("chillu") as
//! consonant + virama, optionally followed by a zero-width joiner. The same
//! consonant + virama prefix also starts ligatures (conjuncts), which must
//! keep the explicit pair. The resolver applies the joiner markers when
//! present and falls back to a lookahead heuristic for the bare "lazy
//! encoding" case.
//!
//! The heuristic is best-effort: without a dictionary it cannot distinguish
//! a genuine word-final chillu from a ligature-starting consonant.
//! Corpus-mined word-level corrections (see [`crate::mine`] and
//! [`super::Lexicon`]) cover the residue.

use std::borrow::Cow;

use super::{atomic_chillu, classify, CharClass, VIRAMA, ZWJ, ZWNJ};

/// Rule-based resolver for legacy chillu encodings.
///
/// Stateless and pure; construct once and share freely across workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChilluNormalizer;

impl ChilluNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// True for the five consonants the resolver rewrites. ക also has an
    /// atomic chillu (ൿ), but it is vanishingly rare in running text and
    /// ക്‌ sequences overwhelmingly start conjuncts, so ക always keeps its
    /// explicit pair.
    fn participates(c: char) -> bool {
        matches!(c, 'ണ' | 'ന' | 'ര' | 'ല' | 'ള')
    }

    /// Resolve every legacy sequence in `text` to its canonical form.
    ///
    /// Priority per sequence:
    /// 1. virama + ZWJ → atomic chillu (joiner consumed);
    /// 2. virama + ZWNJ → explicit consonant+virama (non-joiner dropped);
    /// 3. virama + consonant → keep consonant+virama (ligature);
    /// 4. anything else, including end of input → atomic chillu.
    ///
    /// An atomic chillu counts as a consonant for rule 3: it marks a spot
    /// where a previous pass already resolved a sequence, and re-resolving
    /// in front of it would make normalization non-idempotent.
    ///
    /// Joiners not attached to a participating sequence are preserved;
    /// stripping them blindly can corrupt valid conjuncts elsewhere.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(VIRAMA) {
            return Cow::Borrowed(text);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if Self::participates(c) && chars.get(i + 1) == Some(&VIRAMA) {
                // Safe: every participating consonant has a chillu form.
                let chillu = atomic_chillu(c).unwrap_or(c);
                match chars.get(i + 2) {
                    Some(&ZWJ) => {
                        out.push(chillu);
                        i += 3;
                    }
                    Some(&ZWNJ) => {
                        out.push(c);
                        out.push(VIRAMA);
                        i += 3;
                    }
                    Some(&next)
                        if matches!(
                            classify(next),
                            CharClass::Consonant | CharClass::AtomicChillu
                        ) =>
                    {
                        out.push(c);
                        out.push(VIRAMA);
                        i += 2;
                    }
                    _ => {
                        out.push(chillu);
                        i += 2;
                    }
                }
            } else {
                out.push(c);
                i += 1;
            }
        }

        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        ChilluNormalizer::new().normalize(text).into_owned()
    }

    #[test]
    fn test_joiner_resolves_to_chillu() {
        // ന + virama + ZWJ → ൻ
        assert_eq!(normalize("അവന\u{0D4D}\u{200D}"), "അവൻ");
        // All five participating consonants.
        assert_eq!(normalize("ണ\u{0D4D}\u{200D}"), "ൺ");
        assert_eq!(normalize("ര\u{0D4D}\u{200D}"), "ർ");
        assert_eq!(normalize("ല\u{0D4D}\u{200D}"), "ൽ");
        assert_eq!(normalize("ള\u{0D4D}\u{200D}"), "ൾ");
    }

    #[test]
    fn test_non_joiner_keeps_explicit_pair() {
        // ZWNJ explicitly requests no ligature; the marker itself is dropped.
        assert_eq!(normalize("അവന\u{0D4D}\u{200C}"), "അവന\u{0D4D}");
    }

    #[test]
    fn test_bare_pair_before_consonant_is_ligature() {
        // ന് followed by ന starts the ന്ന conjunct — must keep the pair.
        assert_eq!(normalize("വന്നു"), "വന്നു");
        assert_eq!(normalize("എന്തു"), "എന്തു");
    }

    #[test]
    fn test_bare_pair_at_end_resolves_to_chillu() {
        assert_eq!(normalize("അവന്"), "അവൻ");
        assert_eq!(normalize("ആര്"), "ആർ");
    }

    #[test]
    fn test_bare_pair_before_space_and_punctuation() {
        assert_eq!(normalize("അവന് വന്നു"), "അവൻ വന്നു");
        assert_eq!(normalize("അവന്."), "അവൻ.");
    }

    #[test]
    fn test_non_participating_consonant_untouched() {
        // യ് has no chillu form; ക് participates in the standard
        // correspondence but is excluded from rule-based resolution.
        assert_eq!(normalize("ആയ്"), "ആയ്");
        assert_eq!(normalize("ഒരിക്"), "ഒരിക്");
    }

    #[test]
    fn test_stray_joiner_outside_sequence_preserved() {
        // A joiner that is not part of a participating legacy sequence
        // passes through untouched.
        assert_eq!(normalize("ക\u{200D}ഖ"), "ക\u{200D}ഖ");
    }

    #[test]
    fn test_geminate_then_final_pair() {
        // First pair is a ligature, trailing pair becomes a chillu.
        assert_eq!(normalize("ന്ന്"), "ന്ൻ");
        // The result is a fixpoint: a pair in front of an atomic chillu is
        // not resolved again.
        assert_eq!(normalize("ന്ൻ"), "ന്ൻ");
    }

    #[test]
    fn test_no_virama_fast_path_borrows() {
        let text = "സാധാരണ വാക്യം";
        assert!(matches!(
            ChilluNormalizer::new().normalize(text),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_idempotent() {
        let noisy = "അവന\u{0D4D}\u{200D} വന്നു, ആര് അറിയും";
        let once = normalize(noisy);
        assert_eq!(normalize(&once), once);
    }
}
