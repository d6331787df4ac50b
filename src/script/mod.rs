//! Malayalam script model: codepoint classification and the ambiguous
//! legacy-encoding resolvers built on top of it.
//!
//! The classifier is a total, constant-time function over all scalars; the
//! resolvers ([`ChilluNormalizer`], [`VisargaNormalizer`]) rewrite legacy
//! encodings into canonical atomic form, consulting an optional corpus-mined
//! [`Lexicon`] where the rules alone cannot decide.

pub mod chillu;
pub mod lexicon;
pub mod visarga;

pub use chillu::ChilluNormalizer;
pub use lexicon::Lexicon;
pub use visarga::VisargaNormalizer;

/// Virama (candrakkala), U+0D4D.
pub const VIRAMA: char = '\u{0D4D}';
/// Zero-width joiner, the legacy "render as chillu" marker.
pub const ZWJ: char = '\u{200D}';
/// Zero-width non-joiner, the legacy "no ligature" marker.
pub const ZWNJ: char = '\u{200C}';
/// Visarga, U+0D03 — frequently a misencoded colon in digitized text.
pub const VISARGA: char = '\u{0D03}';

/// Semantic class of a Unicode scalar, derived purely from its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Malayalam consonant, U+0D15..=U+0D39.
    Consonant,
    /// Atomic chillu letter, U+0D7A..=U+0D7F.
    AtomicChillu,
    /// The virama combining mark, U+0D4D.
    Virama,
    /// Zero-width joiner.
    Joiner,
    /// Zero-width non-joiner.
    NonJoiner,
    /// Dependent vowel sign (matra), U+0D3E..=U+0D4C, plus the AU length
    /// mark U+0D57.
    VowelSign,
    /// Visarga, U+0D03.
    Visarga,
    /// Anything else, including all non-Malayalam scripts.
    Other,
}

/// Classify a scalar. Total over all of Unicode; no error cases.
pub fn classify(c: char) -> CharClass {
    match c {
        '\u{0D15}'..='\u{0D39}' => CharClass::Consonant,
        '\u{0D7A}'..='\u{0D7F}' => CharClass::AtomicChillu,
        VIRAMA => CharClass::Virama,
        '\u{0D3E}'..='\u{0D4C}' | '\u{0D57}' => CharClass::VowelSign,
        VISARGA => CharClass::Visarga,
        ZWJ => CharClass::Joiner,
        ZWNJ => CharClass::NonJoiner,
        _ => CharClass::Other,
    }
}

/// The atomic chillu counterpart of a consonant, if one is defined.
///
/// This is the standard Unicode correspondence; all six chillu letters are
/// covered. Whether a given caller *uses* the ക mapping is up to the caller —
/// the rule-based resolver restricts itself to the five common chillus.
pub fn atomic_chillu(c: char) -> Option<char> {
    match c {
        '\u{0D23}' => Some('\u{0D7A}'), // ണ → ൺ
        '\u{0D28}' => Some('\u{0D7B}'), // ന → ൻ
        '\u{0D30}' => Some('\u{0D7C}'), // ര → ർ
        '\u{0D32}' => Some('\u{0D7D}'), // ല → ൽ
        '\u{0D33}' => Some('\u{0D7E}'), // ള → ൾ
        '\u{0D15}' => Some('\u{0D7F}'), // ക → ൿ
        _ => None,
    }
}

/// True for any scalar in the Malayalam block, U+0D00..=U+0D7F.
pub fn is_malayalam(c: char) -> bool {
    matches!(c, '\u{0D00}'..='\u{0D7F}')
}

/// True for combining marks that require a base: vowel signs and the virama.
pub fn is_dependent_sign(c: char) -> bool {
    matches!(classify(c), CharClass::VowelSign | CharClass::Virama)
}

/// True for scalars a dependent sign may legally attach to: consonants,
/// atomic chillus, or another dependent sign (stacked signs occur in NFC
/// edge cases).
pub fn is_valid_sign_base(c: char) -> bool {
    matches!(
        classify(c),
        CharClass::Consonant | CharClass::AtomicChillu | CharClass::VowelSign | CharClass::Virama
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_consonants() {
        assert_eq!(classify('ക'), CharClass::Consonant);
        assert_eq!(classify('ന'), CharClass::Consonant);
        assert_eq!(classify('ഹ'), CharClass::Consonant);
    }

    #[test]
    fn test_classify_chillus() {
        for c in ['ൺ', 'ൻ', 'ർ', 'ൽ', 'ൾ', 'ൿ'] {
            assert_eq!(classify(c), CharClass::AtomicChillu, "{c:?}");
        }
    }

    #[test]
    fn test_classify_marks() {
        assert_eq!(classify(VIRAMA), CharClass::Virama);
        assert_eq!(classify('ാ'), CharClass::VowelSign);
        assert_eq!(classify('\u{0D57}'), CharClass::VowelSign);
        assert_eq!(classify(VISARGA), CharClass::Visarga);
        assert_eq!(classify(ZWJ), CharClass::Joiner);
        assert_eq!(classify(ZWNJ), CharClass::NonJoiner);
    }

    #[test]
    fn test_classify_is_total() {
        // Scalars outside every known range fall through to Other.
        assert_eq!(classify('a'), CharClass::Other);
        assert_eq!(classify('ä'), CharClass::Other);
        assert_eq!(classify('漢'), CharClass::Other);
        assert_eq!(classify('\u{0D00}'), CharClass::Other); // block start, not a letter class we model
    }

    #[test]
    fn test_atomic_chillu_correspondence() {
        assert_eq!(atomic_chillu('ന'), Some('ൻ'));
        assert_eq!(atomic_chillu('ര'), Some('ർ'));
        assert_eq!(atomic_chillu('ക'), Some('ൿ'));
        // Consonants without a chillu form.
        assert_eq!(atomic_chillu('യ'), None);
        assert_eq!(atomic_chillu('ത'), None);
    }

    #[test]
    fn test_sign_base_validity() {
        assert!(is_valid_sign_base('ക'));
        assert!(is_valid_sign_base('ൻ'));
        assert!(is_valid_sign_base('ാ'));
        assert!(!is_valid_sign_base(' '));
        assert!(!is_valid_sign_base('.'));
        assert!(!is_valid_sign_base('a'));
    }
}
