//! The composed cleaning transform run by every worker.
//!
//! Per unit (line or document), in order: chillu resolution → visarga
//! resolution → lexicon word rewrite → structural filter → boilerplate
//! strip → final trim and minimum-length gate. Output depends only on the
//! unit's own content and the read-only lexicon, which is what makes the
//! chunked parallelism of [`super::ChunkedRunner`] correct.

use std::sync::Arc;

use crate::filter::{BoilerplateClassifier, StructuralFilter};
use crate::script::{ChilluNormalizer, Lexicon, VisargaNormalizer};

use super::UnitTransform;

/// Stage toggles and thresholds for [`CleanPipeline`].
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Resolve legacy chillu/visarga encodings (plus lexicon rewrites).
    pub resolve_script: bool,
    /// Run the structural character-level filter.
    pub structural: bool,
    /// Run the per-line boilerplate classifier.
    pub boilerplate: bool,
    /// Drop units shorter than this many characters after cleaning.
    /// Zero disables the gate.
    pub min_output_chars: usize,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            resolve_script: true,
            structural: true,
            boilerplate: true,
            min_output_chars: 20,
        }
    }
}

/// The full cleaning pipeline for one worker fleet.
///
/// Construct once; the lexicon is shared read-only across all workers for
/// the lifetime of the run.
#[derive(Debug, Clone)]
pub struct CleanPipeline {
    chillu: ChilluNormalizer,
    visarga: VisargaNormalizer,
    structural: StructuralFilter,
    boilerplate: BoilerplateClassifier,
    lexicon: Arc<Lexicon>,
    config: CleanConfig,
}

impl Default for CleanPipeline {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::empty()), CleanConfig::default())
    }
}

impl CleanPipeline {
    pub fn new(lexicon: Arc<Lexicon>, config: CleanConfig) -> Self {
        Self {
            chillu: ChilluNormalizer::new(),
            visarga: VisargaNormalizer::new(),
            structural: StructuralFilter::new(),
            boilerplate: BoilerplateClassifier::default(),
            lexicon,
            config,
        }
    }

    /// Replace the boilerplate classifier (e.g., corpus-specific keyword
    /// and pattern sets).
    pub fn with_boilerplate(mut self, classifier: BoilerplateClassifier) -> Self {
        self.boilerplate = classifier;
        self
    }

    /// Clean one unit. `None` means the unit is dropped.
    pub fn clean(&self, unit: &str) -> Option<String> {
        let mut text = unit.to_string();

        if self.config.resolve_script {
            text = self.chillu.normalize(&text).into_owned();
            text = self.visarga.normalize(&text, &self.lexicon).into_owned();
            if self.lexicon.pair_count() > 0 {
                let rewritten: Vec<String> = text
                    .split('\n')
                    .map(|line| self.lexicon.rewrite_line(line).into_owned())
                    .collect();
                text = rewritten.join("\n");
            }
        }

        if self.config.structural {
            text = self.structural.clean(&text);
        }

        if self.config.boilerplate {
            text = self.boilerplate.strip(&text);
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.config.min_output_chars > 0
            && trimmed.chars().count() < self.config.min_output_chars
        {
            return None;
        }
        Some(trimmed.to_string())
    }
}

impl UnitTransform for CleanPipeline {
    fn apply(&self, unit: &str) -> Option<String> {
        self.clean(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> CleanPipeline {
        CleanPipeline::default()
    }

    fn lenient() -> CleanPipeline {
        CleanPipeline::new(
            Arc::new(Lexicon::empty()),
            CleanConfig {
                min_output_chars: 0,
                boilerplate: false,
                ..CleanConfig::default()
            },
        )
    }

    #[test]
    fn test_full_pipeline_passes_clean_prose_through() {
        let raw = "പുതിയ പദ്ധതി പ്രകാരം നഗരത്തിലെ റോഡുകൾ നവീകരിക്കും എന്നു മന്ത്രി പറഞ്ഞു.";
        let cleaned = pipeline().clean(raw).unwrap();
        assert_eq!(cleaned, raw);
    }

    #[test]
    fn test_legacy_chillu_resolved_in_context() {
        let cleaned = lenient().clean("അവന\u{0D4D}\u{200D} വീട്ടിൽ പോയി").unwrap();
        assert_eq!(cleaned, "അവൻ വീട്ടിൽ പോയി");
    }

    #[test]
    fn test_visarga_colon_fix_in_context() {
        let cleaned = lenient().clean("വിലഃ 500 രൂപ").unwrap();
        assert_eq!(cleaned, "വില: 500 രൂപ");
    }

    #[test]
    fn test_boilerplate_lines_removed_from_document() {
        let doc = "നല്ല ദിവസമായിരുന്നു ഇന്നലെ എന്നാണ് എല്ലാവരും പറഞ്ഞത്\nSubscribe now\nമഴ തുടരുമെന്ന് കാലാവസ്ഥാ വകുപ്പ് അറിയിച്ചിട്ടുണ്ട്";
        let cleaned = pipeline().clean(doc).unwrap();
        assert_eq!(cleaned.lines().count(), 2);
        assert!(!cleaned.contains("Subscribe"));
    }

    #[test]
    fn test_short_unit_dropped() {
        assert_eq!(pipeline().clean("ചെറുത്"), None);
    }

    #[test]
    fn test_empty_unit_dropped() {
        assert_eq!(pipeline().clean(""), None);
        assert_eq!(pipeline().clean("   \n  "), None);
    }

    #[test]
    fn test_lexicon_pair_applied() {
        let lexicon = Arc::new(Lexicon::from_pairs([(
            "വാക്കുകള്".to_string(),
            "വാക്കുകൾ".to_string(),
        )]));
        let pipe = CleanPipeline::new(
            lexicon,
            CleanConfig {
                min_output_chars: 0,
                boilerplate: false,
                ..CleanConfig::default()
            },
        );
        // The rule already resolves ള് before the comma; the dictionary
        // covers the same word when the rules alone would not fire.
        let cleaned = pipe.clean("പല വാക്കുകള്, ഉണ്ട്").unwrap();
        assert!(cleaned.contains("വാക്കുകൾ,"));
    }

    #[test]
    fn test_unit_invariant_independent_of_neighbors() {
        // The same unit cleans identically regardless of what was cleaned
        // before it.
        let pipe = pipeline();
        let unit = "ഇന്നത്തെ പ്രധാന വാർത്തകൾ എല്ലാം ഇവിടെ വായിക്കാം";
        let first = pipe.clean(unit);
        let _ = pipe.clean("മറ്റൊരു രേഖ ഇതിനിടയിൽ കടന്നുപോയി എന്നു കരുതുക");
        assert_eq!(pipe.clean(unit), first);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let noisy = "അവന് പോയി!!!  വിലഃ 100 രൂപ… <b>ശരി</b> എന്നായിരുന്നു മറുപടി";
        let pipe = lenient();
        let once = pipe.clean(noisy).unwrap();
        let twice = pipe.clean(&once).unwrap();
        assert_eq!(once, twice);
    }
}
