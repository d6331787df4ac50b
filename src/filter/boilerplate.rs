//! Per-line boilerplate classification.
//!
//! Three detector families run in a fixed priority order: keyword substring
//! matches, structural regex patterns, then statistical heuristics. The
//! precise detectors pre-empt the noisy ones — the heuristics exist to catch
//! residual noise and only ever see lines the precise rules passed.
//!
//! Keyword and pattern sets are corpus-tuned data, not logic: swap them via
//! [`BoilerplateConfig`] when targeting a different corpus.

use regex::RegexBuilder;

use crate::script::is_malayalam;

/// Why a line was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Blank or whitespace-only.
    Empty,
    /// Matched a boilerplate keyword (case-insensitive substring).
    Keyword,
    /// Matched a structural regex pattern.
    Pattern,
    /// Caught by the statistical heuristics.
    Heuristic,
}

/// Keep/remove decision for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    Keep,
    Remove(RemovalReason),
}

impl LineVerdict {
    pub fn is_keep(&self) -> bool {
        matches!(self, LineVerdict::Keep)
    }
}

/// Built-in keyword triggers: copyright/legal notices, navigation and
/// call-to-action phrases, subscribe/share prompts, timestamps, and named
/// recurring site-specific boilerplate. Social-media platform names are
/// deliberately absent — they occur in legitimate news prose.
const DEFAULT_KEYWORDS: &[&str] = &[
    // Copyright / legal
    "©",
    "copyright",
    "all rights reserved",
    "terms of use",
    "privacy policy",
    "disclaimer",
    "cookie policy",
    // Navigation / call-to-action
    "also read",
    "don't miss",
    "don\u{2019}t miss",
    "read more",
    "read also",
    "click here",
    "subscribe",
    "sign up",
    "log in",
    "share this",
    "follow us",
    "join us",
    "see also",
    "previous:",
    "next:",
    "load more",
    "show more",
    "view more",
    // Timestamps / edition labels
    "last modified",
    "last updated",
    "english edition",
    "published:",
    "updated:",
    // Recurring site-specific lines
    "മറുനാടൻ ടിവിയുടെ ഫേസ്ബുക്ക് പേജ് ഹാക്ക് ചെയ്തു",
    "ഷാജൻ സ്കറിയയുടെ വീഡിയോ കാണാം",
    "കൂടുതൽ വായിക്കുക",
    "തുടർന്ന് വായിക്കുക",
    "സബ്സ്ക്രൈബ് ചെയ്യുക",
    "ഷെയർ ചെയ്യുക",
    "കമന്റ് ചെയ്യുക",
    "ലൈക്ക് ചെയ്യുക",
    "സെർച്ച്",
    // Ads / metadata
    "advertisement",
    "sponsored",
    "keywords:",
    "top-headlines",
    // Web UI fragments
    "begin typing your search above",
    "your comment added successfully",
    "consectetur adipiscing elit",
    "save my name, email, and website",
    "press ctrl+m to toggle",
    "download the fanport app",
    // Language selector boilerplate
    "ഭാഷ തിരഞ്ഞെടുക്കുക",
    "കൂടുതൽ ഭാഷ",
];

/// Built-in structural patterns, matched case-insensitively.
const DEFAULT_PATTERNS: &[&str] = &[
    // Copyright with year
    r"©.*\d{4}",
    r"Copyright.*\d{4}",
    r"All\s+rights\s+reserved",
    // Category-prefixed navigation lines
    r"^-\s*(News|Technology|Sports|Entertainment|Business|World|National|India)\s",
    // Separator-only lines
    r"^\s*[\-\|•·=]{3,}\s*$",
    // Bare date lines
    r"^\s*\|?\s*\d{1,2}\s*[A-Za-z]+\s*\d{4}\s*$",
    // Weekday-prefixed date lines
    r"^(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\s*,?\s+\d",
    // Raw URLs
    r"https?://\S+",
    // Wayback Machine archive references
    r"Archived\s+\d{4}-\d{2}-\d{2}\s+at\s+the\s+Wayback\s+Machine",
    // Pipe-delimited tag rows (3+ pipes)
    r"^[^|]*\|[^|]*\|[^|]*\|",
    // Semicolon-separated headline compilations
    r"^-\s+.+;\s+.+;\s+.+;\s+.+;\s+",
    // Phone-number-shaped sequences
    r"\+\d{1,4}[\s.-]?\d{1,4}[\s.-]?\d{1,4}[\s.-]?\d{1,9}",
    // Parenthesized bare language names
    r"^\s*\(?\s*(Hindi|Marathi|Gujarati|Kannada|Bengali|Malayalam|Telugu|Punjabi|Urdu|Odia|Assamese|Tamil|English|Sanskrit)\s*\)?\)?\s*$",
    // Lines of punctuation/symbols only, no letters at all
    r#"^[\s\(\)\[\]\{\}'.,:;!?\-_/*#@&|=+<>~`\\"]+$"#,
];

/// Swappable classifier configuration.
///
/// Keywords are matched as lowercase substrings; patterns are regex sources
/// compiled case-insensitively at construction.
#[derive(Debug, Clone)]
pub struct BoilerplateConfig {
    pub keywords: Vec<String>,
    pub patterns: Vec<String>,
    /// Lines shorter than this (chars) are noise.
    pub min_line_chars: usize,
    /// Minimum fraction of letter characters, applied above
    /// `letter_ratio_min_len`.
    pub min_letter_ratio: f64,
    pub letter_ratio_min_len: usize,
    /// Lines with zero target-script chars shorter than this are noise
    /// (long English lines may be legitimate quotes or references).
    pub no_target_max_len: usize,
    /// Minimum target-script share of alphabetic chars, applied above
    /// `target_ratio_min_len`.
    pub min_target_ratio: f64,
    pub target_ratio_min_len: usize,
}

impl Default for BoilerplateConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            patterns: DEFAULT_PATTERNS.iter().map(|s| s.to_string()).collect(),
            min_line_chars: 5,
            min_letter_ratio: 0.3,
            letter_ratio_min_len: 3,
            no_target_max_len: 80,
            min_target_ratio: 0.15,
            target_ratio_min_len: 30,
        }
    }
}

/// Per-line keep/remove classifier.
#[derive(Debug, Clone)]
pub struct BoilerplateClassifier {
    keywords: Vec<String>,
    patterns: Vec<regex::Regex>,
    config: BoilerplateConfig,
}

impl Default for BoilerplateClassifier {
    fn default() -> Self {
        Self::new(BoilerplateConfig::default()).expect("built-in patterns compile")
    }
}

impl BoilerplateClassifier {
    /// Compile the configured keyword and pattern sets.
    pub fn new(config: BoilerplateConfig) -> Result<Self, regex::Error> {
        let keywords = config.keywords.iter().map(|k| k.to_lowercase()).collect();
        let patterns = config
            .patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            keywords,
            patterns,
            config,
        })
    }

    /// Classify one line. First matching rule wins, in priority order:
    /// empty, keyword, pattern, heuristic.
    pub fn classify(&self, line: &str) -> LineVerdict {
        let stripped = line.trim();
        if stripped.is_empty() {
            return LineVerdict::Remove(RemovalReason::Empty);
        }

        let lower = stripped.to_lowercase();
        if self.keywords.iter().any(|kw| lower.contains(kw.as_str())) {
            return LineVerdict::Remove(RemovalReason::Keyword);
        }

        if self.patterns.iter().any(|p| p.is_match(stripped)) {
            return LineVerdict::Remove(RemovalReason::Pattern);
        }

        if self.is_heuristic_noise(stripped) {
            return LineVerdict::Remove(RemovalReason::Heuristic);
        }

        LineVerdict::Keep
    }

    /// Drop every removable line from a multi-line block.
    pub fn strip(&self, text: &str) -> String {
        let kept: Vec<&str> = text
            .split('\n')
            .filter(|line| self.classify(line).is_keep())
            .collect();
        kept.join("\n")
    }

    fn is_heuristic_noise(&self, stripped: &str) -> bool {
        let cfg = &self.config;
        let len = stripped.chars().count();

        if len < cfg.min_line_chars {
            return true;
        }
        if len > cfg.letter_ratio_min_len && letter_ratio(stripped) < cfg.min_letter_ratio {
            return true;
        }

        let target_chars = stripped.chars().filter(|&c| is_malayalam(c)).count();
        if target_chars == 0 && len < cfg.no_target_max_len {
            return true;
        }
        if len > cfg.target_ratio_min_len && target_ratio(stripped) < cfg.min_target_ratio {
            return true;
        }

        false
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || is_malayalam(c)
}

/// Fraction of all characters that are letters (ASCII or target script).
fn letter_ratio(line: &str) -> f64 {
    let total = line.chars().count();
    if total == 0 {
        return 0.0;
    }
    let letters = line.chars().filter(|&c| is_letter(c)).count();
    letters as f64 / total as f64
}

/// Target-script share of the alphabetic characters.
fn target_ratio(line: &str) -> f64 {
    let alpha = line.chars().filter(|&c| is_letter(c)).count();
    if alpha == 0 {
        return 0.0;
    }
    let target = line.chars().filter(|&c| is_malayalam(c)).count();
    target as f64 / alpha as f64
}
