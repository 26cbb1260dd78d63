//! Lightweight text analysis attached to summaries and questions

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Maximum number of key terms returned
pub const MAX_KEY_TERMS: usize = 20;

/// Detected subject of a study note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    Language,
    Science,
    QuantumComputing,
    Programming,
    Mathematics,
    Physics,
    General,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Science => "science",
            Self::QuantumComputing => "quantum_computing",
            Self::Programming => "programming",
            Self::Mathematics => "mathematics",
            Self::Physics => "physics",
            Self::General => "general",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject keywords, scored by substring hits. Earlier entries win ties.
const SUBJECT_KEYWORDS: &[(NoteType, &[&str])] = &[
    (
        NoteType::Language,
        &[
            "vocabulary", "grammar", "phrase", "pronunciation", "translate", "hiragana", "katakana",
            "kanji", "conjugation", "tense", "verb",
        ],
    ),
    (
        NoteType::Science,
        &[
            "theory", "experiment", "formula", "reaction", "compound", "species", "cell", "organism",
            "element",
        ],
    ),
    (
        NoteType::QuantumComputing,
        &["quantum", "qubit", "superposition", "entanglement"],
    ),
    (
        NoteType::Programming,
        &["code", "function", "algorithm", "programming"],
    ),
    (
        NoteType::Mathematics,
        &["theorem", "equation", "calculation", "math"],
    ),
    (NoteType::Physics, &["force", "energy", "particle", "physics"]),
];

static FOREIGN_TERM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // 日本語 (にほんご)
        r"([ぁ-んァ-ン一-龥ー]+)\s*[（(]([^)）]+)[)）]",
        // 日本語: Japanese
        r"([ぁ-んァ-ン一-龥ー]+)[:：]\s*([^\n]+)",
        // 日本語 - Japanese
        r"([ぁ-んァ-ン一-龥ー]+)\s*-\s*([^\n]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static CAPITALIZED_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-zA-Z]*(?:[ \t]+[A-Z][a-zA-Z]*)*\b").unwrap());

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

static DEFINED_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-zA-Z]*(?:[ \t]+[A-Z][a-zA-Z]*)*)[ \t]*:").unwrap());

/// Trim every line and drop the blank ones
pub fn clean_input_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick the subject with the most keyword hits, `General` when nothing matches
pub fn detect_note_type(text: &str) -> NoteType {
    let lower = text.to_lowercase();
    let mut best = (NoteType::General, 0usize);

    for (note_type, keywords) in SUBJECT_KEYWORDS {
        let hits = keywords.iter().filter(|kw| lower.contains(*kw)).count();
        if hits > best.1 {
            best = (*note_type, hits);
        }
    }

    best.0
}

fn is_japanese(c: char) -> bool {
    ('\u{3040}'..='\u{30ff}').contains(&c) || ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Japanese terms that come with a reading or a definition
pub fn extract_foreign_terms(text: &str) -> Vec<String> {
    let mut terms = BTreeSet::new();

    for pattern in FOREIGN_TERM_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let term = caps[1].trim();
            if term.chars().any(is_japanese) {
                terms.insert(term.to_string());
            }
        }
    }

    terms.into_iter().collect()
}

/// Capitalised phrases, parenthetical terms and `Term:` definitions
pub fn extract_key_terms(text: &str) -> Vec<String> {
    let mut terms = BTreeSet::new();

    for m in CAPITALIZED_PHRASE.find_iter(text) {
        terms.insert(m.as_str().trim().to_string());
    }
    for caps in PARENTHETICAL.captures_iter(text) {
        terms.insert(caps[1].trim().to_string());
    }
    for caps in DEFINED_TERM.captures_iter(text) {
        terms.insert(caps[1].trim().to_string());
    }

    terms
        .into_iter()
        .filter(|term| !term.is_empty())
        .take(MAX_KEY_TERMS)
        .collect()
}
