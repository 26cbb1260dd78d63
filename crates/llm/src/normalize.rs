//! Turn free-form model replies into structurally valid results
//!
//! Everything here is pure: raw reply text in, candidates or normalized
//! values out. Malformed replies never produce an error; missing items are
//! padded with fixed defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::types::{Difficulty, WordSets};

/// Questions per answer
pub const QUESTION_COUNT: usize = 5;

/// Words per difficulty category
pub const WORDS_PER_CATEGORY: usize = 10;

/// Pads question lists that came back short
pub const FILLER_QUESTION: &str = "What other aspects of this text would you like to explore?";

const EASY_DEFAULTS: [&str; WORDS_PER_CATEGORY] = [
    "apple", "house", "water", "happy", "friend", "book", "sun", "tree", "music", "family",
];

const MEDIUM_DEFAULTS: [&str; WORDS_PER_CATEGORY] = [
    "journey", "curious", "balance", "ancient", "gather", "harvest", "precise", "venture", "recover",
    "mystery",
];

const HARD_DEFAULTS: [&str; WORDS_PER_CATEGORY] = [
    "ubiquitous", "ephemeral", "meticulous", "pragmatic", "ambiguous", "resilient", "eloquent",
    "benevolent", "scrutinize", "paradigm",
];

/// Words that open a question even when the model forgot the `?`
const INTERROGATIVES: &[&str] = &[
    "what", "why", "how", "when", "where", "who", "whom", "whose", "which", "is", "are", "was",
    "were", "do", "does", "did", "can", "could", "would", "should", "will", "has", "have",
];

static QUESTION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:q|question)\s*\d*\s*[:.)\-]\s*").unwrap());

static CATEGORY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[\s#*\d.)"'•]*(easy|medium|hard)\b[^:,]{0,24}:\s*(.*)$"#).unwrap()
});

/// Fixed fallback words for a category
pub fn default_words(category: Difficulty) -> &'static [&'static str] {
    match category {
        Difficulty::Easy => &EASY_DEFAULTS,
        Difficulty::Medium => &MEDIUM_DEFAULTS,
        Difficulty::Hard => &HARD_DEFAULTS,
    }
}

/// Strip list markers ("1.", "2)", "[3]", "-", "•", "Q1:") from a line
///
/// Markers can be stacked ("Q1: 2. ..."), so stripping repeats until the
/// line stops changing.
fn strip_enumeration(line: &str) -> &str {
    let mut line = line.trim();
    loop {
        let stripped = line.trim_start_matches(|c: char| {
            c.is_ascii_digit() || c.is_whitespace() || ".)([]-*•#?".contains(c)
        });
        let stripped = match QUESTION_LABEL.find(stripped) {
            Some(label) => &stripped[label.end()..],
            None => stripped,
        };
        let stripped = stripped.trim();

        if stripped.len() == line.len() {
            return stripped;
        }
        line = stripped;
    }
}

/// Cleaned, non-empty reply lines
pub fn question_candidates(raw: &str) -> Vec<String> {
    raw.lines()
        .map(strip_enumeration)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn looks_like_question(candidate: &str) -> bool {
    if !candidate.chars().any(char::is_alphanumeric) {
        return false;
    }

    // A `?` only counts when there is text in front of it
    if let Some(idx) = candidate.rfind('?') {
        if candidate[..idx].chars().any(char::is_alphanumeric) {
            return true;
        }
    }

    let first_word: String = candidate
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase();
    INTERROGATIVES.contains(&first_word.as_str())
}

/// Make the candidate end in exactly one `?`
fn finish_question(candidate: &str) -> String {
    match candidate
        .rfind('?')
        .filter(|&idx| candidate[..idx].chars().any(char::is_alphanumeric))
    {
        Some(idx) => candidate[..=idx].trim_end().to_string(),
        _ => {
            let body = candidate.trim_end_matches(|c: char| c.is_whitespace() || ".:;,!".contains(c));
            format!("{}?", body)
        }
    }
}

/// Exactly [`QUESTION_COUNT`] questions, each ending in `?`
///
/// Order follows the reply; short lists are padded with [`FILLER_QUESTION`].
pub fn normalize_questions(raw: &str) -> Vec<String> {
    let mut questions: Vec<String> = question_candidates(raw)
        .iter()
        .filter(|candidate| looks_like_question(candidate))
        .map(|candidate| finish_question(candidate))
        .take(QUESTION_COUNT)
        .collect();

    if questions.len() < QUESTION_COUNT {
        debug!(
            "Padding questions: model produced {}, need {}",
            questions.len(),
            QUESTION_COUNT
        );
    }

    while questions.len() < QUESTION_COUNT {
        questions.push(FILLER_QUESTION.to_string());
    }

    questions
}

/// Strict path: parse the reply (or the JSON embedded in it)
///
/// Returns `None` when no JSON value can be recovered, so the caller can fall
/// back to line scanning.
pub fn parse_word_sets_json(raw: &str, categories: &[Difficulty]) -> Option<WordSets> {
    let value = extract_json(raw)?;
    let mut sets = WordSets::new();

    match value {
        Value::Object(map) => {
            for (key, words) in map {
                // "easy", "Easy", "easy_words"
                let name = key.trim().split(|c: char| !c.is_alphabetic()).next().unwrap_or("");
                let Ok(category) = name.parse::<Difficulty>() else {
                    continue;
                };
                sets.insert(category, json_words(&words));
            }
        }
        // A bare array only makes sense when one category was asked for
        Value::Array(_) if categories.len() == 1 => {
            sets.insert(categories[0], json_words(&value));
        }
        _ => return None,
    }

    Some(sets)
}

fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    // Code fences or chatter around the payload
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                    return Some(value);
                }
            }
        }
    }

    None
}

fn json_words(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(list) => list
            .split(',')
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Fallback path: scan lines for category markers and comma-separated words
pub fn word_set_candidates(raw: &str) -> WordSets {
    let mut sets = WordSets::new();
    let mut active: Option<Difficulty> = None;

    for line in raw.lines() {
        let line = line.trim().to_lowercase();
        if line.is_empty() {
            continue;
        }

        let rest = match CATEGORY_MARKER.captures(&line) {
            Some(caps) => {
                active = caps[1].parse().ok();
                caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string()
            }
            None => line.clone(),
        };

        let Some(category) = active else {
            continue;
        };

        let words = sets.entry(category).or_default();
        words.extend(rest.split(',').filter_map(clean_token));
    }

    sets
}

fn clean_token(token: &str) -> Option<String> {
    let token = token.trim();
    if token.starts_with('-') {
        return None;
    }

    let token = token.trim_start_matches(|c: char| {
        c.is_ascii_digit() || c.is_whitespace() || ".)([]*•\"'`".contains(c)
    });

    // "apple (a fruit)", "apple - a fruit", "apple: a fruit"
    let token = token.split(" (").next().unwrap_or(token);
    let token = token.split(" - ").next().unwrap_or(token);
    let token = token.split(':').next().unwrap_or(token);

    let token = token.trim_end_matches(|c: char| !c.is_alphanumeric());
    if token.is_empty() || token.split_whitespace().count() > 3 {
        return None;
    }

    Some(token.to_string())
}

/// Force a word list to exactly [`WORDS_PER_CATEGORY`] entries
///
/// Long lists keep their first entries; short lists are padded from the
/// category's defaults, skipping words already present.
pub fn fit_word_count(mut words: Vec<String>, category: Difficulty) -> Vec<String> {
    words.retain(|word| !word.trim().is_empty());
    words.truncate(WORDS_PER_CATEGORY);

    if words.len() < WORDS_PER_CATEGORY {
        debug!(
            "Padding {} words: model produced {}, need {}",
            category,
            words.len(),
            WORDS_PER_CATEGORY
        );
    }

    for default in default_words(category) {
        if words.len() >= WORDS_PER_CATEGORY {
            break;
        }
        if !words.iter().any(|word| word.eq_ignore_ascii_case(default)) {
            words.push(default.to_string());
        }
    }

    words
}

/// Exactly the requested categories, [`WORDS_PER_CATEGORY`] words each
pub fn normalize_word_sets(raw: &str, categories: &[Difficulty]) -> WordSets {
    let mut parsed = parse_word_sets_json(raw, categories).unwrap_or_else(|| {
        debug!("Word set reply is not JSON, scanning lines");
        word_set_candidates(raw)
    });

    categories
        .iter()
        .map(|category| {
            let words = parsed.remove(category).unwrap_or_default();
            (*category, fit_word_count(words, *category))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten(prefix: &str) -> Vec<String> {
        (1..=10).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_question_scenario() {
        let raw = "1. What is X?\n2. Why Y\nNot a question\n4. How Z?";
        assert_eq!(
            normalize_questions(raw),
            vec![
                "What is X?".to_string(),
                "Why Y?".to_string(),
                "How Z?".to_string(),
                FILLER_QUESTION.to_string(),
                FILLER_QUESTION.to_string(),
            ]
        );
    }

    #[test]
    fn test_questions_strip_markers() {
        let raw = "Here are your questions:\n[1] What drives evolution?\n2) How do cells divide?\n- Why is DNA stable?\n• Which organelle makes ATP?\nQ5: Where does translation happen?";
        assert_eq!(
            normalize_questions(raw),
            vec![
                "What drives evolution?",
                "How do cells divide?",
                "Why is DNA stable?",
                "Which organelle makes ATP?",
                "Where does translation happen?",
            ]
        );
    }

    #[test]
    fn test_questions_truncated_to_five() {
        let raw = (1..=8)
            .map(|i| format!("{}. What is fact {}?", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let questions = normalize_questions(&raw);
        assert_eq!(questions.len(), QUESTION_COUNT);
        assert_eq!(questions[4], "What is fact 5?");
    }

    #[test]
    fn test_questions_always_well_formed() {
        let replies = [
            "",
            "I cannot help with that.",
            "?\n??\n...",
            "**1. What is osmosis?** (Consider membranes.)",
            "What is X? Explain in detail.\n\n\nHow about Y",
        ];

        for raw in replies {
            let questions = normalize_questions(raw);
            assert_eq!(questions.len(), QUESTION_COUNT, "reply: {:?}", raw);
            for question in &questions {
                assert!(!question.is_empty());
                assert!(question.ends_with('?'), "{:?} from {:?}", question, raw);
            }
        }
    }

    #[test]
    fn test_question_cut_after_last_mark() {
        let questions = normalize_questions("**1. What is osmosis?** (Consider membranes.)");
        assert_eq!(questions[0], "What is osmosis?");
    }

    #[test]
    fn test_questions_idempotent() {
        for raw in [
            "1. What is X?\n2. Why Y\n3. How Z?",
            "Q1: 2. What is X?\nQuestion: - Why Y?",
            "Q1. (a) How does it work?\n[2] 3) Where?",
        ] {
            let first = normalize_questions(raw);
            let second = normalize_questions(&first.join("\n"));
            assert_eq!(first, second, "{}", raw);
        }
    }

    #[test]
    fn test_stacked_markers_stripped() {
        let questions = normalize_questions("Q1: 2. What is X?\nQuestion: - Why Y?");
        assert_eq!(questions[0], "What is X?");
        assert_eq!(questions[1], "Why Y?");
        assert_eq!(questions[2], FILLER_QUESTION);
    }

    #[test]
    fn test_bare_question_mark_is_not_a_question() {
        let questions = normalize_questions("? Explain photosynthesis\n?\n? Why do leaves fall");
        assert_eq!(questions[0], "Why do leaves fall?");
        assert!(questions[1..].iter().all(|q| q == FILLER_QUESTION));
    }

    #[test]
    fn test_word_sets_json_padding_scenario() {
        let raw = serde_json::json!({
            "easy": ["a", "b"],
            "medium": ten("m"),
            "hard": ten("h"),
        })
        .to_string();

        let sets = normalize_word_sets(&raw, &Difficulty::ALL);

        let easy = &sets[&Difficulty::Easy];
        assert_eq!(easy.len(), WORDS_PER_CATEGORY);
        assert_eq!(&easy[..2], &["a".to_string(), "b".to_string()]);
        assert_eq!(&easy[2..], &EASY_DEFAULTS[..8]);
        assert_eq!(sets[&Difficulty::Medium], ten("m"));
        assert_eq!(sets[&Difficulty::Hard], ten("h"));
    }

    #[test]
    fn test_word_sets_fenced_json() {
        let raw = format!(
            "Sure! Here you go:\n```json\n{}\n```",
            serde_json::json!({ "hard": ten("h") })
        );
        let sets = normalize_word_sets(&raw, &[Difficulty::Hard]);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[&Difficulty::Hard], ten("h"));
    }

    #[test]
    fn test_word_sets_truncates_long_lists() {
        let mut words = ten("e");
        words.extend(ten("x"));
        let raw = serde_json::json!({ "easy": words }).to_string();

        let sets = normalize_word_sets(&raw, &[Difficulty::Easy]);
        assert_eq!(sets[&Difficulty::Easy], ten("e"));
    }

    #[test]
    fn test_word_sets_bare_array_for_single_category() {
        let raw = serde_json::json!(ten("w")).to_string();
        let sets = normalize_word_sets(&raw, &[Difficulty::Medium]);
        assert_eq!(sets[&Difficulty::Medium], ten("w"));
    }

    #[test]
    fn test_word_set_line_scanning() {
        let raw = "Easy:\ncat, dog, sun\n1. tree, 2. milk\nMedium words: journey, harbor\n- note: these are tricky\nHARD: ubiquitous, \"ephemeral\", -skip\n";
        let sets = word_set_candidates(raw);

        assert_eq!(sets[&Difficulty::Easy], vec!["cat", "dog", "sun", "tree", "milk"]);
        assert_eq!(sets[&Difficulty::Medium], vec!["journey", "harbor"]);
        assert_eq!(sets[&Difficulty::Hard], vec!["ubiquitous", "ephemeral"]);
    }

    #[test]
    fn test_word_sets_free_text_padded() {
        let raw = "easy: cat, dog\nmedium: journey\nhard: paradigm, obfuscate";
        let sets = normalize_word_sets(raw, &Difficulty::ALL);

        assert_eq!(sets.len(), 3);
        for (category, words) in &sets {
            assert_eq!(words.len(), WORDS_PER_CATEGORY, "{}", category);
            assert!(words.iter().all(|w| !w.is_empty()));
        }

        // "paradigm" came from the model, so the default is not repeated
        let hard = &sets[&Difficulty::Hard];
        assert_eq!(hard.iter().filter(|w| *w == "paradigm").count(), 1);
        assert_eq!(&hard[..2], &["paradigm".to_string(), "obfuscate".to_string()]);
    }

    #[test]
    fn test_word_sets_garbage_reply_uses_defaults() {
        let sets = normalize_word_sets("I'm sorry, I can't do that.", &[Difficulty::Easy]);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[&Difficulty::Easy], EASY_DEFAULTS.to_vec());
    }

    #[test]
    fn test_only_requested_keys_returned() {
        let raw = serde_json::json!({
            "easy": ten("e"),
            "medium": ten("m"),
            "hard": ten("h"),
        })
        .to_string();
        let sets = normalize_word_sets(&raw, &[Difficulty::Medium]);
        assert_eq!(sets.keys().copied().collect::<Vec<_>>(), vec![Difficulty::Medium]);
    }
}
