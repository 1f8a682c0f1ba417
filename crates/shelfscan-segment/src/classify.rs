// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line classifier: stateless heuristics that label one trimmed line of spine
// text as a title continuation, an author line or a publisher line.
//
// Callers must ask the author/publisher questions before falling back to the
// title-continuation heuristics; multi-word names otherwise read as titles.

use crate::normalize::uppercase_ratio;

/// Words that mark a line as an imprint.
const PUBLISHER_KEYWORDS: &[&str] = &[
    "press",
    "publishing",
    "books",
    "publishers",
    "inc",
    "llc",
    "ltd",
    "company",
    "house",
];

/// Function words a title line may start with.
const TITLE_FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "of", "in", "on", "at", "for", "with", "from", "to",
];

/// Words that never appear in a personal name.
const COMMON_WORDS: &[&str] = &[
    "the", "a", "an", "of", "in", "on", "at", "for", "with", "from", "to", "and", "or", "but",
    "is", "are", "was", "be", "my", "your", "our", "his", "her", "its", "their", "this", "that",
    "how", "why", "what", "who", "when", "where", "not", "no", "by", "as", "into", "over",
    "under", "about", "after", "before", "all", "it", "we", "you", "i",
];

/// Words that leave a title line hanging. "on" and "in" are left out because
/// they close many titles as particles ("Marching On", "Let the Right One In").
const DANGLING_WORDS: &[&str] = &[
    "the", "a", "an", "of", "and", "for", "with", "from", "to", "at",
];

/// Lines at least this long are never "short".
const SHORT_LINE_CHARS: usize = 30;

/// Share of uppercase letters that marks a shouted title line.
const TITLE_UPPERCASE_RATIO: f32 = 0.7;

/// Label for a single line, evaluated in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Author,
    Publisher,
}

/// Label a line: publisher first, then author, otherwise title text.
pub fn classify_line(line: &str) -> LineKind {
    let line = line.trim();
    if is_publisher_line(line) {
        LineKind::Publisher
    } else if strip_author_prefix(line).is_some()
        || is_likely_author_name(line)
        || contains_multi_author_indicator(line)
    {
        LineKind::Author
    } else {
        LineKind::Title
    }
}

/// Imprint keyword present, or a short, space-free, all-caps word (`"NORTON"`).
///
/// The second rule also fires on short all-caps single-word titles; that
/// precision/recall trade-off is kept deliberately.
pub fn is_publisher_line(line: &str) -> bool {
    let line = line.trim();
    let lower = line.to_lowercase();
    let has_keyword = lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| PUBLISHER_KEYWORDS.contains(&token));

    has_keyword
        || (is_short(line) && !line.contains(char::is_whitespace) && is_all_uppercase(line))
}

/// `" and "`, `" & "` or `", "`, case-insensitively.
pub fn contains_multi_author_indicator(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains(" and ") || lower.contains(" & ") || lower.contains(", ")
}

/// Capitalised first character and either a comma (`"Meacham, Jon"`) or 2–4
/// words free of function words with at most one uncapitalised word.
pub fn is_likely_author_name(line: &str) -> bool {
    let line = line.trim();
    match line.chars().next() {
        Some(first) if first.is_uppercase() => {}
        _ => return false,
    }

    if line.contains(',') {
        return true;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    if words.iter().any(|w| is_common_word(w)) {
        return false;
    }

    let capitalized = words.iter().filter(|w| starts_uppercase(w)).count();
    capitalized + 1 >= words.len()
}

/// Longer than 15 characters and more than one word. Only a last resort.
pub fn is_likely_title_text(line: &str) -> bool {
    let line = line.trim();
    line.chars().count() > 15 && line.contains(' ')
}

/// Whether `line` plausibly continues a title whose last line so far is
/// `previous`. Does not consult the author/publisher predicates.
pub fn is_title_continuation(line: &str, previous: Option<&str>) -> bool {
    let line = line.trim();
    let lower = line.to_lowercase();

    uppercase_ratio(line) >= TITLE_UPPERCASE_RATIO
        || (is_short(line) && !line.contains(',') && !lower.contains(" by "))
        || starts_with_function_word(line)
        || previous.is_some_and(ends_with_dangling_word)
}

/// The title line ends on a preposition, article or conjunction.
pub fn ends_with_dangling_word(line: &str) -> bool {
    line.split_whitespace()
        .next_back()
        .map(bare_word)
        .is_some_and(|w| DANGLING_WORDS.contains(&w.as_str()))
}

/// `"by Jon Meacham"` → `Some("Jon Meacham")`.
pub fn strip_author_prefix(line: &str) -> Option<&str> {
    let line = line.trim();
    let prefix = line.get(..3)?;
    if prefix.eq_ignore_ascii_case("by ") {
        let rest = line[3..].trim();
        (!rest.is_empty()).then_some(rest)
    } else {
        None
    }
}

fn starts_with_function_word(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map(bare_word)
        .is_some_and(|w| TITLE_FUNCTION_WORDS.contains(&w.as_str()))
}

fn is_common_word(word: &str) -> bool {
    COMMON_WORDS.contains(&bare_word(word).as_str())
}

fn starts_uppercase(word: &str) -> bool {
    word.chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_uppercase)
}

fn is_short(line: &str) -> bool {
    line.chars().count() < SHORT_LINE_CHARS
}

fn is_all_uppercase(line: &str) -> bool {
    let mut letters = line.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

/// Lowercased word without surrounding punctuation.
fn bare_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
