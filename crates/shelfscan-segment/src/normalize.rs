// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field normalizers: case normalization and the joining of multi-line
// title, author and publisher blocks. Applied once, after a block closes.

/// Above this share of uppercase letters a line is treated as shouting.
const SHOUTING_RATIO: f32 = 0.8;

/// Connector tokens kept verbatim when an author list is title-cased.
const AUTHOR_CONNECTORS: &[&str] = &["AND", "&"];

/// Share of alphabetic characters that are uppercase; `0.0` without letters.
pub fn uppercase_ratio(s: &str) -> f32 {
    let mut letters = 0usize;
    let mut upper = 0usize;
    for c in s.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if c.is_uppercase() {
            upper += 1;
        }
    }
    if letters == 0 {
        0.0
    } else {
        upper as f32 / letters as f32
    }
}

/// Title-case `s` when it is mostly uppercase; otherwise return it unchanged.
///
/// Mixed and normal case is never altered. Idempotent.
pub fn normalize_case(s: &str) -> String {
    normalize_case_keeping(s, &[])
}

fn normalize_case_keeping(s: &str, keep: &[&str]) -> String {
    if uppercase_ratio(s) > SHOUTING_RATIO {
        title_case(s, keep)
    } else {
        s.to_string()
    }
}

/// Capitalise the first letter of every word and lowercase the rest. Words
/// matching `keep` (case-insensitively) are written in their `keep` form.
fn title_case(s: &str, keep: &[&str]) -> String {
    s.split_whitespace()
        .map(|word| match keep.iter().find(|k| k.eq_ignore_ascii_case(word)) {
            Some(kept) => (*kept).to_string(),
            None => capitalize_word(word),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut seen_letter = false;
    word.chars()
        .map(|c| {
            if !c.is_alphabetic() {
                c
            } else if seen_letter {
                single_lowercase(c)
            } else {
                seen_letter = true;
                single_uppercase(c)
            }
        })
        .collect()
}

// Case mappings that expand to several chars (e.g. 'ß' → "SS") are skipped so
// that title-casing stays a fixed point.
fn single_uppercase(c: char) -> char {
    let mut mapped = c.to_uppercase();
    match (mapped.next(), mapped.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

fn single_lowercase(c: char) -> char {
    let mut mapped = c.to_lowercase();
    match (mapped.next(), mapped.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn trimmed_non_empty<S: AsRef<str>>(lines: &[S]) -> Vec<&str> {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Join title lines with single spaces, preserving word order.
pub fn combine_title_lines<S: AsRef<str>>(lines: &[S]) -> String {
    trimmed_non_empty(lines).join(" ")
}

/// Join author lines.
///
/// A single line is returned as-is, since it may already list several
/// authors. Several lines are joined with spaces when one of them already
/// carries an `AND`/`&` connector, otherwise with `" AND "`.
pub fn combine_author_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let parts = trimmed_non_empty(lines);
    match parts.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        _ if parts.iter().any(|p| has_connector(p)) => parts.join(" "),
        _ => parts.join(" AND "),
    }
}

fn has_connector(line: &str) -> bool {
    line.contains(" AND ")
        || line.contains(" & ")
        || line.ends_with(" AND")
        || line.ends_with(" &")
        || line.starts_with("AND ")
        || line.starts_with("& ")
}

/// Join publisher lines with single spaces.
pub fn combine_publisher_lines<S: AsRef<str>>(lines: &[S]) -> String {
    trimmed_non_empty(lines).join(" ")
}

/// Combine an author block and normalize its case, keeping `AND`/`&`
/// connectors intact so the list stays visibly plural.
pub fn format_author_list<S: AsRef<str>>(lines: &[S]) -> String {
    normalize_case_keeping(&combine_author_lines(lines), AUTHOR_CONNECTORS)
}

/// Normalize each title line's case, then join.
pub fn format_title<S: AsRef<str>>(lines: &[S]) -> String {
    let normalized: Vec<String> = lines.iter().map(|l| normalize_case(l.as_ref())).collect();
    combine_title_lines(&normalized)
}

/// Normalize each publisher line's case, then join.
pub fn format_publisher<S: AsRef<str>>(lines: &[S]) -> String {
    let normalized: Vec<String> = lines.iter().map(|l| normalize_case(l.as_ref())).collect();
    combine_publisher_lines(&normalized)
}
