// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block segmenter: a forward-only state machine (Title → Author → Publisher)
// that reads one book's worth of lines per pass.
//
// Every pass consumes its first line unconditionally and each further step
// either consumes exactly one line or closes the pass, so a stream of n lines
// is segmented in at most n passes and 2n steps.

use std::ops::Range;

use tracing::trace;

use crate::classify::{
    LineKind, classify_line, ends_with_dangling_word, is_likely_title_text, is_publisher_line,
    is_title_continuation, strip_author_prefix,
};

/// Lines at least this long never continue an author or publisher block on
/// shape alone.
const SHORT_LINE_CHARS: usize = 30;

/// Segmenter state. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BlockState {
    Title,
    Author,
    Publisher,
}

/// The blocks of one book candidate and the input range they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlocks {
    pub title_lines: Vec<String>,
    pub author_lines: Vec<String>,
    pub publisher_lines: Vec<String>,
    /// Indices of the input lines consumed by this pass. Never empty.
    pub consumed_range: Range<usize>,
}

/// What the machine does with the line under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Consume the line into the block for this state.
    Take(BlockState),
    /// End the book here; the line belongs to the next pass.
    Close,
}

/// Segment one book starting at `start`. Returns `None` once the input is
/// exhausted.
pub fn next_blocks<S: AsRef<str>>(lines: &[S], start: usize) -> Option<TextBlocks> {
    if start >= lines.len() {
        return None;
    }

    let mut blocks = TextBlocks {
        consumed_range: start..start,
        ..Default::default()
    };

    // The first line always opens the title block; this is what guarantees
    // each pass advances the cursor.
    let mut state = BlockState::Title;
    blocks.title_lines.push(lines[start].as_ref().trim().to_string());
    let mut cursor = start + 1;

    while cursor < lines.len() {
        let line = lines[cursor].as_ref().trim();
        let step = next_step(state, line, &blocks);
        trace!(cursor, ?state, ?step, line, "segmenter step");

        match step {
            Step::Take(next) => {
                debug_assert!(next >= state, "segmenter moved backwards");
                state = next;
                push_line(&mut blocks, state, line);
                cursor += 1;
            }
            Step::Close => break,
        }
    }

    blocks.consumed_range = start..cursor;
    Some(blocks)
}

/// Segment the whole stream into consecutive books.
pub fn segment_all<S: AsRef<str>>(lines: &[S]) -> Vec<TextBlocks> {
    let mut out = Vec::new();
    let mut cursor = 0;
    while let Some(blocks) = next_blocks(lines, cursor) {
        cursor = blocks.consumed_range.end;
        out.push(blocks);
    }
    out
}

fn next_step(state: BlockState, line: &str, blocks: &TextBlocks) -> Step {
    match state {
        BlockState::Title => title_step(line, blocks),
        BlockState::Author => author_step(line, blocks),
        BlockState::Publisher => publisher_step(line),
    }
}

fn title_step(line: &str, blocks: &TextBlocks) -> Step {
    let previous = blocks.title_lines.last().map(String::as_str);

    // "THE NORTON ANTHOLOGY OF" cannot end a title, so the next line continues
    // it even when it is shaped like a name.
    if previous.is_some_and(ends_with_dangling_word) && !is_publisher_line(line) {
        return Step::Take(BlockState::Title);
    }

    match classify_line(line) {
        LineKind::Publisher => Step::Take(BlockState::Publisher),
        LineKind::Author => Step::Take(BlockState::Author),
        LineKind::Title if is_title_continuation(line, previous) => Step::Take(BlockState::Title),
        LineKind::Title => Step::Close,
    }
}

fn author_step(line: &str, blocks: &TextBlocks) -> Step {
    match classify_line(line) {
        LineKind::Publisher => Step::Take(BlockState::Publisher),
        LineKind::Author => Step::Take(BlockState::Author),
        LineKind::Title => {
            let last_author_len = blocks
                .author_lines
                .last()
                .map_or(0, |l| l.chars().count());
            if is_likely_title_text(line) && line.chars().count() > last_author_len {
                Step::Close
            } else if is_short(line) && starts_uppercase(line) {
                Step::Take(BlockState::Author)
            } else {
                Step::Close
            }
        }
    }
}

fn publisher_step(line: &str) -> Step {
    let single_word = !line.contains(char::is_whitespace);
    if is_publisher_line(line) || (is_short(line) && single_word && starts_uppercase(line)) {
        Step::Take(BlockState::Publisher)
    } else {
        Step::Close
    }
}

fn push_line(blocks: &mut TextBlocks, state: BlockState, line: &str) {
    match state {
        BlockState::Title => blocks.title_lines.push(line.to_string()),
        BlockState::Author => {
            let name = strip_author_prefix(line).unwrap_or(line);
            blocks.author_lines.push(name.to_string());
        }
        BlockState::Publisher => blocks.publisher_lines.push(line.to_string()),
    }
}

fn is_short(line: &str) -> bool {
    line.chars().count() < SHORT_LINE_CHARS
}

fn starts_uppercase(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_author_publisher() {
        let lines = ["HIS TRUTH IS MARCHING ON", "JON MEACHAM", "RANDOM HOUSE"];
        let blocks = next_blocks(&lines, 0).expect("blocks");
        assert_eq!(blocks.title_lines, vec!["HIS TRUTH IS MARCHING ON"]);
        assert_eq!(blocks.author_lines, vec!["JON MEACHAM"]);
        assert_eq!(blocks.publisher_lines, vec!["RANDOM HOUSE"]);
        assert_eq!(blocks.consumed_range, 0..3);
    }

    #[test]
    fn dangling_title_swallows_name_shaped_line() {
        let lines = ["THE NORTON ANTHOLOGY OF", "WORLD LITERATURE", "NORTON"];
        let blocks = next_blocks(&lines, 0).expect("blocks");
        assert_eq!(
            blocks.title_lines,
            vec!["THE NORTON ANTHOLOGY OF", "WORLD LITERATURE"]
        );
        assert!(blocks.author_lines.is_empty());
        assert_eq!(blocks.publisher_lines, vec!["NORTON"]);
    }

    #[test]
    fn multi_author_line_moves_to_author() {
        let lines = [
            "THE BOOK OF GUTSY WOMEN",
            "Hillary Rodham Clinton AND Chelsea Clinton",
        ];
        let blocks = next_blocks(&lines, 0).expect("blocks");
        assert_eq!(
            blocks.author_lines,
            vec!["Hillary Rodham Clinton AND Chelsea Clinton"]
        );
        assert!(blocks.publisher_lines.is_empty());
    }

    #[test]
    fn by_prefix_is_stripped() {
        let lines = ["A Tale of Two Cities", "by Charles Dickens"];
        let blocks = next_blocks(&lines, 0).expect("blocks");
        assert_eq!(blocks.author_lines, vec!["Charles Dickens"]);
    }

    #[test]
    fn multi_line_author_block() {
        let lines = ["THE SECOND MOUNTAIN", "DAVID BROOKS", "Anne Lamott", "PENGUIN PRESS"];
        let blocks = next_blocks(&lines, 0).expect("blocks");
        assert_eq!(blocks.author_lines, vec!["DAVID BROOKS", "Anne Lamott"]);
        assert_eq!(blocks.publisher_lines, vec!["PENGUIN PRESS"]);
    }

    #[test]
    fn longer_title_after_author_closes_book() {
        let lines = [
            "HIS TRUTH IS MARCHING ON",
            "JON MEACHAM",
            "THE BOOK OF GUTSY WOMEN",
            "Hillary Rodham Clinton AND Chelsea Clinton",
        ];
        let all = segment_all(&lines);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].consumed_range, 0..2);
        assert_eq!(all[1].consumed_range, 2..4);
        assert_eq!(all[1].title_lines, vec!["THE BOOK OF GUTSY WOMEN"]);
    }

    #[test]
    fn publisher_block_stops_on_non_imprint() {
        let lines = ["DUNE", "Frank Herbert", "ACE BOOKS", "The sequel continues here at length"];
        let all = segment_all(&lines);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].publisher_lines, vec!["ACE BOOKS"]);
        assert_eq!(all[1].consumed_range, 3..4);
    }

    #[test]
    fn never_moves_backwards() {
        // A title-shaped line after the publisher starts a new book rather than
        // reopening the title block.
        let lines = ["SAPIENS", "Yuval Noah Harari", "HARPER", "a brief history of humankind"];
        let all = segment_all(&lines);
        assert_eq!(all[0].title_lines, vec!["SAPIENS"]);
        assert!(all.len() >= 2);
    }

    #[test]
    fn exhausted_input_returns_none() {
        let lines: [&str; 0] = [];
        assert!(next_blocks(&lines, 0).is_none());
        assert!(next_blocks(&["one"], 1).is_none());
        assert!(segment_all(&lines).is_empty());
    }

    #[test]
    fn adversarial_input_terminates() {
        // Long lowercase prose: no rule continues a block.
        let line = "someone wandered somewhere far away long ago yesterday evening";
        let lines = vec![line; 10_000];
        let all = segment_all(&lines);
        assert_eq!(all.len(), 10_000);
        assert!(all.iter().all(|b| b.consumed_range.len() == 1));
    }
}
