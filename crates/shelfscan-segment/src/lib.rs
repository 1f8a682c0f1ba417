// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shelfscan text segmentation engine.
//
// Turns recognised spine text into book candidates. Synchronous and free of
// side effects; both the per-region and the whole-image strategies run
// through the same block segmenter.

pub mod blocks;
pub mod classify;
pub mod fallback;
pub mod filter;
pub mod grouping;
pub mod normalize;

use shelfscan_core::{BookCandidate, FailureReason, ScanConfig, TextLine};
use tracing::{debug, warn};

pub use blocks::{TextBlocks, next_blocks, segment_all};
pub use fallback::segment_full_image;
pub use grouping::group_regions;

/// Filter, segment and normalize `lines` into book candidates.
pub fn extract_books(lines: &[TextLine], config: &ScanConfig) -> Vec<BookCandidate> {
    let cleaned = filter::clean_lines(lines, config);
    let texts: Vec<&str> = cleaned.iter().map(|l| l.text.as_str()).collect();
    books_from_texts(&texts, config)
}

/// Extract the single book expected from one spine region.
///
/// More than one candidate means the region probably covers several spines;
/// the first is kept. When segmentation finds nothing usable, the longest
/// line is taken as a bare title.
pub fn book_from_region(
    lines: &[TextLine],
    config: &ScanConfig,
) -> Result<BookCandidate, FailureReason> {
    if lines.iter().all(|l| l.text.trim().is_empty()) {
        return Err(FailureReason::NoText);
    }

    let mut books = extract_books(lines, config).into_iter();
    if let Some(first) = books.next() {
        let extra = books.count();
        if extra > 0 {
            warn!(extra, "region yielded several books; keeping the first");
        }
        return Ok(first);
    }

    debug!("segmentation found no book, falling back to longest line");
    longest_line_fallback(lines, config).ok_or(FailureReason::TextTooShort)
}

/// The longest recognised line as a title with an unknown author, if it is
/// longer than `min_title_chars`.
///
/// Noise lines (ISBNs, URLs, letterless fragments) never qualify. Lines below
/// `min_line_confidence` still do: this is the last resort after the filtered
/// lines produced nothing.
pub fn longest_line_fallback(lines: &[TextLine], config: &ScanConfig) -> Option<BookCandidate> {
    let longest = lines
        .iter()
        .map(|l| l.text.trim())
        .filter(|text| !filter::is_noise(text))
        .fold("", |best, text| {
            if text.chars().count() > best.chars().count() {
                text
            } else {
                best
            }
        });

    let title = normalize::normalize_case(longest);
    (title.chars().count() > config.min_title_chars).then(|| BookCandidate::new(title, None, None))
}

pub(crate) fn books_from_texts<S: AsRef<str>>(lines: &[S], config: &ScanConfig) -> Vec<BookCandidate> {
    segment_all(lines)
        .iter()
        .filter_map(|blocks| build_candidate(blocks, config))
        .collect()
}

fn build_candidate(blocks: &TextBlocks, config: &ScanConfig) -> Option<BookCandidate> {
    let title = normalize::format_title(&blocks.title_lines);
    if title.chars().count() <= config.min_title_chars {
        debug!(%title, range = ?blocks.consumed_range, "title too short, candidate dropped");
        return None;
    }

    let author = (!blocks.author_lines.is_empty())
        .then(|| normalize::format_author_list(&blocks.author_lines));
    let publisher = (!blocks.publisher_lines.is_empty())
        .then(|| normalize::format_publisher(&blocks.publisher_lines));

    Some(BookCandidate::new(title, author, publisher))
}
