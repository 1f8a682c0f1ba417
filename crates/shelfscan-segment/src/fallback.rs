// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Position-based fallback segmenter.
//
// Used when no spine regions are available: whole-image recognition lines are
// split into per-book chunks by their layout, and each chunk is segmented on
// its own.

use shelfscan_core::{BookCandidate, NormalizedRect, ScanConfig, TextLine};
use tracing::{debug, instrument, warn};

use crate::books_from_texts;
use crate::filter::clean_lines;

/// Split positioned lines into chunks that each belong to one book.
///
/// Lines are visited by ascending `min_x`; a new chunk starts when a line is
/// separated from the previous one by more than `fallback_horizontal_gap` or
/// its vertical centre jumps by more than `fallback_vertical_center`. Within a
/// chunk, lines are returned top to bottom. Lines without a position are
/// dropped.
pub fn chunk_by_position(lines: &[TextLine], config: &ScanConfig) -> Vec<Vec<TextLine>> {
    let mut positioned: Vec<(NormalizedRect, &TextLine)> = Vec::with_capacity(lines.len());
    for line in lines {
        match line.position {
            Some(rect) => positioned.push((rect, line)),
            None => warn!(text = %line.text, "line has no position, dropped from whole-image segmentation"),
        }
    }
    positioned.sort_by(|a, b| a.0.min_x.total_cmp(&b.0.min_x));

    let mut chunks: Vec<Vec<(NormalizedRect, &TextLine)>> = Vec::new();
    let mut previous: Option<NormalizedRect> = None;
    for (rect, line) in positioned {
        let starts_chunk = previous.is_none_or(|prev| {
            rect.min_x - prev.max_x > config.fallback_horizontal_gap
                || (rect.mid_y() - prev.mid_y()).abs() > config.fallback_vertical_center
        });
        match chunks.last_mut() {
            Some(chunk) if !starts_chunk => chunk.push((rect, line)),
            _ => chunks.push(vec![(rect, line)]),
        }
        previous = Some(rect);
    }

    chunks
        .into_iter()
        .map(|mut chunk| {
            chunk.sort_by(|a, b| {
                b.0.mid_y()
                    .total_cmp(&a.0.mid_y())
                    .then(a.0.min_x.total_cmp(&b.0.min_x))
            });
            chunk.into_iter().map(|(_, line)| line.clone()).collect()
        })
        .collect()
}

/// Segment whole-image recognition output into books.
#[instrument(skip_all, fields(lines = lines.len()))]
pub fn segment_full_image(lines: &[TextLine], config: &ScanConfig) -> Vec<BookCandidate> {
    let cleaned = clean_lines(lines, config);
    let chunks = chunk_by_position(&cleaned, config);
    debug!(chunks = chunks.len(), "chunked whole-image lines");

    chunks
        .iter()
        .flat_map(|chunk| {
            let texts: Vec<&str> = chunk.iter().map(|l| l.text.as_str()).collect();
            books_from_texts(&texts, config)
        })
        .collect()
}
