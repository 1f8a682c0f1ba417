// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shelfscan extraction pipeline and scan orchestration.
//
// Drives the collaborators (region detector, text recognizer) one call at a
// time and feeds their output through the segmentation engine.

pub mod extraction;
pub mod scan;

#[cfg(test)]
mod test_support;

pub use extraction::{CancelHandle, ExtractionPipeline, ExtractionReport};
pub use scan::{SegmentedBooks, ShelfScanner, segment_books, segment_books_from_full_image};
