// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Shelfscan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Author recorded when no author block was recognised.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Axis-aligned rectangle in normalized image coordinates.
///
/// Coordinates lie in `[0, 1]` with the origin at the bottom-left corner, the
/// convention used by region detectors. Construction does not enforce the
/// invariant; use [`crate::geometry::is_valid`] before trusting a rect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl NormalizedRect {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Area, or `0.0` for inverted rects.
    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn mid_x(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        (self.min_y + self.max_y) / 2.0
    }
}

/// Crop rectangle in pixel coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A candidate book-spine rectangle produced by a region detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionProposal {
    pub bounding_box: NormalizedRect,
    pub confidence: f32,
}

impl RegionProposal {
    pub fn new(bounding_box: NormalizedRect, confidence: f32) -> Self {
        Self {
            bounding_box,
            confidence,
        }
    }
}

/// Proposals believed to cover one physical spine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRegionGroup {
    pub proposals: Vec<RegionProposal>,
    /// Union of every member's bounding box.
    pub combined_bounding_box: NormalizedRect,
}

impl BookRegionGroup {
    /// Highest member confidence, `0.0` for an empty group.
    pub fn best_confidence(&self) -> f32 {
        self.proposals
            .iter()
            .map(|p| p.confidence)
            .fold(0.0, f32::max)
    }
}

/// One line of recognised text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub confidence: f32,
    /// Present only for whole-image recognition, where layout drives segmentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<NormalizedRect>,
}

impl TextLine {
    /// Create a line without layout information. The text is trimmed.
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        let text: String = text.into();
        Self {
            text: text.trim().to_string(),
            confidence,
            position: None,
        }
    }

    /// Attach the line's position in the whole image.
    pub fn with_position(mut self, position: NormalizedRect) -> Self {
        self.position = Some(position);
        self
    }
}

/// A structured book record extracted from spine text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCandidate {
    pub title: String,
    /// [`UNKNOWN_AUTHOR`] when no author block was found.
    pub author: String,
    pub publisher: Option<String>,
}

impl BookCandidate {
    pub fn new(
        title: impl Into<String>,
        author: Option<String>,
        publisher: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            publisher: publisher.filter(|p| !p.trim().is_empty()),
        }
    }

    /// Whether the author is the placeholder rather than recognised text.
    pub fn has_unknown_author(&self) -> bool {
        self.author == UNKNOWN_AUTHOR
    }
}

/// Why a region produced no book.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FailureReason {
    #[error("region bounding box is invalid")]
    InvalidRegion,
    #[error("region crop falls outside the image")]
    CropOutOfBounds,
    #[error("text recognition failed: {0}")]
    RecognitionError(String),
    #[error("no text recognised in region")]
    NoText,
    #[error("recognised text too short to form a title")]
    TextTooShort,
}

/// A failed region, identified by its position in reading order (0-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub index: usize,
    pub reason: FailureReason,
}

impl Failure {
    /// 1-based book number for messages shown to people.
    pub fn book_number(&self) -> usize {
        self.index + 1
    }
}

/// Why a region was deliberately not processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The detector's best score for the group was below the configured minimum.
    LowConfidence { confidence: f32 },
}

/// Result of processing one region group or text chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessingOutcome {
    Success(BookCandidate),
    Skipped(SkipReason),
    Failed(Failure),
}

impl ProcessingOutcome {
    pub fn book(&self) -> Option<&BookCandidate> {
        match self {
            Self::Success(book) => Some(book),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Progress counter published after each region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub processed: usize,
    pub total: usize,
}

impl ScanProgress {
    /// Fraction complete in `[0, 1]`; an empty scan counts as complete.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f32 / self.total as f32
        }
    }
}

/// Unique identifier for one scan, used to correlate log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanId(pub Uuid);

impl ScanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which strategy produced the books in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStrategy {
    /// Each detected spine region was recognised in isolation.
    Regions,
    /// Whole-image recognition segmented by line positions.
    FullImage,
}

/// Summary of one orchestrated scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_id: ScanId,
    pub strategy: ScanStrategy,
    pub books: Vec<BookCandidate>,
    /// Per-region outcomes from the isolated pass, in reading order.
    pub outcomes: Vec<ProcessingOutcome>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.outcomes.iter().filter_map(ProcessingOutcome::failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_author_becomes_sentinel() {
        let book = BookCandidate::new("Middlemarch", None, None);
        assert_eq!(book.author, UNKNOWN_AUTHOR);
        assert!(book.has_unknown_author());
    }

    #[test]
    fn blank_fields_are_treated_as_missing() {
        let book = BookCandidate::new("Middlemarch", Some("  ".into()), Some(String::new()));
        assert_eq!(book.author, UNKNOWN_AUTHOR);
        assert_eq!(book.publisher, None);
    }

    #[test]
    fn text_line_is_trimmed() {
        let line = TextLine::new("  RANDOM HOUSE \n", 0.9);
        assert_eq!(line.text, "RANDOM HOUSE");
        assert!(line.position.is_none());
    }

    #[test]
    fn group_confidence_is_best_member() {
        let rect = NormalizedRect::new(0.1, 0.1, 0.2, 0.9);
        let group = BookRegionGroup {
            proposals: vec![
                RegionProposal::new(rect, 0.4),
                RegionProposal::new(rect, 0.8),
            ],
            combined_bounding_box: rect,
        };
        assert_eq!(group.best_confidence(), 0.8);
    }

    #[test]
    fn failure_book_number_is_one_based() {
        let failure = Failure {
            index: 2,
            reason: FailureReason::NoText,
        };
        assert_eq!(failure.book_number(), 3);
    }

    #[test]
    fn empty_progress_is_complete() {
        assert_eq!(ScanProgress::default().fraction(), 1.0);
        let half = ScanProgress {
            processed: 2,
            total: 4,
        };
        assert_eq!(half.fraction(), 0.5);
    }

    #[test]
    fn outcome_serializes_round_trip() {
        let outcome = ProcessingOutcome::Failed(Failure {
            index: 0,
            reason: FailureReason::RecognitionError("timeout".into()),
        });
        let json = serde_json::to_string(&outcome).expect("serialize");
        let back: ProcessingOutcome = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, outcome);
    }
}
