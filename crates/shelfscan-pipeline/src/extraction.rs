// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sequential extraction pipeline.
//
// Region groups are processed strictly one at a time, in reading order, so
// failure indices line up with the books as a person sees them on the shelf.
// Every group ends in exactly one `ProcessingOutcome`; nothing a single group
// does can abort the batch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::DynamicImage;
use shelfscan_bridge::TextRecognizer;
use shelfscan_core::geometry::{is_valid, to_pixel_crop};
use shelfscan_core::{
    BookCandidate, BookRegionGroup, Failure, FailureReason, ProcessingOutcome, ScanConfig,
    ScanProgress, SkipReason,
};
use shelfscan_document::image::processor::crop_image;
use shelfscan_segment::book_from_region;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Cooperative cancellation flag shared between a pipeline and its caller.
///
/// Checked before each group; a recognizer call already in flight is allowed
/// to finish. The flag stays set until [`CancelHandle::reset`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a request so the next run starts fresh.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Everything one pass over the region groups produced.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// One outcome per processed group, in reading order.
    pub outcomes: Vec<ProcessingOutcome>,
    /// The successful outcomes' books, in reading order.
    pub books: Vec<BookCandidate>,
    /// Number of groups handed to the pipeline.
    pub total: usize,
    /// The pass stopped early; `outcomes` covers only the groups before that.
    pub cancelled: bool,
}

impl ExtractionReport {
    /// Groups existed but none produced a book; the caller should retry on
    /// the whole image.
    pub fn isolation_yielded_nothing(&self) -> bool {
        self.total > 0 && self.books.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.outcomes.iter().filter_map(ProcessingOutcome::failure)
    }
}

/// Turns region groups into books, one recognizer call at a time.
pub struct ExtractionPipeline<R> {
    recognizer: R,
    config: ScanConfig,
    progress: watch::Sender<ScanProgress>,
    cancel: CancelHandle,
}

impl<R: TextRecognizer> ExtractionPipeline<R> {
    pub fn new(recognizer: R, config: ScanConfig) -> Self {
        let (progress, _) = watch::channel(ScanProgress::default());
        Self {
            recognizer,
            config,
            progress,
            cancel: CancelHandle::default(),
        }
    }

    /// Receive `(processed, total)` after every group.
    pub fn subscribe(&self) -> watch::Receiver<ScanProgress> {
        self.progress.subscribe()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Process `groups` (already in reading order) against `image`.
    #[instrument(skip_all, fields(groups = groups.len()))]
    pub async fn run(&self, image: &DynamicImage, groups: &[BookRegionGroup]) -> ExtractionReport {
        let total = groups.len();
        let mut report = ExtractionReport {
            total,
            ..Default::default()
        };
        self.progress.send_replace(ScanProgress {
            processed: 0,
            total,
        });

        for (index, group) in groups.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(processed = index, total, "extraction cancelled");
                report.cancelled = true;
                break;
            }

            let outcome = self.process_group(image, index, group).await;
            if let ProcessingOutcome::Success(book) = &outcome {
                report.books.push(book.clone());
            }
            report.outcomes.push(outcome);

            self.progress.send_replace(ScanProgress {
                processed: index + 1,
                total,
            });
        }

        info!(
            books = report.books.len(),
            failures = report.failures().count(),
            cancelled = report.cancelled,
            "extraction pass complete"
        );
        report
    }

    #[instrument(skip_all, fields(index = index))]
    async fn process_group(
        &self,
        image: &DynamicImage,
        index: usize,
        group: &BookRegionGroup,
    ) -> ProcessingOutcome {
        let failed = |reason: FailureReason| {
            warn!(index, %reason, "region failed");
            ProcessingOutcome::Failed(Failure { index, reason })
        };

        let rect = &group.combined_bounding_box;
        if !is_valid(rect) {
            return failed(FailureReason::InvalidRegion);
        }

        let confidence = group.best_confidence();
        if confidence < self.config.min_region_confidence {
            debug!(index, confidence, "region skipped, low detector confidence");
            return ProcessingOutcome::Skipped(SkipReason::LowConfidence { confidence });
        }

        let Some(crop_rect) = to_pixel_crop(rect, image.width(), image.height()) else {
            return failed(FailureReason::CropOutOfBounds);
        };
        let crop = match crop_image(image, crop_rect) {
            Ok(crop) => crop,
            Err(_) => return failed(FailureReason::CropOutOfBounds),
        };

        let lines = match self.recognizer.recognize_text(&crop).await {
            Ok(lines) => lines,
            Err(err) => return failed(FailureReason::RecognitionError(err.to_string())),
        };
        debug!(index, lines = lines.len(), "region recognised");

        match book_from_region(&lines, &self.config) {
            Ok(book) => {
                debug!(index, title = %book.title, "region yielded a book");
                ProcessingOutcome::Success(book)
            }
            Err(reason) => failed(reason),
        }
    }
}
