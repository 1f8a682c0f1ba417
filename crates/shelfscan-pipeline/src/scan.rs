// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan entry points.
//
// `segment_books` and `segment_books_from_full_image` are the two strategies;
// `ShelfScanner` chooses between them: regions first, whole image when the
// detector has nothing to offer or every region failed.

use chrono::Utc;
use image::DynamicImage;
use shelfscan_bridge::{RegionDetector, TextRecognizer};
use shelfscan_core::error::Result;
use shelfscan_core::{
    BookCandidate, Failure, RegionProposal, ScanConfig, ScanId, ScanProgress, ScanReport,
    ScanStrategy,
};
use shelfscan_segment::{group_regions, segment_full_image};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::extraction::{CancelHandle, ExtractionPipeline};

/// Books and per-region failures from one region-based pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentedBooks {
    pub books: Vec<BookCandidate>,
    pub failures: Vec<Failure>,
}

/// Group `regions`, then read each spine in isolation.
pub async fn segment_books<R: TextRecognizer + ?Sized>(
    image: &DynamicImage,
    regions: &[RegionProposal],
    recognizer: &R,
    config: &ScanConfig,
) -> SegmentedBooks {
    let groups = group_regions(regions, config);
    let pipeline = ExtractionPipeline::new(recognizer, config.clone());
    let report = pipeline.run(image, &groups).await;
    SegmentedBooks {
        failures: report.failures().cloned().collect(),
        books: report.books,
    }
}

/// Recognise the whole image and split its lines into books by layout.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub async fn segment_books_from_full_image<R: TextRecognizer + ?Sized>(
    image: &DynamicImage,
    recognizer: &R,
    config: &ScanConfig,
) -> Result<Vec<BookCandidate>> {
    let lines = recognizer.recognize_text_with_layout(image).await?;
    let books = segment_full_image(&lines, config);
    info!(lines = lines.len(), books = books.len(), "whole-image segmentation complete");
    Ok(books)
}

/// Detector + recognizer + configuration, with the fallback policy between
/// the two strategies.
pub struct ShelfScanner<D, R> {
    detector: D,
    pipeline: ExtractionPipeline<R>,
}

impl<D: RegionDetector, R: TextRecognizer> ShelfScanner<D, R> {
    pub fn new(detector: D, recognizer: R, config: ScanConfig) -> Self {
        Self {
            detector,
            pipeline: ExtractionPipeline::new(recognizer, config),
        }
    }

    /// Per-region progress of the current scan.
    pub fn subscribe(&self) -> watch::Receiver<ScanProgress> {
        self.pipeline.subscribe()
    }

    /// Stops the scan in progress or, when idle, the next one. The request
    /// is cleared once that scan returns.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.pipeline.cancel_handle()
    }

    /// Scan one shelf photo.
    ///
    /// Only a failure of whole-image recognition is an error; detector and
    /// per-region problems are recovered or recorded in the report.
    pub async fn scan(&self, image: &DynamicImage) -> Result<ScanReport> {
        let scan_id = ScanId::new();
        let report = self.scan_with_id(scan_id, image).await;
        self.pipeline.cancel_handle().reset();
        report
    }

    #[instrument(skip(self, image), fields(%scan_id))]
    async fn scan_with_id(&self, scan_id: ScanId, image: &DynamicImage) -> Result<ScanReport> {
        let started_at = Utc::now();
        let config = self.pipeline.config();

        let proposals = match self.detector.detect_regions(image).await {
            Ok(proposals) => proposals,
            Err(err) => {
                warn!(error = %err, "region detection failed, reading the whole image");
                Vec::new()
            }
        };

        let mut outcomes = Vec::new();
        if !proposals.is_empty() {
            let groups = group_regions(&proposals, config);
            let report = self.pipeline.run(image, &groups).await;

            if report.cancelled || !report.isolation_yielded_nothing() {
                return Ok(ScanReport {
                    scan_id,
                    strategy: ScanStrategy::Regions,
                    books: report.books,
                    outcomes: report.outcomes,
                    cancelled: report.cancelled,
                    started_at,
                    finished_at: Utc::now(),
                });
            }
            warn!(groups = report.total, "no region produced a book, reading the whole image");
            outcomes = report.outcomes;
        } else {
            info!("no region proposals, reading the whole image");
        }

        if self.pipeline.cancel_handle().is_cancelled() {
            info!("scan cancelled before whole-image recognition");
            return Ok(ScanReport {
                scan_id,
                strategy: ScanStrategy::FullImage,
                books: Vec::new(),
                outcomes,
                cancelled: true,
                started_at,
                finished_at: Utc::now(),
            });
        }

        let books = segment_books_from_full_image(image, self.pipeline.recognizer(), config).await?;
        Ok(ScanReport {
            scan_id,
            strategy: ScanStrategy::FullImage,
            books,
            outcomes,
            cancelled: false,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
