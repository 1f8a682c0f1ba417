// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use shelfscan_core::error::{Result, ShelfscanError};
use shelfscan_core::{FailureReason, RegionProposal, ScanConfig, TextLine};
use shelfscan_document::ShelfImage;
use shelfscan_segment::{book_from_region, segment_full_image};
use tracing::{info, instrument};

/// Arguments of `shelfscan scan`.
pub struct ScanOptions {
    pub image: PathBuf,
    pub regions: Option<PathBuf>,
    pub models: Option<PathBuf>,
    pub rotate: i32,
}

/// `shelfscan segment`: whole-image lines to books.
pub fn segment(path: &Path, config: &ScanConfig, pretty: bool) -> Result<()> {
    let lines: Vec<TextLine> = read_json(path)?;
    let books = segment_full_image(&lines, config);
    info!(books = books.len(), "segmented whole-image lines");
    print_json(&books, pretty)
}

/// `shelfscan blocks`: one spine's lines to its book.
pub fn blocks(path: &Path, config: &ScanConfig, pretty: bool) -> Result<()> {
    let lines: Vec<TextLine> = read_json(path)?;
    let book = book_from_region(&lines, config).map_err(|reason| match reason {
        FailureReason::NoText => ShelfscanError::NoText,
        FailureReason::TextTooShort => ShelfscanError::TextTooShort,
        other => ShelfscanError::Recognition(other.to_string()),
    })?;
    print_json(&book, pretty)
}

/// `shelfscan scan`: photo to scan report.
pub async fn scan(options: ScanOptions, config: ScanConfig, pretty: bool) -> Result<()> {
    let shelf = ShelfImage::open(&options.image)?.rotate(options.rotate)?;
    let proposals = options
        .regions
        .as_deref()
        .map(read_json::<Vec<RegionProposal>>)
        .transpose()?;
    ocr::scan_with_engine(&shelf, proposals, options.models, config, pretty).await
}

#[cfg(not(feature = "ocr"))]
mod ocr {
    use std::path::PathBuf;

    use shelfscan_core::error::{Result, ShelfscanError};
    use shelfscan_core::{RegionProposal, ScanConfig};
    use shelfscan_document::ShelfImage;

    pub async fn scan_with_engine(
        _shelf: &ShelfImage,
        _proposals: Option<Vec<RegionProposal>>,
        _models: Option<PathBuf>,
        _config: ScanConfig,
        _pretty: bool,
    ) -> Result<()> {
        Err(ShelfscanError::OcrModel(
            "this build has no local OCR engine; rebuild with `--features ocr`".into(),
        ))
    }
}

#[cfg(feature = "ocr")]
mod ocr {
    use std::path::PathBuf;

    use shelfscan_bridge::{FixedRegionDetector, NoRegionDetector, RegionDetector};
    use shelfscan_core::error::Result;
    use shelfscan_core::human_errors::summarize_failures;
    use shelfscan_core::{Failure, RegionProposal, ScanConfig};
    use shelfscan_document::{OcrsRecognizer, ShelfImage};
    use shelfscan_pipeline::ShelfScanner;
    use tracing::{info, warn};

    use super::print_json;

    pub async fn scan_with_engine(
        shelf: &ShelfImage,
        proposals: Option<Vec<RegionProposal>>,
        models: Option<PathBuf>,
        config: ScanConfig,
        pretty: bool,
    ) -> Result<()> {
        match proposals {
            Some(proposals) => {
                run(FixedRegionDetector::new(proposals), shelf, models, config, pretty).await
            }
            None => run(NoRegionDetector, shelf, models, config, pretty).await,
        }
    }

    async fn run<D: RegionDetector>(
        detector: D,
        shelf: &ShelfImage,
        models: Option<PathBuf>,
        config: ScanConfig,
        pretty: bool,
    ) -> Result<()> {
        let recognizer = match models {
            Some(dir) => OcrsRecognizer::from_model_dir(dir)?,
            None => OcrsRecognizer::with_defaults()?,
        };
        let scanner = ShelfScanner::new(detector, recognizer, config);

        let cancel = scanner.cancel_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, stopping after the current spine");
                cancel.cancel();
            }
        });

        let mut progress = scanner.subscribe();
        let watcher = tokio::spawn(async move {
            while progress.changed().await.is_ok() {
                let p = *progress.borrow_and_update();
                info!(processed = p.processed, total = p.total, "scan progress");
            }
        });

        let report = scanner.scan(shelf.as_dynamic()).await;
        // Closing the progress channel ends the watcher.
        drop(scanner);
        let _ = watcher.await;
        let report = report?;

        let failures: Vec<Failure> = report.failures().cloned().collect();
        if let Some(human) = summarize_failures(&failures) {
            eprintln!("{} {}", human.message, human.suggestion);
        }
        info!(
            scan_id = %report.scan_id,
            strategy = ?report.strategy,
            books = report.books.len(),
            "scan finished"
        );
        print_json(&report, pretty)
    }
}

#[instrument(skip_all, fields(path = %path.display()))]
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
