// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// shelfscan-document: image handling for the Shelfscan pipeline.
//
// Provides the shelf photo wrapper (decode, orientation, bounds-checked spine
// crops) and, behind the `ocr` feature, a local text recognizer built on the
// pure-Rust `ocrs` engine.

pub mod image;
pub mod scan;

pub use image::processor::ShelfImage;

#[cfg(feature = "ocr")]
pub use scan::ocr::{OcrConfig, OcrsRecognizer};
