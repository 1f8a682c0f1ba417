// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Shelfscan.

use thiserror::Error;

/// Top-level error type for all Shelfscan operations.
#[derive(Debug, Error)]
pub enum ShelfscanError {
    // -- Region errors --
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("crop {width}x{height} at ({x}, {y}) exceeds image bounds {image_width}x{image_height}")]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    // -- Collaborator errors --
    #[error("region detection failed: {0}")]
    Detector(String),

    #[error("text recognition failed: {0}")]
    Recognition(String),

    #[error("OCR model error: {0}")]
    OcrModel(String),

    // -- Extraction errors --
    #[error("no text recognised")]
    NoText,

    #[error("recognised text too short to form a title")]
    TextTooShort,

    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration / IO --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShelfscanError>;
