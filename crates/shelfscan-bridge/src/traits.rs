// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic collaborator traits.
//
// Both collaborators are awaited one call at a time by the pipeline; they must
// be `Send + Sync` so a scanner can be shared across tasks.

use async_trait::async_trait;
use image::DynamicImage;
use shelfscan_core::error::Result;
use shelfscan_core::{RegionProposal, TextLine};

/// Finds candidate book-spine rectangles in a shelf photo.
#[async_trait]
pub trait RegionDetector: Send + Sync {
    /// Proposals in normalized, bottom-left-origin coordinates.
    ///
    /// An error (typically `ShelfscanError::Detector` or
    /// `ShelfscanError::PlatformUnavailable`) sends the caller down the
    /// whole-image path.
    async fn detect_regions(&self, image: &DynamicImage) -> Result<Vec<RegionProposal>>;
}

/// Recognises lines of text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognise the text of one cropped spine. Positions may be omitted.
    async fn recognize_text(&self, image: &DynamicImage) -> Result<Vec<TextLine>>;

    /// Recognise every line of a whole image, with `position` populated in
    /// normalized bottom-left-origin coordinates.
    async fn recognize_text_with_layout(&self, image: &DynamicImage) -> Result<Vec<TextLine>>;
}

#[async_trait]
impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    async fn recognize_text(&self, image: &DynamicImage) -> Result<Vec<TextLine>> {
        (**self).recognize_text(image).await
    }

    async fn recognize_text_with_layout(&self, image: &DynamicImage) -> Result<Vec<TextLine>> {
        (**self).recognize_text_with_layout(image).await
    }
}
