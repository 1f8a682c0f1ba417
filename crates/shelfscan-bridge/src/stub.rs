// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stand-in detectors for desktop/CI builds where no native spine detector is
// available.

use async_trait::async_trait;
use image::DynamicImage;
use shelfscan_core::error::{Result, ShelfscanError};
use shelfscan_core::RegionProposal;

use crate::traits::RegionDetector;

/// Detector for platforms without one. Always `PlatformUnavailable`, which
/// sends every scan down the whole-image path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegionDetector;

#[async_trait]
impl RegionDetector for NoRegionDetector {
    async fn detect_regions(&self, _image: &DynamicImage) -> Result<Vec<RegionProposal>> {
        tracing::warn!("RegionDetector::detect_regions called on stub detector");
        Err(ShelfscanError::PlatformUnavailable)
    }
}

/// Detector that returns proposals supplied up front, e.g. loaded from JSON
/// produced by an external detector.
#[derive(Debug, Clone, Default)]
pub struct FixedRegionDetector {
    proposals: Vec<RegionProposal>,
}

impl FixedRegionDetector {
    pub fn new(proposals: Vec<RegionProposal>) -> Self {
        Self { proposals }
    }
}

#[async_trait]
impl RegionDetector for FixedRegionDetector {
    async fn detect_regions(&self, _image: &DynamicImage) -> Result<Vec<RegionProposal>> {
        tracing::debug!(proposals = self.proposals.len(), "returning fixed region proposals");
        Ok(self.proposals.clone())
    }
}
