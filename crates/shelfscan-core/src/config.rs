// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration.
//
// Every threshold used by the grouper, the pipeline and the fallback segmenter
// lives here and is handed to constructors explicitly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, ShelfscanError};

/// Tunable thresholds for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Proposals whose overlap ratio with a group seed exceeds this join the group.
    pub grouping_overlap_threshold: f32,
    /// Proposals whose `min_x` differs from the seed by less than this (and whose
    /// vertical centres are close) are fragments of the same spine.
    pub grouping_horizontal_gap: f32,
    /// Maximum vertical-centre difference for the horizontal-gap merge rule.
    pub grouping_vertical_center: f32,
    /// Groups whose vertical centres differ by at most this are on the same row.
    pub reading_order_row_tolerance: f32,
    /// Whole-image mode: a horizontal gap above this starts a new book chunk.
    pub fallback_horizontal_gap: f32,
    /// Whole-image mode: a vertical-centre jump above this starts a new chunk.
    pub fallback_vertical_center: f32,
    /// Region groups whose best proposal scores below this are skipped.
    pub min_region_confidence: f32,
    /// Recognised lines scoring below this are discarded before segmentation.
    pub min_line_confidence: f32,
    /// A title must be strictly longer than this many characters.
    pub min_title_chars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            grouping_overlap_threshold: 0.3,
            grouping_horizontal_gap: 0.02,
            grouping_vertical_center: 0.1,
            reading_order_row_tolerance: 0.05,
            fallback_horizontal_gap: 0.05,
            fallback_vertical_center: 0.15,
            min_region_confidence: 0.1,
            min_line_confidence: 0.3,
            min_title_chars: 2,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(?config, "scan configuration loaded");
        Ok(config)
    }

    /// Check that every ratio is finite and inside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("grouping_overlap_threshold", self.grouping_overlap_threshold),
            ("grouping_horizontal_gap", self.grouping_horizontal_gap),
            ("grouping_vertical_center", self.grouping_vertical_center),
            ("reading_order_row_tolerance", self.reading_order_row_tolerance),
            ("fallback_horizontal_gap", self.fallback_horizontal_gap),
            ("fallback_vertical_center", self.fallback_vertical_center),
            ("min_region_confidence", self.min_region_confidence),
            ("min_line_confidence", self.min_line_confidence),
        ];
        for (name, value) in ratios {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ShelfscanError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let config = ScanConfig {
            fallback_horizontal_gap: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fallback_horizontal_gap"));
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let config = ScanConfig {
            min_line_confidence: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scan.json");
        std::fs::write(&path, r#"{ "min_line_confidence": 0.5 }"#).expect("write config");

        let config = ScanConfig::from_json_file(&path).expect("load config");
        assert_eq!(config.min_line_confidence, 0.5);
        assert_eq!(config.grouping_overlap_threshold, 0.3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ScanConfig::from_json_file("/nonexistent/shelfscan.json").unwrap_err();
        assert!(matches!(err, ShelfscanError::Io(_)));
    }
}
