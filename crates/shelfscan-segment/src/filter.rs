// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Noise filter applied to recogniser output before segmentation.

use shelfscan_core::{ScanConfig, TextLine};
use tracing::debug;

/// Substrings that mark a line as a URL rather than spine text.
const URL_MARKERS: &[&str] = &["www.", "http", ".com"];

/// Drop low-confidence and noise lines. Surviving lines are trimmed and keep
/// their positions and relative order.
pub fn clean_lines(lines: &[TextLine], config: &ScanConfig) -> Vec<TextLine> {
    let kept: Vec<TextLine> = lines
        .iter()
        // NaN compares false and is dropped here.
        .filter(|line| line.confidence >= config.min_line_confidence)
        .filter(|line| !is_noise(&line.text))
        .map(|line| TextLine {
            text: line.text.trim().to_string(),
            ..line.clone()
        })
        .collect();

    if kept.len() != lines.len() {
        debug!(
            dropped = lines.len() - kept.len(),
            kept = kept.len(),
            "filtered recogniser noise"
        );
    }
    kept
}

/// Lines that never carry title, author or publisher text: anything without a
/// letter, single characters, ISBN/barcode captions and URLs.
pub fn is_noise(text: &str) -> bool {
    let text = text.trim();
    if text.chars().count() < 2 || !text.chars().any(char::is_alphabetic) {
        return true;
    }
    let lower = text.to_lowercase();
    lower.starts_with("isbn") || URL_MARKERS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfscan_core::NormalizedRect;

    #[test]
    fn noise_lines() {
        assert!(is_noise("9780593235980"));
        assert!(is_noise("--- ... ---"));
        assert!(is_noise("X"));
        assert!(is_noise("ISBN 978-0-593-23598-0"));
        assert!(is_noise("www.penguinrandomhouse.com"));
        assert!(!is_noise("RANDOM HOUSE"));
        assert!(!is_noise("1984 Orwell"));
    }

    #[test]
    fn low_confidence_lines_are_dropped() {
        let config = ScanConfig::default();
        let lines = vec![
            TextLine::new("KEEP ME", 0.9),
            TextLine::new("DROP ME", 0.1),
            TextLine::new("NOT A NUMBER", f32::NAN),
            TextLine::new("EXACTLY AT THE LIMIT", config.min_line_confidence),
        ];
        let kept: Vec<String> = clean_lines(&lines, &config)
            .into_iter()
            .map(|l| l.text)
            .collect();
        assert_eq!(kept, vec!["KEEP ME", "EXACTLY AT THE LIMIT"]);
    }

    #[test]
    fn positions_survive_filtering() {
        let rect = NormalizedRect::new(0.1, 0.2, 0.3, 0.4);
        let lines = vec![
            TextLine::new("12", 0.9),
            TextLine::new("DUNE", 0.9).with_position(rect),
        ];
        let kept = clean_lines(&lines, &ScanConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].position, Some(rect));
    }
}
