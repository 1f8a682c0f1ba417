// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the scan screen.
//
// Every technical error is mapped to plain English with a clear suggestion,
// and per-book failures are folded into one "retake the photo" message that
// names the books by their position on the shelf.

use crate::error::ShelfscanError;
use crate::types::{Failure, FailureReason};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth trying again as-is (a recogniser hiccup).
    Transient,
    /// The user should do something (retake the photo, move closer).
    ActionRequired,
    /// Retrying will not help on this device or with this input.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same photo could succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ShelfscanError` into a `HumanError`.
pub fn humanize_error(err: &ShelfscanError) -> HumanError {
    match err {
        ShelfscanError::InvalidRegion(_) | ShelfscanError::CropOutOfBounds { .. } => HumanError {
            message: "We couldn't line up one of the book spines.".into(),
            suggestion: "Hold the camera straight on to the shelf and make sure every spine is fully in the frame.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ShelfscanError::Detector(_) => HumanError {
            message: "We couldn't pick out individual books.".into(),
            suggestion: "We'll read the whole photo instead. Results may be less accurate.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ShelfscanError::Recognition(_) => HumanError {
            message: "Text recognition didn't work on this photo.".into(),
            suggestion: "Try again. If it keeps happening, retake the photo with better lighting.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ShelfscanError::OcrModel(detail) => HumanError {
            message: "The text recognition models aren't available.".into(),
            suggestion: format!("Download the OCR models and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ShelfscanError::NoText => HumanError {
            message: "We couldn't find any writing in this photo.".into(),
            suggestion: "Move closer so the spine text fills more of the picture, and make sure it's in focus.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ShelfscanError::TextTooShort => HumanError {
            message: "The writing we found was too short to be a title.".into(),
            suggestion: "Retake the photo a little closer to the books.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ShelfscanError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ShelfscanError::Config(detail) => HumanError {
            message: "The scan settings aren't valid.".into(),
            suggestion: format!("Check the configuration file. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ShelfscanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the photo again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        ShelfscanError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ShelfscanError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Some features require a specific type of phone or tablet.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// Fold per-book failures into one message, or `None` when nothing failed.
///
/// Books are numbered from 1 in reading order: "Books 3 and 7 couldn't be read."
pub fn summarize_failures(failures: &[Failure]) -> Option<HumanError> {
    if failures.is_empty() {
        return None;
    }

    let mut numbers: Vec<usize> = failures.iter().map(Failure::book_number).collect();
    numbers.sort_unstable();
    numbers.dedup();

    let message = if numbers.len() == 1 {
        format!("Book {} couldn't be read.", numbers[0])
    } else {
        format!("Books {} couldn't be read.", join_numbers(&numbers))
    };

    // A recogniser hiccup is worth retrying; everything else needs a new photo.
    let only_transient = failures
        .iter()
        .all(|f| matches!(f.reason, FailureReason::RecognitionError(_)));

    let (suggestion, retriable, severity) = if only_transient {
        (
            "Try scanning again. If the same books fail, retake the photo.".to_string(),
            true,
            Severity::Transient,
        )
    } else {
        (
            "Retake the photo with those spines straight, well lit and fully in the frame.".to_string(),
            false,
            Severity::ActionRequired,
        )
    };

    Some(HumanError {
        message,
        suggestion,
        retriable,
        severity,
    })
}

/// "3", "3 and 7", "3, 5 and 7".
fn join_numbers(numbers: &[usize]) -> String {
    match numbers {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(usize::to_string).collect();
            format!("{} and {}", head.join(", "), last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(index: usize, reason: FailureReason) -> Failure {
        Failure { index, reason }
    }

    #[test]
    fn no_failures_no_message() {
        assert!(summarize_failures(&[]).is_none());
    }

    #[test]
    fn single_failure_names_book() {
        let human = summarize_failures(&[failure(0, FailureReason::NoText)]).expect("message");
        assert_eq!(human.message, "Book 1 couldn't be read.");
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn several_failures_are_listed_in_order() {
        let human = summarize_failures(&[
            failure(6, FailureReason::TextTooShort),
            failure(2, FailureReason::InvalidRegion),
            failure(4, FailureReason::NoText),
        ])
        .expect("message");
        assert_eq!(human.message, "Books 3, 5 and 7 couldn't be read.");
    }

    #[test]
    fn recogniser_errors_are_retriable() {
        let human = summarize_failures(&[
            failure(2, FailureReason::RecognitionError("timeout".into())),
            failure(6, FailureReason::RecognitionError("timeout".into())),
        ])
        .expect("message");
        assert_eq!(human.message, "Books 3 and 7 couldn't be read.");
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn detector_error_is_transient() {
        let human = humanize_error(&ShelfscanError::Detector("model busy".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn platform_unavailable_is_permanent() {
        let human = humanize_error(&ShelfscanError::PlatformUnavailable);
        assert_eq!(human.severity, Severity::Permanent);
    }
}
