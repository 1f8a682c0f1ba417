// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shelfscan collaborator interfaces.
//
// The segmentation engine never talks to a detector or an OCR engine
// directly. Platform code (Vision on iOS, ML Kit on Android, `ocrs` on the
// desktop) plugs in through the traits defined here.

pub mod stub;
pub mod traits;

pub use stub::{FixedRegionDetector, NoRegionDetector};
pub use traits::{RegionDetector, TextRecognizer};
