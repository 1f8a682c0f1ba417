// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for shelf photo handling: cutting every spine out of a
// synthetic 12-megapixel photo.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, RgbImage};

use shelfscan_core::NormalizedRect;
use shelfscan_core::geometry::to_pixel_crop;
use shelfscan_document::ShelfImage;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Crop 40 spine strips out of a 4000x3000 photo.
///
/// Rects are converted from detector space on every iteration, matching what
/// the extraction pipeline does per region.
fn bench_spine_crops(c: &mut Criterion) {
    let (width, height) = (4000u32, 3000u32);
    let shelf = ShelfImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(width, height)));
    let spines: Vec<NormalizedRect> = (0..40)
        .map(|i| {
            let min_x = i as f32 * 0.025;
            NormalizedRect::new(min_x, 0.05, min_x + 0.02, 0.95)
        })
        .collect();

    c.bench_function("spine_crops (40 x 4000x3000)", |b| {
        b.iter(|| {
            for rect in &spines {
                if let Some(crop) = to_pixel_crop(black_box(rect), width, height) {
                    black_box(shelf.crop(crop).ok());
                }
            }
        });
    });
}

criterion_group!(benches, bench_spine_crops);
criterion_main!(benches);
