// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry on normalized rectangles: overlap, union, validity, and conversion
// from detector space (normalized, bottom-left origin) to raster crop space
// (pixels, top-left origin).

use crate::types::{NormalizedRect, PixelRect};

/// Intersection area divided by union area.
///
/// Returns `0.0` for disjoint, degenerate or non-finite input; never NaN.
pub fn overlap_ratio(a: &NormalizedRect, b: &NormalizedRect) -> f32 {
    let inter_w = a.max_x.min(b.max_x) - a.min_x.max(b.min_x);
    let inter_h = a.max_y.min(b.max_y) - a.min_y.max(b.min_y);
    if !(inter_w > 0.0 && inter_h > 0.0) {
        return 0.0;
    }

    let intersection = inter_w * inter_h;
    let union_area = a.area() + b.area() - intersection;
    if !(union_area > 0.0) {
        return 0.0;
    }

    let ratio = intersection / union_area;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Smallest rectangle containing both `a` and `b`.
pub fn union(a: &NormalizedRect, b: &NormalizedRect) -> NormalizedRect {
    NormalizedRect {
        min_x: a.min_x.min(b.min_x),
        min_y: a.min_y.min(b.min_y),
        max_x: a.max_x.max(b.max_x),
        max_y: a.max_y.max(b.max_y),
    }
}

/// Whether `r` is a usable region: finite, inside `[0, 1]`, not inverted, and
/// with non-zero area.
pub fn is_valid(r: &NormalizedRect) -> bool {
    let coords = [r.min_x, r.min_y, r.max_x, r.max_y];
    if coords.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 1.0) {
        return false;
    }
    r.min_x < r.max_x && r.min_y < r.max_y
}

/// Convert a normalized rect into a pixel crop for an image of the given size.
///
/// The Y axis is flipped (`y = (1 - max_y) * height`). Edges are rounded
/// independently; if the rounded rect is empty or leaves the image the
/// function returns `None` instead of clamping, since clamping would shift
/// the crop and distort its aspect ratio.
pub fn to_pixel_crop(r: &NormalizedRect, image_width: u32, image_height: u32) -> Option<PixelRect> {
    if !is_valid(r) || image_width == 0 || image_height == 0 {
        return None;
    }

    let w = f64::from(image_width);
    let h = f64::from(image_height);

    let left = (f64::from(r.min_x) * w).round();
    let right = (f64::from(r.max_x) * w).round();
    let top = ((1.0 - f64::from(r.max_y)) * h).round();
    let bottom = ((1.0 - f64::from(r.min_y)) * h).round();

    if left < 0.0 || top < 0.0 || right > w || bottom > h {
        return None;
    }
    if right <= left || bottom <= top {
        return None;
    }

    Some(PixelRect {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

/// Convert pixel bounds (top-left origin) into a normalized bottom-left-origin
/// rect, clamped to `[0, 1]`. The inverse of [`to_pixel_crop`] up to rounding.
pub fn from_pixel_bounds(
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    image_width: u32,
    image_height: u32,
) -> NormalizedRect {
    let w = image_width.max(1) as f32;
    let h = image_height.max(1) as f32;
    let unit = |v: f32| v.clamp(0.0, 1.0);
    NormalizedRect {
        min_x: unit(left / w),
        min_y: unit(1.0 - bottom / h),
        max_x: unit(right / w),
        max_y: unit(1.0 - top / h),
    }
}
