// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shelf photo wrapper: decode, orientation correction, and bounds-checked
// spine crops. Operates on in-memory images using the `image` crate.

use image::{DynamicImage, ImageFormat};
use shelfscan_core::PixelRect;
use shelfscan_core::error::{Result, ShelfscanError};
use tracing::{debug, info, instrument};

/// A decoded shelf photo.
///
/// Orientation methods consume `self` and return a new `ShelfImage`, so calls
/// chain:
///
/// ```ignore
/// let shelf = ShelfImage::open("shelf.jpg")?.rotate(90)?;
/// let spine = shelf.crop(crop_rect)?;
/// ```
pub struct ShelfImage {
    image: DynamicImage,
}

impl ShelfImage {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ShelfscanError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Shelf photo loaded");
        Ok(Self { image: img })
    }

    /// Decode a photo from encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| ShelfscanError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(width = img.width(), height = img.height(), "Shelf photo decoded from bytes");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Orientation ------------------------------------------------------------

    /// Rotate clockwise by a multiple of 90 degrees (lossless).
    ///
    /// Spines are usually photographed with the camera turned; a quarter turn
    /// brings vertical spine text upright for the recognizer.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate(self, degrees: i32) -> Result<Self> {
        let image = match degrees.rem_euclid(360) {
            0 => self.image,
            90 => self.image.rotate90(),
            180 => self.image.rotate180(),
            270 => self.image.rotate270(),
            _ => {
                return Err(ShelfscanError::ImageError(format!(
                    "rotation must be a multiple of 90 degrees, got {degrees}"
                )));
            }
        };
        debug!(width = image.width(), height = image.height(), "Rotation applied");
        Ok(Self { image })
    }

    // -- Crops ----------------------------------------------------------------

    /// Copy out the pixels under `rect`. Fails instead of clamping when the
    /// rect leaves the image.
    pub fn crop(&self, rect: PixelRect) -> Result<DynamicImage> {
        crop_image(&self.image, rect)
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| ShelfscanError::ImageError(format!("image encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

/// Crop `rect` out of `image`.
///
/// A zero-sized rect is an `InvalidRegion`; a rect that extends past the
/// image edge is `CropOutOfBounds`. Nothing is clamped.
#[instrument(skip(image), fields(x = rect.x, y = rect.y, width = rect.width, height = rect.height))]
pub fn crop_image(image: &DynamicImage, rect: PixelRect) -> Result<DynamicImage> {
    if rect.width == 0 || rect.height == 0 {
        return Err(ShelfscanError::InvalidRegion(format!(
            "empty crop {}x{}",
            rect.width, rect.height
        )));
    }

    let (image_width, image_height) = (image.width(), image.height());
    let right = u64::from(rect.x) + u64::from(rect.width);
    let bottom = u64::from(rect.y) + u64::from(rect.height);
    if right > u64::from(image_width) || bottom > u64::from(image_height) {
        return Err(ShelfscanError::CropOutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            image_width,
            image_height,
        });
    }

    debug!("Cropping spine");
    Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
}
