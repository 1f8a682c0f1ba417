// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local text recognizer for Shelfscan.
//
// Reads spine text with the `ocrs` crate, a pure-Rust OCR engine backed by
// neural network models executed via `rten`.
//
// # Feature Gate
//
// This module is only available when the `ocr` feature is enabled:
//
// ```toml
// shelfscan-document = { path = "crates/shelfscan-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine requires two model files:
//
// - **Detection model** (`text-detection.rten`) locates text regions in the image.
// - **Recognition model** (`text-recognition.rten`) decodes characters from detected regions.
//
// Running the `ocrs-cli` tool once downloads both:
//   ```sh
//   cargo install ocrs-cli
//   ocrs some-image.png  # downloads models to ~/.cache/ocrs/
//   ```
//
// The default cache directory is `$XDG_CACHE_HOME/ocrs` (typically `~/.cache/ocrs`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams, OcrInput, TextItem};
use rten::Model;
use shelfscan_bridge::TextRecognizer;
use shelfscan_core::error::{Result, ShelfscanError};
use shelfscan_core::geometry::from_pixel_bounds;
use shelfscan_core::TextLine;
use tracing::{debug, info, instrument};

/// `ocrs` reports no per-line score; every recognised line gets this one.
const OCRS_LINE_CONFIDENCE: f32 = 1.0;

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Where to find the model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(ShelfscanError::OcrModel(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// [`TextRecognizer`] backed by a local `ocrs` engine.
///
/// Model loading is the expensive step; build one recognizer and reuse it.
/// Inference runs on the blocking thread pool so the async runtime stays
/// responsive.
///
/// **Important:** `ocrs` and `rten` must be compiled in release mode. Debug
/// builds are 10-100x slower.
#[derive(Clone)]
pub struct OcrsRecognizer {
    engine: Arc<OcrsEngine>,
}

impl OcrsRecognizer {
    /// Load both models named by `config`.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading OCR detection model");
        let detection_model = load_model(&config.detection_model_path)?;
        info!("Loading OCR recognition model");
        let recognition_model = load_model(&config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| ShelfscanError::OcrModel(format!("failed to initialise OCR engine: {}", err)))?;

        info!("OCR engine initialised");
        Ok(Self {
            engine: Arc::new(engine),
        })
    }

    /// Load models from the default cache directory.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OcrConfig::default())
    }

    /// Load models from `dir`.
    pub fn from_model_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(OcrConfig::from_dir(dir))
    }
}

fn load_model(path: &Path) -> Result<Model> {
    Model::load_file(path).map_err(|err| {
        ShelfscanError::OcrModel(format!("failed to load model from {}: {}", path.display(), err))
    })
}

fn prepare(engine: &OcrsEngine, rgb: &RgbImage) -> Result<OcrInput> {
    let (width, height) = rgb.dimensions();
    let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
        ShelfscanError::Recognition(format!(
            "failed to create image source ({}x{}): {}",
            width, height, err
        ))
    })?;
    engine
        .prepare_input(source)
        .map_err(|err| ShelfscanError::Recognition(format!("OCR preprocessing failed: {}", err)))
}

/// Plain text of one spine crop, one `TextLine` per recognised line.
fn read_lines(engine: &OcrsEngine, rgb: &RgbImage) -> Result<Vec<TextLine>> {
    let input = prepare(engine, rgb)?;
    let text = engine
        .get_text(&input)
        .map_err(|err| ShelfscanError::Recognition(format!("OCR text recognition failed: {}", err)))?;

    let lines: Vec<TextLine> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| TextLine::new(l, OCRS_LINE_CONFIDENCE))
        .collect();
    debug!(line_count = lines.len(), "Crop recognised");
    Ok(lines)
}

/// Every line of a whole image with its normalized, bottom-left-origin position.
fn read_lines_with_layout(engine: &OcrsEngine, rgb: &RgbImage) -> Result<Vec<TextLine>> {
    let (width, height) = rgb.dimensions();
    let input = prepare(engine, rgb)?;

    let word_rects = engine
        .detect_words(&input)
        .map_err(|err| ShelfscanError::Recognition(format!("word detection failed: {}", err)))?;
    debug!(word_count = word_rects.len(), "Words detected");

    let line_rects = engine.find_text_lines(&input, &word_rects);
    debug!(line_count = line_rects.len(), "Text lines found");

    let line_texts = engine
        .recognize_text(&input, &line_rects)
        .map_err(|err| ShelfscanError::Recognition(format!("line recognition failed: {}", err)))?;

    let mut results = Vec::with_capacity(line_texts.len());
    for line in line_texts.iter().flatten() {
        let text = line.to_string();
        if text.trim().is_empty() {
            continue;
        }
        let rect = line.bounding_rect();
        let position = from_pixel_bounds(
            rect.left() as f32,
            rect.top() as f32,
            rect.right() as f32,
            rect.bottom() as f32,
            width,
            height,
        );
        results.push(TextLine::new(text, OCRS_LINE_CONFIDENCE).with_position(position));
    }

    info!(recognized_lines = results.len(), "Layout-aware OCR complete");
    Ok(results)
}

#[async_trait]
impl TextRecognizer for OcrsRecognizer {
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    async fn recognize_text(&self, image: &DynamicImage) -> Result<Vec<TextLine>> {
        let engine = Arc::clone(&self.engine);
        let rgb = image.to_rgb8();
        tokio::task::spawn_blocking(move || read_lines(&engine, &rgb))
            .await
            .map_err(|err| ShelfscanError::Recognition(format!("OCR task failed: {}", err)))?
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    async fn recognize_text_with_layout(&self, image: &DynamicImage) -> Result<Vec<TextLine>> {
        let engine = Arc::clone(&self.engine);
        let rgb = image.to_rgb8();
        tokio::task::spawn_blocking(move || read_lines_with_layout(&engine, &rgb))
            .await
            .map_err(|err| ShelfscanError::Recognition(format!("OCR task failed: {}", err)))?
    }
}
