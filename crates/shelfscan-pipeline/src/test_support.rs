// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted collaborators for pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use image::DynamicImage;
use shelfscan_bridge::TextRecognizer;
use shelfscan_core::error::{Result, ShelfscanError};
use shelfscan_core::{NormalizedRect, TextLine};

use crate::extraction::CancelHandle;

/// Replays one scripted response per crop, in call order.
#[derive(Default)]
pub struct ScriptedRecognizer {
    crops: Mutex<VecDeque<std::result::Result<Vec<&'static str>, &'static str>>>,
    layout: Vec<TextLine>,
    calls: Mutex<usize>,
    /// Cancel this handle once the given number of crops has been read.
    cancel_after: Option<(usize, CancelHandle)>,
}

impl ScriptedRecognizer {
    pub fn new(crops: Vec<std::result::Result<Vec<&'static str>, &'static str>>) -> Self {
        Self {
            crops: Mutex::new(crops.into()),
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: Vec<TextLine>) -> Self {
        self.layout = layout;
        self
    }

    pub fn cancel_after(mut self, calls: usize, handle: CancelHandle) -> Self {
        self.cancel_after = Some((calls, handle));
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    async fn recognize_text(&self, _image: &DynamicImage) -> Result<Vec<TextLine>> {
        let calls = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if let Some((after, handle)) = &self.cancel_after {
            if calls >= *after {
                handle.cancel();
            }
        }

        let next = self.crops.lock().unwrap().pop_front();
        match next {
            Some(Ok(texts)) => Ok(texts.into_iter().map(|t| TextLine::new(t, 0.9)).collect()),
            Some(Err(cause)) => Err(ShelfscanError::Recognition(cause.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn recognize_text_with_layout(&self, _image: &DynamicImage) -> Result<Vec<TextLine>> {
        Ok(self.layout.clone())
    }
}

/// A blank shelf photo large enough for any test region.
pub fn shelf_photo() -> DynamicImage {
    DynamicImage::new_rgb8(1000, 500)
}

/// Two books side by side, as whole-image recognition would report them.
pub fn two_cluster_layout() -> Vec<TextLine> {
    let at = |text: &str, min_x: f32, min_y: f32, max_x: f32, max_y: f32| {
        TextLine::new(text, 0.9).with_position(NormalizedRect::new(min_x, min_y, max_x, max_y))
    };
    vec![
        at("THE SECOND MOUNTAIN", 0.05, 0.80, 0.30, 0.86),
        at("DAVID BROOKS", 0.08, 0.70, 0.25, 0.75),
        at("HIS TRUTH IS MARCHING ON", 0.60, 0.80, 0.90, 0.86),
        at("JON MEACHAM", 0.62, 0.70, 0.80, 0.75),
    ]
}
