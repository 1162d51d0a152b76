//! Letterbox preprocessing and its inverse.
//!
//! The model expects a square `[1, 3, S, S]` input. Images are scaled
//! uniformly to fit, centred, and the remaining border is filled with the
//! grey the detector was trained on. [`LetterboxMeta`] keeps what is needed to
//! project boxes back onto the source image.

use std::borrow::Cow;

use image::{imageops::FilterType, RgbImage};
use ndarray::{Array4, ArrayD};

use super::detection::{Candidate, Detection};
use super::errors::{DomainError, DomainResult};

/// Border value used by the training pipeline, per channel.
pub const LETTERBOX_FILL: u8 = 114;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxMeta {
    pub target_size: u32,
    pub scale: f32,
    pub pad_x: u32,
    pub pad_y: u32,
    pub orig_width: u32,
    pub orig_height: u32,
}

impl LetterboxMeta {
    pub fn compute(orig_width: u32, orig_height: u32, target_size: u32) -> DomainResult<Self> {
        if orig_width == 0 || orig_height == 0 {
            return Err(DomainError::InvalidDimension {
                width: orig_width,
                height: orig_height,
            });
        }
        if target_size == 0 {
            return Err(DomainError::InvalidDimension {
                width: target_size,
                height: target_size,
            });
        }

        let size = target_size as f32;
        let scale = (size / orig_width as f32).min(size / orig_height as f32);

        let mut meta = Self {
            target_size,
            scale,
            pad_x: 0,
            pad_y: 0,
            orig_width,
            orig_height,
        };
        let (w, h) = meta.resized_dims();
        // right/bottom take the odd pixel
        meta.pad_x = (target_size - w) / 2;
        meta.pad_y = (target_size - h) / 2;
        Ok(meta)
    }

    /// Size of the scaled image inside the square, never empty.
    pub fn resized_dims(&self) -> (u32, u32) {
        let fit = |orig: u32| {
            ((orig as f32 * self.scale).round() as u32).clamp(1, self.target_size)
        };
        (fit(self.orig_width), fit(self.orig_height))
    }

    /// Undo padding, then scaling, and clamp to the original image bounds.
    pub fn unmap(&self, candidate: &Candidate) -> Detection {
        let x = |v: f32| ((v - self.pad_x as f32) / self.scale).clamp(0.0, self.orig_width as f32);
        let y = |v: f32| ((v - self.pad_y as f32) / self.scale).clamp(0.0, self.orig_height as f32);

        Detection {
            x1: x(candidate.x1),
            y1: y(candidate.y1),
            x2: x(candidate.x2),
            y2: y(candidate.y2),
            confidence: candidate.confidence,
            class_id: candidate.class_id,
        }
    }
}

/// Decode an encoded image (alpha dropped) and letterbox it.
pub fn preprocess(bytes: &[u8], target_size: u32) -> DomainResult<(ArrayD<f32>, LetterboxMeta)> {
    let decoded = image::load_from_memory(bytes).map_err(DomainError::Decode)?;
    letterbox(&decoded.to_rgb8(), target_size)
}

/// Build the planar RGB tensor, values in `[0, 1]`.
pub fn letterbox(image: &RgbImage, target_size: u32) -> DomainResult<(ArrayD<f32>, LetterboxMeta)> {
    let meta = LetterboxMeta::compute(image.width(), image.height(), target_size)?;
    let (w, h) = meta.resized_dims();

    let resized: Cow<'_, RgbImage> = if (w, h) == image.dimensions() {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(image::imageops::resize(image, w, h, FilterType::Lanczos3))
    };

    let size = target_size as usize;
    let fill = LETTERBOX_FILL as f32 / 255.0;
    let mut input = Array4::<f32>::from_elem((1, 3, size, size), fill);

    let (pad_x, pad_y) = (meta.pad_x as usize, meta.pad_y as usize);
    for (x, y, pixel) in resized.enumerate_pixels() {
        let (row, col) = (pad_y + y as usize, pad_x + x as usize);
        input[[0, 0, row, col]] = pixel[0] as f32 / 255.0;
        input[[0, 1, row, col]] = pixel[1] as f32 / 255.0;
        input[[0, 2, row, col]] = pixel[2] as f32 / 255.0;
    }

    Ok((input.into_dyn(), meta))
}
