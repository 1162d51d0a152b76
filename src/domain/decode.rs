//! Decoding of raw YOLO output tensors into scored candidates.
//!
//! Exported YOLOv8-style heads emit `[1, 4 + classes, boxes]` or, after a
//! transpose in the export script, `[1, boxes, 4 + classes]`. The layout is
//! inferred from the shape alone.

use ndarray::{s, ArrayViewD, Axis, Ix2};

use super::detection::Candidate;
use super::errors::{DomainError, DomainResult};

/// Channels that precede the class scores: cx, cy, w, h.
pub const BOX_ATTRIBUTES: usize = 4;

/// Largest leading dimension still read as an attribute axis.
pub const MAX_CHANNEL_MAJOR_ATTRIBUTES: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, K, N]`: attribute `a` of box `i` at `a * N + i`.
    ChannelMajor,
    /// `[1, N, K]`: attribute `a` of box `i` at `i * K + a`.
    DetectionMajor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputGeometry {
    pub layout: TensorLayout,
    /// K, box attributes plus class scores.
    pub attributes: usize,
    /// N, number of candidate boxes.
    pub candidates: usize,
}

impl OutputGeometry {
    /// Pick the layout for a `[1, d1, d2]` output.
    ///
    /// Channel-major when `d1 <= 128` and `d2 > d1`, detection-major
    /// otherwise. This is a heuristic: a channel-major export with more than
    /// 124 classes will be misread as detection-major.
    ///
    /// A tall output (`d1 > d2`, e.g. `[1, 8400, 10]`) is read as
    /// detection-major with `K = d2`, not as `K = d1` attribute rows: no
    /// YOLO head has more attributes than boxes, and reading it the other way
    /// would decode 10 boxes with 8396 class scores each.
    pub fn from_dims(dims: &[usize]) -> DomainResult<Self> {
        let &[batch, d1, d2] = dims else {
            return Err(DomainError::unexpected_shape(dims, "expected rank 3"));
        };
        if batch != 1 {
            return Err(DomainError::unexpected_shape(dims, "expected batch size 1"));
        }

        let geometry = if d1 <= MAX_CHANNEL_MAJOR_ATTRIBUTES && d2 > d1 {
            Self {
                layout: TensorLayout::ChannelMajor,
                attributes: d1,
                candidates: d2,
            }
        } else {
            Self {
                layout: TensorLayout::DetectionMajor,
                attributes: d2,
                candidates: d1,
            }
        };

        if geometry.attributes <= BOX_ATTRIBUTES {
            return Err(DomainError::unexpected_shape(
                dims,
                format!("need at least {} attributes per box", BOX_ATTRIBUTES + 1),
            ));
        }
        Ok(geometry)
    }

    pub fn num_classes(&self) -> usize {
        self.attributes - BOX_ATTRIBUTES
    }
}

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Turn a raw output tensor into candidates above `conf_threshold`.
///
/// The best class is the first maximum raw score; its logistic value is the
/// confidence. Boxes are returned as corners in model input space, in tensor
/// order.
pub fn decode_candidates(
    output: ArrayViewD<'_, f32>,
    conf_threshold: f32,
) -> DomainResult<Vec<Candidate>> {
    let geometry = OutputGeometry::from_dims(output.shape())?;

    let plane = output
        .index_axis(Axis(0), 0)
        .into_dimensionality::<Ix2>()
        .map_err(|e| DomainError::unexpected_shape(output.shape(), e.to_string()))?;

    // Normalise to a (K, N) view so both layouts share one loop.
    let attrs = match geometry.layout {
        TensorLayout::ChannelMajor => plane,
        TensorLayout::DetectionMajor => plane.reversed_axes(),
    };

    let mut candidates = Vec::new();
    for i in 0..geometry.candidates {
        let column = attrs.column(i);

        let mut best = f32::NEG_INFINITY;
        let mut best_id = 0usize;
        for (class_id, &score) in column.slice(s![BOX_ATTRIBUTES..]).iter().enumerate() {
            if score > best {
                best = score;
                best_id = class_id;
            }
        }

        let confidence = sigmoid(best);
        if confidence < conf_threshold {
            continue;
        }

        candidates.push(Candidate::from_center(
            column[0], column[1], column[2], column[3], confidence, best_id,
        ));
    }

    Ok(candidates)
}
