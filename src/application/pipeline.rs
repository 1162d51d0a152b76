use ndarray::ArrayViewD;
use tracing::debug;

use crate::domain::{
    decode::decode_candidates,
    detection::Detection,
    errors::DomainResult,
    letterbox::LetterboxMeta,
    model::YoloParams,
    nms::suppress,
};

/// Decode, suppress and project a raw model output back onto the source
/// image. Detections come out in descending confidence.
pub fn postprocess(
    output: ArrayViewD<'_, f32>,
    meta: &LetterboxMeta,
    params: &YoloParams,
) -> DomainResult<Vec<Detection>> {
    let candidates = decode_candidates(output, params.conf_threshold)?;
    let before_nms = candidates.len();

    let kept = suppress(candidates, params.iou_threshold, params.max_detections);
    debug!(before_nms, kept = kept.len(), "postprocess");

    Ok(kept.iter().map(|c| meta.unmap(c)).collect())
}
