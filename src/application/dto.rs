use serde::{Deserialize, Serialize};

use crate::{
    application::labels::{disposal_bin, LabelTable},
    domain::detection::Detection,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDetection {
    #[serde(flatten)]
    pub detection: Detection,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    pub top: Option<LabeledDetection>,
    pub bin: String,
    pub detections: Vec<LabeledDetection>,
}

impl DetectResponse {
    pub fn build(mut detections: Vec<Detection>, labels: &LabelTable) -> Self {
        // already ordered by the pipeline; re-sort so callers can pass any list
        detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let detections: Vec<LabeledDetection> = detections
            .into_iter()
            .map(|detection| LabeledDetection {
                label: labels.label(detection.class_id),
                detection,
            })
            .collect();

        let top = detections.first().cloned();
        let bin = disposal_bin(top.as_ref().map_or("unknown", |t| t.label.as_str())).to_string();

        Self { top, bin, detections }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}
