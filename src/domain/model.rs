use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,       // logical name, e.g. "yolov8n"
    pub onnx_path: String,  // filesystem path
}

impl ModelId {
    pub fn from_path(onnx_path: impl Into<String>) -> Self {
        let onnx_path = onnx_path.into();
        let name = std::path::Path::new(&onnx_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        Self { name, onnx_path }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YoloParams {
    pub input_size: u32,        // square edge, 640 typical
    pub conf_threshold: f32,    // 0..1
    pub iou_threshold: f32,     // 0..1
    pub max_detections: usize,
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.35,
            iou_threshold: 0.45,
            max_detections: 10,
        }
    }
}

impl YoloParams {
    /// Defaults used by the HTTP layer, which only reports the top few boxes.
    pub fn serving() -> Self {
        Self {
            max_detections: 5,
            ..Self::default()
        }
    }
}
