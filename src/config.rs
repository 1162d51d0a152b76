use std::path::PathBuf;

use clap::Parser;

use crate::domain::model::{ModelId, YoloParams};

/// Waste detection server
#[derive(Parser, Debug, Clone)]
#[command(author, version, long_about = None)]
pub struct ServerConfig {
    /// ONNX model file
    #[arg(long, env = "MODEL_PATH", default_value = "model/yolov8n.onnx", value_name = "FILE")]
    pub model: String,

    /// JSON array of class names, indexed by class id
    #[arg(long, env = "LABELS_PATH", default_value = "model/labels.json", value_name = "FILE")]
    pub labels: PathBuf,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Square input edge in pixels
    #[arg(long, default_value_t = 640, value_name = "PIXELS")]
    pub input_size: u32,

    /// Minimum confidence (0.0 - 1.0)
    #[arg(long, default_value_t = 0.35, value_name = "THRESHOLD")]
    pub conf_thres: f32,

    /// NMS IoU threshold (0.0 - 1.0)
    #[arg(long, default_value_t = 0.45, value_name = "THRESHOLD")]
    pub iou_thres: f32,

    /// Detections returned per image
    #[arg(long, default_value_t = 5, value_name = "COUNT")]
    pub max_det: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, default_value_t = 4, value_name = "COUNT")]
    pub intra_threads: usize,

    /// Upload size limit in MiB
    #[arg(long, default_value_t = 20, value_name = "MIB")]
    pub max_upload_mb: usize,
}

impl ServerConfig {
    pub fn model_id(&self) -> ModelId {
        ModelId::from_path(self.model.clone())
    }

    pub fn detect_params(&self) -> YoloParams {
        YoloParams {
            input_size: self.input_size,
            conf_threshold: self.conf_thres,
            iou_threshold: self.iou_thres,
            max_detections: self.max_det,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
