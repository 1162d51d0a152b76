use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::onnx::yolo_engine::OnnxYoloEngine;
use crate::application::ports::{InferencePort, ModelLoaderPort};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::ModelId;

/// Loads ONNX exports from the local filesystem.
pub struct OnnxModelCatalog {
    intra_threads: usize,
}

impl OnnxModelCatalog {
    pub fn new(intra_threads: usize) -> Self {
        Self {
            intra_threads: intra_threads.max(1),
        }
    }

    fn validate_model(model: &ModelId) -> DomainResult<()> {
        let fail = |reason: &str| DomainError::ModelLoad {
            path: model.onnx_path.clone(),
            reason: reason.to_string(),
        };
        if model.onnx_path.trim().is_empty() {
            return Err(fail("onnx_path empty"));
        }
        let path = Path::new(&model.onnx_path);
        if !path.exists() {
            return Err(fail("model file not found"));
        }
        if !path.is_file() {
            return Err(fail("model path is not a file"));
        }
        Ok(())
    }
}

#[async_trait]
impl ModelLoaderPort for OnnxModelCatalog {
    async fn load(&self, model: &ModelId) -> DomainResult<Arc<dyn InferencePort>> {
        Self::validate_model(model)?;

        // Building the session parses and optimises the graph; keep it off the
        // async workers.
        let path = PathBuf::from(&model.onnx_path);
        let threads = self.intra_threads;
        let engine = tokio::task::spawn_blocking(move || OnnxYoloEngine::load(&path, threads))
            .await
            .map_err(|e| DomainError::ModelLoad {
                path: model.onnx_path.clone(),
                reason: e.to_string(),
            })??;

        Ok(Arc::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn load_err(path: &str) -> DomainError {
        OnnxModelCatalog::new(1)
            .load(&ModelId::from_path(path))
            .await
            .err()
            .expect("load should fail")
    }

    #[tokio::test]
    async fn empty_path_is_a_load_failure() {
        let err = load_err("  ").await;
        assert!(matches!(err, DomainError::ModelLoad { ref reason, .. } if reason == "onnx_path empty"));
    }

    #[tokio::test]
    async fn missing_file_is_a_load_failure() {
        let err = load_err("/nonexistent/yolov8n.onnx").await;
        assert!(matches!(err, DomainError::ModelLoad { ref path, .. } if path == "/nonexistent/yolov8n.onnx"));
    }

    #[tokio::test]
    async fn directory_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_err(dir.path().to_str().unwrap()).await;
        assert!(matches!(err, DomainError::ModelLoad { ref reason, .. } if reason == "model path is not a file"));
    }
}
