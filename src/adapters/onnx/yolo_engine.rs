use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use ndarray::{ArrayD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tracing::debug;

use crate::application::ports::InferencePort;
use crate::domain::errors::{DomainError, DomainResult};

/// ONNX Runtime session for a YOLO export. `Session::run` needs exclusive
/// access, so concurrent requests queue on the mutex.
pub struct OnnxYoloEngine {
    session: Mutex<Session>,
}

fn load_error(path: &Path, reason: impl Display) -> DomainError {
    DomainError::ModelLoad {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn inference_error(reason: impl Display) -> DomainError {
    DomainError::Inference(reason.to_string())
}

impl OnnxYoloEngine {
    pub fn load(path: &Path, intra_threads: usize) -> DomainResult<Self> {
        let model_bytes = fs::read(path).map_err(|e| load_error(path, e))?;
        debug!(
            "Model file size: {:.2} MB",
            model_bytes.len() as f64 / (1024.0 * 1024.0)
        );

        let builder = Session::builder()
            .map_err(|e| load_error(path, e))?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(|e| load_error(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(path, e))?
            .with_intra_threads(intra_threads)
            .map_err(|e| load_error(path, e))?;
        let session = builder
            .commit_from_memory(&model_bytes)
            .map_err(|e| load_error(path, e))?;

        if session.outputs.is_empty() {
            return Err(load_error(path, "model has no outputs"));
        }
        debug!(
            "Model inputs: {:?}, outputs: {:?}",
            session.inputs.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            session.outputs.iter().map(|o| o.name.as_str()).collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl InferencePort for OnnxYoloEngine {
    fn run(&self, input: ArrayD<f32>) -> DomainResult<ArrayD<f32>> {
        let input_shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let input_data = if input.is_standard_layout() {
            input.into_raw_vec_and_offset().0
        } else {
            input.iter().copied().collect()
        };
        let input_tensor = Tensor::from_array((input_shape, input_data)).map_err(inference_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DomainError::Inference("session lock poisoned".into()))?;
        let outputs = session.run(ort::inputs![input_tensor]).map_err(inference_error)?;

        let (shape_out, data_out) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(inference_error)?;
        let dims: Vec<usize> = shape_out.iter().map(|&d| d.max(0) as usize).collect();

        let output = ArrayD::from_shape_vec(IxDyn(&dims), data_out.to_vec())
            .map_err(|e| DomainError::unexpected_shape(&dims, e.to_string()))?;
        Ok(output)
    }
}
