use std::sync::Arc;
use std::time::Instant;

use ndarray::ArrayD;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        pipeline::postprocess,
        ports::{InferencePort, ModelLoaderPort},
    },
    domain::{
        detection::Detection,
        errors::{DomainError, DomainResult},
        letterbox::preprocess,
        model::{ModelId, YoloParams},
    },
};

struct LoadedModel {
    id: ModelId,
    engine: Arc<dyn InferencePort>,
}

/// Detection use case: owns the process-wide model handle and runs the
/// preprocess -> inference -> postprocess chain for each image.
///
/// The model is loaded at most once. Callers that arrive while the load is in
/// flight wait for it; inference before a successful load fails with
/// [`DomainError::NotLoaded`].
pub struct DetectionService {
    loader: Arc<dyn ModelLoaderPort>,
    model: OnceCell<LoadedModel>,
}

impl DetectionService {
    pub fn new(loader: Arc<dyn ModelLoaderPort>) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
        }
    }

    /// Load the model, or return the one already loaded.
    pub async fn load_model(&self, model: &ModelId) -> DomainResult<Arc<dyn InferencePort>> {
        let loaded = self
            .model
            .get_or_try_init(|| async {
                info!("Loading model {} from {}", model.name, model.onnx_path);
                let started = Instant::now();
                let engine = self.loader.load(model).await?;
                info!("Model ready in {:.2?}", started.elapsed());
                Ok::<_, DomainError>(LoadedModel {
                    id: model.clone(),
                    engine,
                })
            })
            .await?;

        if loaded.id != *model {
            warn!(
                "Model {} already loaded, ignoring request for {}",
                loaded.id.onnx_path, model.onnx_path
            );
        }
        Ok(loaded.engine.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    fn engine(&self) -> DomainResult<&Arc<dyn InferencePort>> {
        self.model
            .get()
            .map(|loaded| &loaded.engine)
            .ok_or(DomainError::NotLoaded)
    }

    pub fn run_inference(&self, input: ArrayD<f32>) -> DomainResult<ArrayD<f32>> {
        self.engine()?.run(input)
    }

    /// Full pipeline on an encoded image. Blocking; call from a worker thread
    /// when running inside an async runtime.
    #[instrument(skip(self, image, params), fields(bytes = image.len()))]
    pub fn detect(&self, image: &[u8], params: &YoloParams) -> DomainResult<Vec<Detection>> {
        let engine = self.engine()?;

        let started = Instant::now();
        let (input, meta) = preprocess(image, params.input_size)?;
        let preprocess_ms = started.elapsed().as_secs_f32() * 1000.0;

        let started = Instant::now();
        let output = engine.run(input)?;
        let infer_ms = started.elapsed().as_secs_f32() * 1000.0;

        let started = Instant::now();
        let detections = postprocess(output.view(), &meta, params)?;
        let postprocess_ms = started.elapsed().as_secs_f32() * 1000.0;

        debug!(
            width = meta.orig_width,
            height = meta.orig_height,
            detections = detections.len(),
            preprocess_ms,
            infer_ms,
            postprocess_ms,
            "Detection completed"
        );
        Ok(detections)
    }
}
