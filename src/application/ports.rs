use std::sync::Arc;

use async_trait::async_trait;
use ndarray::ArrayD;

use crate::domain::{errors::DomainResult, model::ModelId};

/// A loaded detection model. Implementations must be shareable across
/// concurrent requests; any locking the engine needs stays inside.
pub trait InferencePort: Send + Sync {
    /// Forward pass on a `[1, 3, S, S]` input, returning the first output.
    fn run(&self, input: ArrayD<f32>) -> DomainResult<ArrayD<f32>>;
}

#[async_trait]
pub trait ModelLoaderPort: Send + Sync {
    async fn load(&self, model: &ModelId) -> DomainResult<Arc<dyn InferencePort>>;
}
