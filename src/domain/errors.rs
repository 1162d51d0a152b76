use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("image decode failed: {0}")]
    Decode(#[source] image::ImageError),
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
    #[error("unexpected output shape {dims:?}: {reason}")]
    UnexpectedShape { dims: Vec<usize>, reason: String },
    #[error("model not loaded, call load_model() first")]
    NotLoaded,
    #[error("failed to load model {path}: {reason}")]
    ModelLoad { path: String, reason: String },
    #[error("inference failed: {0}")]
    Inference(String),
}

impl DomainError {
    pub fn unexpected_shape(dims: &[usize], reason: impl Into<String>) -> Self {
        DomainError::UnexpectedShape {
            dims: dims.to_vec(),
            reason: reason.into(),
        }
    }

    /// True for failures caused by the submitted image rather than the service.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            DomainError::Decode(_) | DomainError::InvalidDimension { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
