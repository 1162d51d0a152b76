use std::sync::Arc;

use crate::application::{labels::LabelTable, services::DetectionService};
use crate::domain::model::YoloParams;

/// Shared state for the Axum HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Detection use case, model already loaded.
    pub detection: Arc<DetectionService>,
    /// Class names for responses.
    pub labels: Arc<LabelTable>,
    /// Thresholds applied to every request.
    pub params: YoloParams,
}
