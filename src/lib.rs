pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

pub use application::services::DetectionService;
pub use domain::detection::{Candidate, Detection};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::letterbox::LetterboxMeta;
pub use domain::model::{ModelId, YoloParams};
