pub mod decode;
pub mod detection;
pub mod errors;
pub mod letterbox;
pub mod model;
pub mod nms;
