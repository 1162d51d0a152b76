pub mod dto;
pub mod labels;
pub mod pipeline;
pub mod ports;
pub mod services;
