pub mod logger;
pub mod preview_pipeline;
