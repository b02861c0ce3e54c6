//! Frame encoding module
//!
//! Orchestrates scaling, palette mapping, JPEG compression and statistics
//! sanitization for a single preview frame.

mod frame_encoder;
mod timing;
pub mod types;


pub use frame_encoder::FrameEncoder;
pub use timing::{RenderTimings, StepTiming, Timer};
pub use types::RenderedFrame;
