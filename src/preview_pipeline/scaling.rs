//! Intensity scaling module
//!
//! Converts raw detector samples of any supported bit depth into the 16-bit
//! range indexed by the palettes.

mod normalizer;
pub mod types;

pub use normalizer::normalize;
pub use types::{LutMethod, ScalingPolicy, ScalingPolicyBuilder, jpeg_quality, manual_window};
