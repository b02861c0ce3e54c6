//! Preview device module
//!
//! The configuration surface and lifecycle around the render pipeline:
//! settings snapshots, arm/disarm of the push thread, synchronous reads and
//! the scalar attribute reads of the beam-viewer server.

mod preview_device;
mod renderer;
pub mod settings;


pub use preview_device::{DeviceState, PreviewDevice, RESULT_ROW_LEN};
pub use renderer::{NO_RESULT, PreviewRenderer, beammark_profiles};
pub use settings::PreviewSettings;
