//! Detector frame module
//!
//! Frames arrive from the acquisition pipeline already processed; this module
//! only models them and keeps the most recent one around for the renderer.

mod source;
mod mailbox;
pub mod types;

pub use source::FrameSource;
pub use mailbox::LatestFrame;
pub use types::{BitDepth, RawFrame, Roi};
