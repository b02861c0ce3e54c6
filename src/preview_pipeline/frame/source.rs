use std::sync::Arc;

use crate::preview_pipeline::frame::types::RawFrame;

pub trait FrameSource: Send + Sync {
    fn latest_frame(&self) -> Option<Arc<RawFrame>>;
}
