use std::sync::{Arc, Mutex, PoisonError};

use crate::preview_pipeline::frame::source::FrameSource;
use crate::preview_pipeline::frame::types::RawFrame;

/// Single-slot mailbox holding the most recent frame.
///
/// The producer overwrites the slot, readers sample it without removing it.
/// The lock only guards a pointer swap, so neither side waits on rendering.
#[derive(Debug, Default)]
pub struct LatestFrame {
    slot: Mutex<Option<Arc<RawFrame>>>,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, frame: RawFrame) {
        let frame = Arc::new(frame);
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    pub fn clear(&self) {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

impl FrameSource for LatestFrame {
    fn latest_frame(&self) -> Option<Arc<RawFrame>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
