//! Encoder output types

use crate::preview_pipeline::frame::Roi;
use crate::preview_pipeline::stats::BeamStatistics;

/// One rendered preview with the statistics that go out alongside it.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub width: u32,
    pub height: u32,
    pub frame_number: i64,
    pub roi: Roi,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub rgb: Vec<u8>,
    /// Compressed form of `rgb`
    pub jpeg: Vec<u8>,
    pub statistics: BeamStatistics,
}
