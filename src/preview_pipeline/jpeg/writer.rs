use crate::preview_pipeline::common::error::Result;

pub trait JpegWriter: Send + Sync {
    /// Compresses interleaved 8-bit RGB pixels.
    fn write_jpeg(&self, rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>>;
}
