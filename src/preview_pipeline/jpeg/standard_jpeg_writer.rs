use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::preview_pipeline::common::error::{PreviewError, Result};
use crate::preview_pipeline::jpeg::writer::JpegWriter;

/// JPEG writer backed by the `image` crate's baseline encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardJpegWriter;

impl JpegWriter for StandardJpegWriter {
    fn write_jpeg(&self, rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
        debug!("Encoding JPEG image: {}x{} at quality {}", width, height, quality);

        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(PreviewError::EncodeError(format!(
                "expected {} RGB bytes for {}x{}, got {}",
                expected,
                width,
                height,
                rgb.len()
            )));
        }

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
            .encode(rgb, width, height, ExtendedColorType::Rgb8)
            .map_err(|e| PreviewError::EncodeError(e.to_string()))?;

        debug!("JPEG encoding complete, {} bytes", buffer.len());
        Ok(buffer)
    }
}
