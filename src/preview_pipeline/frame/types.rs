//! Raw frame data types

use crate::preview_pipeline::common::error::{PreviewError, Result};

/// Declared sample width of a detector image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    Bpp8,
    Bpp10,
    Bpp12,
    Bpp14,
    Bpp16,
    Bpp24,
    Bpp32,
}

impl BitDepth {
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(Self::Bpp8),
            10 => Ok(Self::Bpp10),
            12 => Ok(Self::Bpp12),
            14 => Ok(Self::Bpp14),
            16 => Ok(Self::Bpp16),
            24 => Ok(Self::Bpp24),
            32 => Ok(Self::Bpp32),
            other => Err(PreviewError::UnsupportedBitDepth(other)),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::Bpp8 => 8,
            Self::Bpp10 => 10,
            Self::Bpp12 => 12,
            Self::Bpp14 => 14,
            Self::Bpp16 => 16,
            Self::Bpp24 => 24,
            Self::Bpp32 => 32,
        }
    }

    /// Upper bound accepted for a manual scaling window, `2^bits`.
    pub fn range_limit(self) -> u64 {
        1u64 << self.bits()
    }
}

/// Region of interest the frame was read out from, in detector coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Roi {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Roi {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// A processed detector frame.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Row-major samples, one per pixel
    pub data: Vec<u32>,
    pub bit_depth: BitDepth,
    pub frame_number: i64,
    /// Acquisition timestamp in seconds
    pub timestamp: f64,
    pub roi: Roi,
}

impl RawFrame {
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<u32>,
        bit_depth: BitDepth,
        frame_number: i64,
        timestamp: f64,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PreviewError::InvalidDimensions(width, height));
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(PreviewError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
            bit_depth,
            frame_number,
            timestamp,
            roi: Roi::new(0, 0, width as i32, height as i32),
        })
    }

    pub fn with_roi(mut self, roi: Roi) -> Self {
        self.roi = roi;
        self
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Whether the buffer matches the declared dimensions. Always true for
    /// frames built through [`RawFrame::new`].
    pub fn is_consistent(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self
                .width
                .checked_mul(self.height)
                .is_some_and(|len| len == self.data.len())
    }

    pub fn row(&self, y: usize) -> Option<&[u32]> {
        if y >= self.height || !self.is_consistent() {
            return None;
        }
        self.data.chunks_exact(self.width).nth(y)
    }

    pub fn column(&self, x: usize) -> Option<Vec<u32>> {
        if x >= self.width || !self.is_consistent() {
            return None;
        }
        Some(
            self.data
                .chunks_exact(self.width)
                .map(|row| row[x])
                .collect(),
        )
    }
}
