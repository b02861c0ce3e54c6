//! Scaling configuration types

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::preview_pipeline::common::error::{PreviewError, Result};
use crate::preview_pipeline::frame::BitDepth;

/// Lookup-table method applied before palette mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LutMethod {
    Linear,
    Log,
}

impl FromStr for LutMethod {
    type Err = PreviewError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "LINEAR" => Ok(Self::Linear),
            "LOG" => Ok(Self::Log),
            _ => Err(PreviewError::InvalidLutMethod(value.to_string())),
        }
    }
}

impl TryFrom<String> for LutMethod {
    type Error = PreviewError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for LutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("LINEAR"),
            Self::Log => f.write_str("LOG"),
        }
    }
}

/// Display scaling applied to every rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingPolicy {
    /// Derive the display window from each frame's own min/max
    pub autoscale: bool,
    /// Lower bound of the manual display window
    pub manual_min: u64,
    /// Upper bound of the manual display window
    pub manual_max: u64,
    pub lut_method: LutMethod,
    /// Use the thermal palette instead of greyscale
    pub color_map: bool,
    /// JPEG quality from 1 to 100
    pub jpeg_quality: u8,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        Self {
            autoscale: true,
            manual_min: 0,
            manual_max: 65535,
            lut_method: LutMethod::Linear,
            color_map: false,
            jpeg_quality: 80,
        }
    }
}

impl ScalingPolicy {
    pub fn builder() -> ScalingPolicyBuilder {
        ScalingPolicyBuilder::default()
    }
}

/// Checks a JPEG quality value coming from outside the crate.
pub fn jpeg_quality(value: i64) -> Result<u8> {
    if (1..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(PreviewError::InvalidJpegQuality(value))
    }
}

/// Resolves a requested manual window against the image bit depth.
///
/// `(0, 0)` asks for the full range of the current depth.
pub fn manual_window(min: u64, max: u64, bit_depth: BitDepth) -> Result<(u64, u64)> {
    let limit = bit_depth.range_limit();
    let max = if min == 0 && max == 0 { limit } else { max };

    if min > max {
        return Err(PreviewError::InvalidManualRange { min, max });
    }
    if min > limit || max > limit {
        return Err(PreviewError::ManualRangeOutOfBounds { min, max, limit });
    }
    Ok((min, max))
}

/// Builder for ScalingPolicy
#[derive(Default)]
pub struct ScalingPolicyBuilder {
    autoscale: Option<bool>,
    manual_range: Option<(u64, u64)>,
    lut_method: Option<LutMethod>,
    color_map: Option<bool>,
    jpeg_quality: Option<u8>,
}

impl ScalingPolicyBuilder {
    pub fn autoscale(mut self, enable: bool) -> Self {
        self.autoscale = Some(enable);
        self
    }

    pub fn manual_range(mut self, min: u64, max: u64) -> Self {
        self.manual_range = Some((min, max));
        self
    }

    pub fn lut_method(mut self, method: LutMethod) -> Self {
        self.lut_method = Some(method);
        self
    }

    pub fn color_map(mut self, enable: bool) -> Self {
        self.color_map = Some(enable);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn build(self) -> ScalingPolicy {
        let default = ScalingPolicy::default();
        let (manual_min, manual_max) = self
            .manual_range
            .unwrap_or((default.manual_min, default.manual_max));
        ScalingPolicy {
            autoscale: self.autoscale.unwrap_or(default.autoscale),
            manual_min,
            manual_max,
            lut_method: self.lut_method.unwrap_or(default.lut_method),
            color_map: self.color_map.unwrap_or(default.color_map),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality),
        }
    }
}
