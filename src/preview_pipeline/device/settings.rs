use crate::preview_pipeline::common::error::Result;
use crate::preview_pipeline::config::PreviewConfig;
use crate::preview_pipeline::frame::BitDepth;
use crate::preview_pipeline::scaling::{ScalingPolicy, jpeg_quality, manual_window};
use crate::preview_pipeline::stats::Calibration;

/// Everything a render needs besides the frame itself.
///
/// Cloned out of the device lock at the start of every render, so setters
/// never observe a half-finished frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSettings {
    pub policy: ScalingPolicy,
    pub calibration: Calibration,
    pub beammark: [i64; 2],
    pub return_bpm_profiles: bool,
    pub enable_bpm_calc: bool,
}

impl PreviewSettings {
    /// No frame has been seen yet, so a full-range window resolves
    /// against 16 bits.
    pub fn from_config(config: &PreviewConfig) -> Result<Self> {
        let [min, max] = config.min_max;
        let (manual_min, manual_max) = if min == 0 && max == 0 {
            manual_window(min, max, BitDepth::Bpp16)?
        } else {
            (min, max)
        };

        let policy = ScalingPolicy::builder()
            .autoscale(config.autoscale)
            .manual_range(manual_min, manual_max)
            .lut_method(config.lut_method)
            .color_map(config.color_map)
            .jpeg_quality(jpeg_quality(config.jpeg_quality)?)
            .build();

        Ok(Self {
            policy,
            calibration: config.calibration,
            beammark: config.beammark,
            return_bpm_profiles: config.return_bpm_profiles,
            enable_bpm_calc: config.enable_bpm_calc,
        })
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            policy: ScalingPolicy::default(),
            calibration: Calibration::default(),
            beammark: [0, 0],
            return_bpm_profiles: true,
            enable_bpm_calc: true,
        }
    }
}
