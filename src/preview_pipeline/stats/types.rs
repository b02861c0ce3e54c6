//! Statistics data types

use serde::Deserialize;

/// Error code reported by the engine for a successful computation.
pub const ENGINE_OK: i32 = 0;

/// Raw per-frame result as reported by the statistics engine.
///
/// Any field may be missing or non-finite when the engine could not
/// compute it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeamResult {
    pub error_code: i32,
    pub frame_number: i64,
    /// Engine timestamp in seconds
    pub timestamp: f64,
    pub beam_center_x: Option<f64>,
    pub beam_center_y: Option<f64>,
    pub beam_intensity: Option<f64>,
    pub beam_fwhm_x: Option<f64>,
    pub beam_fwhm_y: Option<f64>,
    pub max_pixel_value: Option<f64>,
    pub profile_x: Option<Vec<i64>>,
    pub profile_y: Option<Vec<i64>>,
}

impl BeamResult {
    pub fn failed(frame_number: i64, error_code: i32) -> Self {
        Self {
            error_code,
            frame_number,
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_code == ENGINE_OK
    }
}

/// Sanitized statistics, safe to publish.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamStatistics {
    pub acq_time: f64,
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    pub fwhm_x: f64,
    pub fwhm_y: f64,
    pub max_intensity: f64,
    pub profile_x: Vec<i64>,
    pub profile_y: Vec<i64>,
}

impl BeamStatistics {
    /// The "no valid beam" marker.
    pub fn fallback(acq_time: f64) -> Self {
        Self {
            acq_time,
            x: -1.0,
            y: -1.0,
            intensity: -1.0,
            fwhm_x: 0.0,
            fwhm_y: 0.0,
            max_intensity: 0.0,
            profile_x: Vec::new(),
            profile_y: Vec::new(),
        }
    }

    /// `[acq_time, x, y]`
    pub fn txy(&self) -> [f64; 3] {
        [self.acq_time, self.x, self.y]
    }
}

/// Pixel-to-physical-unit factors for the X and Y axes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct Calibration {
    pub x: f64,
    pub y: f64,
}

impl Calibration {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

impl From<[f64; 2]> for Calibration {
    fn from(values: [f64; 2]) -> Self {
        Self::new(values[0], values[1])
    }
}
