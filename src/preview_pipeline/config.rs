//! Preview device configuration
//!
//! Mirrors the device properties of the beam-viewer server. Every key is
//! optional in the TOML file and falls back to the documented default.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::preview_pipeline::common::error::{PreviewError, Result};
use crate::preview_pipeline::frame::BitDepth;
use crate::preview_pipeline::scaling::{LutMethod, jpeg_quality, manual_window};
use crate::preview_pipeline::stats::Calibration;

const DEFAULT_JPEG_QUALITY: i64 = 80;
const DEFAULT_MIN_MAX: [u64; 2] = [0, 65535];
const DEFAULT_MIN_PUSH_INTERVAL_MS: u64 = 40;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Push previews to subscribers while the device is on
    pub enable_events: bool,
    /// calibX and calibY
    pub calibration: Calibration,
    /// Beam-mark position (x, y), used for image profiles
    pub beammark: [i64; 2],
    pub lut_method: LutMethod,
    pub autoscale: bool,
    /// Thermal palette instead of greyscale
    pub color_map: bool,
    pub jpeg_quality: i64,
    /// Publish engine profiles; image profiles through the beam mark otherwise
    pub return_bpm_profiles: bool,
    /// Manual scaling window, `[0, 0]` for the full range
    pub min_max: [u64; 2],
    pub enable_bpm_calc: bool,
    pub min_push_interval_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enable_events: true,
            calibration: Calibration::default(),
            beammark: [0, 0],
            lut_method: LutMethod::Linear,
            autoscale: true,
            color_map: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            return_bpm_profiles: true,
            min_max: DEFAULT_MIN_MAX,
            enable_bpm_calc: true,
            min_push_interval_ms: DEFAULT_MIN_PUSH_INTERVAL_MS,
        }
    }
}

impl PreviewConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading preview configuration");
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| PreviewError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The bit depth is unknown until frames arrive, so the window is only
    /// checked against the widest supported depth here.
    pub fn validate(&self) -> Result<()> {
        jpeg_quality(self.jpeg_quality)?;
        let [min, max] = self.min_max;
        if !(min == 0 && max == 0) {
            manual_window(min, max, BitDepth::Bpp32)?;
        }
        if self.min_push_interval_ms == 0 {
            return Err(PreviewError::Config(
                "min_push_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn min_push_interval(&self) -> Duration {
        Duration::from_millis(self.min_push_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = PreviewConfig::from_toml_str("").unwrap();
        assert_eq!(config, PreviewConfig::default());
        assert_eq!(config.min_push_interval(), Duration::from_millis(40));
    }

    #[test]
    fn test_all_keys_parse() {
        let config = PreviewConfig::from_toml_str(
            r#"
            enable_events = false
            calibration = [0.5, 2.0]
            beammark = [12, 34]
            lut_method = "log"
            autoscale = false
            color_map = true
            jpeg_quality = 95
            return_bpm_profiles = false
            min_max = [10, 4000]
            enable_bpm_calc = false
            min_push_interval_ms = 100
            "#,
        )
        .unwrap();

        assert!(!config.enable_events);
        assert_eq!(config.calibration, Calibration::new(0.5, 2.0));
        assert_eq!(config.beammark, [12, 34]);
        assert_eq!(config.lut_method, LutMethod::Log);
        assert!(!config.autoscale);
        assert!(config.color_map);
        assert_eq!(config.jpeg_quality, 95);
        assert!(!config.return_bpm_profiles);
        assert_eq!(config.min_max, [10, 4000]);
        assert!(!config.enable_bpm_calc);
        assert_eq!(config.min_push_interval_ms, 100);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for raw in [
            r#"lut_method = "gamma""#,
            "jpeg_quality = 0",
            "jpeg_quality = 101",
            "min_max = [500, 100]",
            "min_push_interval_ms = 0",
            "unknown_key = 1",
        ] {
            let result = PreviewConfig::from_toml_str(raw);
            assert!(result.is_err(), "{raw} should be rejected");
        }
        assert!(matches!(
            PreviewConfig::from_toml_str("jpeg_quality = 0"),
            Err(PreviewError::InvalidJpegQuality(0))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "color_map = true\njpeg_quality = 60").unwrap();

        let config = PreviewConfig::load(file.path()).unwrap();
        assert!(config.color_map);
        assert_eq!(config.jpeg_quality, 60);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PreviewConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(PreviewError::IoError(_))));
    }
}
