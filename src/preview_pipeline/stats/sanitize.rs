use tracing::trace;

use crate::preview_pipeline::stats::types::{BeamResult, BeamStatistics, Calibration};
use crate::preview_pipeline::stats::validate::{validate, DEFAULT_MIN};

/// Turns an engine result into publishable statistics.
///
/// Positions are bounded by the image size when it is known, then every
/// spatial value is multiplied by the calibration. An engine error yields the
/// fallback set.
pub fn sanitize(
    result: &BeamResult,
    acq_time: f64,
    image_size: Option<(usize, usize)>,
    calibration: Calibration,
) -> BeamStatistics {
    if !result.is_ok() {
        trace!(
            frame = result.frame_number,
            code = result.error_code,
            "Statistics engine reported an error"
        );
        return BeamStatistics::fallback(acq_time);
    }

    let max_width = image_size.map(|(width, _)| width as f64);
    let max_height = image_size.map(|(_, height)| height as f64);

    BeamStatistics {
        acq_time,
        x: validate(result.beam_center_x, -1.0, DEFAULT_MIN, max_width) * calibration.x,
        y: validate(result.beam_center_y, -1.0, DEFAULT_MIN, max_height) * calibration.y,
        intensity: validate(result.beam_intensity, -1.0, DEFAULT_MIN, None),
        fwhm_x: validate(result.beam_fwhm_x, 0.0, DEFAULT_MIN, None) * calibration.x,
        fwhm_y: validate(result.beam_fwhm_y, 0.0, DEFAULT_MIN, None) * calibration.y,
        max_intensity: validate(result.max_pixel_value, 0.0, DEFAULT_MIN, None),
        profile_x: result.profile_x.clone().unwrap_or_default(),
        profile_y: result.profile_y.clone().unwrap_or_default(),
    }
}

/// Statistics published while the engine is switched off.
pub fn disabled_statistics(acq_time: f64) -> BeamStatistics {
    BeamStatistics::fallback(acq_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview_pipeline::stats::types::ENGINE_OK;

    fn good_result() -> BeamResult {
        BeamResult {
            error_code: ENGINE_OK,
            frame_number: 3,
            timestamp: 1.0,
            beam_center_x: Some(10.0),
            beam_center_y: Some(20.0),
            beam_intensity: Some(500.0),
            beam_fwhm_x: Some(2.0),
            beam_fwhm_y: Some(4.0),
            max_pixel_value: Some(4095.0),
            profile_x: Some(vec![1, 2, 3]),
            profile_y: Some(vec![4, 5]),
        }
    }

    #[test]
    fn test_engine_error_collapses_to_fallbacks() {
        let stats = sanitize(&BeamResult::failed(9, 3), 2.5, Some((64, 64)), Calibration::default());

        assert_eq!(stats.acq_time, 2.5);
        assert_eq!(stats.x, -1.0);
        assert_eq!(stats.y, -1.0);
        assert_eq!(stats.intensity, -1.0);
        assert_eq!(stats.fwhm_x, 0.0);
        assert_eq!(stats.fwhm_y, 0.0);
        assert_eq!(stats.max_intensity, 0.0);
        assert!(stats.profile_x.is_empty());
        assert!(stats.profile_y.is_empty());
    }

    #[test]
    fn test_errored_result_drops_profiles_it_carries() {
        let mut result = good_result();
        result.error_code = 1;
        let stats = sanitize(&result, 0.0, Some((64, 64)), Calibration::default());
        assert!(stats.profile_x.is_empty());
        assert!(stats.profile_y.is_empty());
    }

    #[test]
    fn test_calibration_scales_positions_and_widths() {
        let stats = sanitize(&good_result(), 1.0, Some((64, 64)), Calibration::new(0.5, 2.0));

        assert_eq!(stats.x, 5.0);
        assert_eq!(stats.y, 40.0);
        assert_eq!(stats.fwhm_x, 1.0);
        assert_eq!(stats.fwhm_y, 8.0);
        assert_eq!(stats.intensity, 500.0);
        assert_eq!(stats.max_intensity, 4095.0);
        assert_eq!(stats.profile_x, vec![1, 2, 3]);
        assert_eq!(stats.profile_y, vec![4, 5]);
    }

    #[test]
    fn test_out_of_image_position_falls_back_before_calibration() {
        let mut result = good_result();
        result.beam_center_x = Some(100.0);
        result.beam_center_y = Some(f64::NAN);
        result.beam_fwhm_x = None;

        let stats = sanitize(&result, 1.0, Some((64, 64)), Calibration::new(3.0, 3.0));
        assert_eq!(stats.x, -3.0);
        assert_eq!(stats.y, -3.0);
        assert_eq!(stats.fwhm_x, 0.0);
    }

    #[test]
    fn test_unknown_image_size_leaves_positions_unbounded() {
        let mut result = good_result();
        result.beam_center_x = Some(5000.0);
        let stats = sanitize(&result, 1.0, None, Calibration::default());
        assert_eq!(stats.x, 5000.0);
    }
}
