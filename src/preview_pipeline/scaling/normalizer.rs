use tracing::trace;

use crate::preview_pipeline::common::error::{PreviewError, Result};
use crate::preview_pipeline::frame::BitDepth;
use crate::preview_pipeline::scaling::types::{LutMethod, ScalingPolicy};

const U16_BITS: u32 = 16;
const FULL_SCALE: f64 = u16::MAX as f64;

/// Scales raw samples into the 16-bit palette index range.
///
/// Autoscale and LOG both stretch the selected window over `0..=65535`.
/// A manual LINEAR policy only shifts samples to 16 bits so that relative
/// intensities are kept exactly.
pub fn normalize(samples: &[u32], bit_depth: BitDepth, policy: &ScalingPolicy) -> Result<Vec<u16>> {
    if samples.is_empty() {
        return Err(PreviewError::EmptyFrame);
    }

    let log = policy.lut_method == LutMethod::Log;
    if !policy.autoscale && !log {
        return Ok(shift_to_16_bits(samples, bit_depth));
    }

    let (mut min_val, mut max_val, window) = if policy.autoscale {
        let (min, max) = sample_extrema(samples);
        let max = if max == 0 { 1 } else { max };
        (min as f64, max as f64, None)
    } else {
        (
            policy.manual_min as f64,
            policy.manual_max as f64,
            Some((policy.manual_min, policy.manual_max)),
        )
    };

    // manual windows clip the data before any transform
    let clipped = |value: u32| -> f64 {
        match window {
            Some((low, high)) => (value as u64).max(low).min(high) as f64,
            None => value as f64,
        }
    };

    let mut floor_at_one = false;
    if log {
        // log10(0) is undefined: lift the data floor to 1 and shift min along with it
        if min_val <= 0.0 {
            floor_at_one = true;
            min_val += 1.0;
        }
        min_val = min_val.log10();
        max_val = max_val.max(1.0).log10();
    }

    let transform = |value: u32| -> f64 {
        let value = clipped(value);
        match (log, floor_at_one) {
            (false, _) => value,
            (true, true) => value.max(1.0).log10(),
            (true, false) => value.log10(),
        }
    };

    if max_val == min_val {
        max_val += 1.0;
    }
    let scale = FULL_SCALE / (max_val - min_val);
    trace!(min_val, max_val, scale, log, "Scaling frame to 16 bits");

    Ok(samples
        .iter()
        .map(|&value| ((transform(value) - min_val) * scale).round().clamp(0.0, FULL_SCALE) as u16)
        .collect())
}

fn sample_extrema(samples: &[u32]) -> (u32, u32) {
    samples
        .iter()
        .fold((u32::MAX, u32::MIN), |(min, max), &v| (min.min(v), max.max(v)))
}

fn shift_to_16_bits(samples: &[u32], bit_depth: BitDepth) -> Vec<u16> {
    let bits = bit_depth.bits();
    samples
        .iter()
        .map(|&value| {
            let value = value as u64;
            let shifted = if bits < U16_BITS {
                value << (U16_BITS - bits)
            } else {
                value >> (bits - U16_BITS)
            };
            // samples wider than the declared depth saturate
            shifted.min(u16::MAX as u64) as u16
        })
        .collect()
}
