use std::sync::Arc;

use tracing::{debug, instrument};

use crate::preview_pipeline::{
    common::error::{PreviewError, Result},
    encoder::{
        timing::{RenderTimings, Timer},
        types::RenderedFrame,
    },
    frame::RawFrame,
    jpeg::{JpegWriter, StandardJpegWriter},
    palette::{PaletteKind, PaletteTable},
    scaling::{ScalingPolicy, normalize},
    stats::{BeamResult, Calibration, disabled_statistics, sanitize},
};

pub struct FrameEncoder<W: JpegWriter = StandardJpegWriter> {
    writer: W,
    palette: Arc<PaletteTable>,
}

impl FrameEncoder<StandardJpegWriter> {
    pub fn new(palette: Arc<PaletteTable>) -> Self {
        Self {
            writer: StandardJpegWriter,
            palette,
        }
    }
}

impl<W: JpegWriter> FrameEncoder<W> {
    pub fn with_custom(writer: W, palette: Arc<PaletteTable>) -> Self {
        Self { writer, palette }
    }

    /// Renders `frame` under `policy` and sanitizes its statistics.
    ///
    /// `result` is `None` when the statistics engine is switched off; both
    /// that and an engine error produce the fallback statistics.
    pub fn render(
        &self,
        frame: &RawFrame,
        result: Option<&BeamResult>,
        policy: &ScalingPolicy,
        calibration: Calibration,
    ) -> Result<RenderedFrame> {
        let (rendered, timings) = self.render_with_timings(frame, result, policy, calibration)?;
        debug!(
            frame = rendered.frame_number,
            "Preview rendered in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        timings.log_summary();
        Ok(rendered)
    }

    #[instrument(skip_all, fields(frame = frame.frame_number, width = frame.width, height = frame.height))]
    pub fn render_with_timings(
        &self,
        frame: &RawFrame,
        result: Option<&BeamResult>,
        policy: &ScalingPolicy,
        calibration: Calibration,
    ) -> Result<(RenderedFrame, RenderTimings)> {
        let mut timings = RenderTimings::new();

        let width = u32::try_from(frame.width)
            .map_err(|_| PreviewError::InvalidDimensions(frame.width, frame.height))?;
        let height = u32::try_from(frame.height)
            .map_err(|_| PreviewError::InvalidDimensions(frame.width, frame.height))?;

        let timer = Timer::start("normalize");
        let scaled = normalize(&frame.data, frame.bit_depth, policy)?;
        timings.record(timer);

        let timer = Timer::start("palette");
        let rgb = self
            .palette
            .apply(&scaled, PaletteKind::for_color_map(policy.color_map));
        timings.record(timer);

        let timer = Timer::start("jpeg");
        let jpeg = self
            .writer
            .write_jpeg(&rgb, width, height, policy.jpeg_quality)?;
        timings.record(timer);

        let timer = Timer::start("statistics");
        let statistics = match result {
            Some(result) => sanitize(
                result,
                frame.timestamp,
                Some((frame.width, frame.height)),
                calibration,
            ),
            None => disabled_statistics(frame.timestamp),
        };
        timings.record(timer);

        let rendered = RenderedFrame {
            width,
            height,
            frame_number: frame.frame_number,
            roi: frame.roi,
            rgb,
            jpeg,
            statistics,
        };
        Ok((rendered, timings))
    }
}
