use std::sync::{Arc, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::trace;

use crate::preview_pipeline::common::error::{PreviewError, Result};
use crate::preview_pipeline::device::settings::PreviewSettings;
use crate::preview_pipeline::encoder::FrameEncoder;
use crate::preview_pipeline::frame::{FrameSource, LatestFrame, RawFrame};
use crate::preview_pipeline::jpeg::JpegWriter;
use crate::preview_pipeline::payload::{BvDataPayload, EncodedPayload, profile_bytes};
use crate::preview_pipeline::push::PayloadSource;
use crate::preview_pipeline::stats::{BeamResult, StatisticsProvider};

/// Error code used when the engine has nothing for the requested frame.
pub const NO_RESULT: i32 = -1;

/// Renders whatever frame is the latest when asked.
///
/// Shared between the push thread and synchronous reads on the device.
pub struct PreviewRenderer<W: JpegWriter> {
    frames: Arc<LatestFrame>,
    statistics: Arc<dyn StatisticsProvider>,
    settings: Arc<RwLock<PreviewSettings>>,
    encoder: FrameEncoder<W>,
}

impl<W: JpegWriter> PreviewRenderer<W> {
    pub fn new(
        frames: Arc<LatestFrame>,
        statistics: Arc<dyn StatisticsProvider>,
        settings: Arc<RwLock<PreviewSettings>>,
        encoder: FrameEncoder<W>,
    ) -> Self {
        Self {
            frames,
            statistics,
            settings,
            encoder,
        }
    }

    fn snapshot(&self) -> PreviewSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn render_frame(&self, frame: &RawFrame) -> Result<EncodedPayload> {
        let settings = self.snapshot();

        let result = settings.enable_bpm_calc.then(|| {
            self.statistics
                .result_for(frame.frame_number)
                .unwrap_or_else(|| BeamResult::failed(frame.frame_number, NO_RESULT))
        });

        let mut rendered =
            self.encoder
                .render(frame, result.as_ref(), &settings.policy, settings.calibration)?;
        if result.is_none() {
            rendered.statistics.acq_time = unix_now();
        }

        let (profile_x, profile_y) = if settings.return_bpm_profiles {
            (
                profile_bytes(&rendered.statistics.profile_x),
                profile_bytes(&rendered.statistics.profile_y),
            )
        } else {
            let (row, column) = beammark_profiles(frame, settings.beammark);
            (profile_bytes(&row), profile_bytes(&column))
        };

        let payload = BvDataPayload::new(
            rendered.frame_number,
            &rendered.statistics,
            rendered.roi,
            profile_x,
            profile_y,
            rendered.jpeg,
        );
        let encoded = payload.pack();
        trace!(frame = frame.frame_number, format = %encoded.format, "Payload packed");
        Ok(encoded)
    }
}

impl<W: JpegWriter> PayloadSource for PreviewRenderer<W> {
    fn render_latest(&self) -> Result<EncodedPayload> {
        let frame = self
            .frames
            .latest_frame()
            .ok_or(PreviewError::NoFrameAvailable)?;
        self.render_frame(&frame)
    }
}

/// Image profiles through the beam mark.
///
/// The X profile is the row at `beammark[1]`, the Y profile the column at
/// `beammark[0]`. A mark outside the image gives zeros.
pub fn beammark_profiles(frame: &RawFrame, beammark: [i64; 2]) -> (Vec<i64>, Vec<i64>) {
    let [mark_x, mark_y] = beammark;

    let row = usize::try_from(mark_y)
        .ok()
        .and_then(|y| frame.row(y))
        .map(|row| row.iter().map(|&v| i64::from(v)).collect())
        .unwrap_or_else(|| vec![0; frame.width]);

    let column = usize::try_from(mark_x)
        .ok()
        .and_then(|x| frame.column(x))
        .map(|column| column.into_iter().map(i64::from).collect())
        .unwrap_or_else(|| vec![0; frame.height]);

    (row, column)
}

pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}
