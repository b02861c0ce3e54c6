use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tracing::{debug, info, instrument, warn};

use crate::preview_pipeline::common::error::Result;
use crate::preview_pipeline::config::PreviewConfig;
use crate::preview_pipeline::device::renderer::{PreviewRenderer, unix_now};
use crate::preview_pipeline::device::settings::PreviewSettings;
use crate::preview_pipeline::encoder::FrameEncoder;
use crate::preview_pipeline::frame::{BitDepth, FrameSource, LatestFrame, RawFrame};
use crate::preview_pipeline::jpeg::{JpegWriter, StandardJpegWriter};
use crate::preview_pipeline::palette::PaletteTable;
use crate::preview_pipeline::payload::EncodedPayload;
use crate::preview_pipeline::push::{
    FrameNotifier, PayloadSource, PushCounters, PushScheduler, Subscriber,
};
use crate::preview_pipeline::scaling::{LutMethod, jpeg_quality, manual_window};
use crate::preview_pipeline::stats::{
    BeamResult, BeamStatistics, Calibration, DEFAULT_MIN, StatisticsProvider, disabled_statistics,
    sanitize, validate,
};

/// Values per row returned by [`PreviewDevice::get_results`].
pub const RESULT_ROW_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Off,
    On,
}

/// Beam-viewer preview device.
///
/// Owns the latest-frame mailbox, the render settings and the push
/// scheduler. The acquisition side calls [`process_frame`](Self::process_frame)
/// once per processed frame; subscribers receive at most one payload per
/// push window while the device is on.
pub struct PreviewDevice<W: JpegWriter + 'static = StandardJpegWriter> {
    frames: Arc<LatestFrame>,
    statistics: Arc<dyn StatisticsProvider>,
    subscriber: Arc<dyn Subscriber>,
    settings: Arc<RwLock<PreviewSettings>>,
    renderer: Arc<PreviewRenderer<W>>,
    scheduler: PushScheduler,
    notifier: FrameNotifier,
    enable_events: bool,
}

impl PreviewDevice<StandardJpegWriter> {
    pub fn new(
        config: &PreviewConfig,
        statistics: Arc<dyn StatisticsProvider>,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<Self> {
        Self::with_writer(StandardJpegWriter, config, statistics, subscriber)
    }
}

impl<W: JpegWriter + 'static> PreviewDevice<W> {
    pub fn with_writer(
        writer: W,
        config: &PreviewConfig,
        statistics: Arc<dyn StatisticsProvider>,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<Self> {
        config.validate()?;
        let settings = Arc::new(RwLock::new(PreviewSettings::from_config(config)?));
        let frames = Arc::new(LatestFrame::new());
        let palette = Arc::new(PaletteTable::new());

        let renderer = Arc::new(PreviewRenderer::new(
            frames.clone(),
            statistics.clone(),
            settings.clone(),
            FrameEncoder::with_custom(writer, palette),
        ));
        let scheduler = PushScheduler::new(config.min_push_interval());
        let notifier = scheduler.notifier();

        debug!(?config, "Preview device created");
        Ok(Self {
            frames,
            statistics,
            subscriber,
            settings,
            renderer,
            scheduler,
            notifier,
            enable_events: config.enable_events,
        })
    }

    pub fn state(&self) -> DeviceState {
        if self.scheduler.is_running() {
            DeviceState::On
        } else {
            DeviceState::Off
        }
    }

    /// Arms or disarms the push thread. Repeating the current state is a
    /// no-op.
    pub fn set_state(&mut self, state: DeviceState) -> Result<()> {
        match (state, self.state()) {
            (DeviceState::On, DeviceState::Off) => {
                if !self.enable_events {
                    info!("Events disabled, push thread not started");
                    return Ok(());
                }
                let source = self.renderer.clone();
                self.scheduler.start(source, self.subscriber.clone())?;
                info!("Preview device on");
            }
            (DeviceState::Off, DeviceState::On) => {
                self.scheduler.stop()?;
                info!("Preview device off");
            }
            _ => debug!(?state, "Device already in requested state"),
        }
        Ok(())
    }

    pub fn enable_events(&self) -> bool {
        self.enable_events
    }

    /// Takes effect on the next `set_state(On)`; disabling also disarms.
    pub fn set_enable_events(&mut self, enable: bool) -> Result<()> {
        self.enable_events = enable;
        if !enable && self.state() == DeviceState::On {
            self.set_state(DeviceState::Off)?;
        }
        Ok(())
    }

    /// Producer hook. Overwrites the latest frame and wakes the push thread.
    pub fn process_frame(&self, frame: RawFrame) {
        self.frames.publish(frame);
        self.notifier.on_frame();
    }

    /// Renders the latest frame now, ignoring the push window.
    #[instrument(skip(self))]
    pub fn read_bvdata(&self) -> Result<(Vec<u8>, String)> {
        let payload: EncodedPayload = self.renderer.render_latest()?;
        let format = payload.format_string();
        Ok((payload.bytes, format))
    }

    pub fn settings(&self) -> PreviewSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn settings_mut(&self) -> RwLockWriteGuard<'_, PreviewSettings> {
        self.settings.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_autoscale(&self, enable: bool) {
        self.settings_mut().policy.autoscale = enable;
    }

    pub fn set_lut_method(&self, method: &str) -> Result<()> {
        let method: LutMethod = method.parse()?;
        self.settings_mut().policy.lut_method = method;
        Ok(())
    }

    pub fn set_color_map(&self, enable: bool) {
        self.settings_mut().policy.color_map = enable;
    }

    pub fn set_jpeg_quality(&self, quality: i64) -> Result<()> {
        let quality = jpeg_quality(quality)?;
        self.settings_mut().policy.jpeg_quality = quality;
        Ok(())
    }

    pub fn set_calibration(&self, calibration: [f64; 2]) {
        self.settings_mut().calibration = Calibration::from(calibration);
    }

    pub fn set_beammark(&self, beammark: [i64; 2]) {
        self.settings_mut().beammark = beammark;
    }

    /// Checked against the bit depth of the latest frame, or 16 bits before
    /// the first one arrives. `[0, 0]` selects the full range.
    pub fn set_min_max(&self, min_max: [u64; 2]) -> Result<()> {
        let bit_depth = self
            .frames
            .latest_frame()
            .map_or(BitDepth::Bpp16, |frame| frame.bit_depth);
        let (min, max) = manual_window(min_max[0], min_max[1], bit_depth)?;

        let mut settings = self.settings_mut();
        settings.policy.manual_min = min;
        settings.policy.manual_max = max;
        Ok(())
    }

    pub fn set_return_bpm_profiles(&self, enable: bool) {
        self.settings_mut().return_bpm_profiles = enable;
    }

    pub fn set_enable_bpm_calc(&self, enable: bool) {
        self.settings_mut().enable_bpm_calc = enable;
    }

    /// Statistics of the most recent engine result, stamped with the wall
    /// clock at read time. Profiles always come from the engine.
    pub fn beam_result(&self) -> BeamStatistics {
        let settings = self.settings();
        let acq_time = unix_now();
        if !settings.enable_bpm_calc {
            return disabled_statistics(acq_time);
        }

        let image_size = self.frames.latest_frame().map(|f| (f.width, f.height));
        match self.statistics.latest() {
            Some(result) => sanitize(&result, acq_time, image_size, settings.calibration),
            None => BeamStatistics::fallback(acq_time),
        }
    }

    /// Engine history from `from_index` on, flattened into rows of
    /// `[timestamp, intensity, x, y, fwhm_x, fwhm_y, frame_number]`.
    ///
    /// Each field is validated on its own, whatever the engine error code,
    /// and no calibration is applied.
    pub fn get_results(&self, from_index: usize) -> Vec<f64> {
        let image_size = self.frames.latest_frame().map(|f| (f.width, f.height));

        self.statistics
            .history(from_index)
            .iter()
            .flat_map(|result| history_row(result, image_size))
            .collect()
    }

    /// Raw sample at `(x, y)` in the latest frame, `-1` when there is none.
    pub fn get_pixel_intensity(&self, x: i64, y: i64) -> i64 {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return -1;
        };
        self.frames
            .latest_frame()
            .and_then(|frame| frame.pixel(x, y))
            .map_or(-1, i64::from)
    }

    pub fn counters(&self) -> PushCounters {
        self.scheduler.counters()
    }
}

fn history_row(result: &BeamResult, image_size: Option<(usize, usize)>) -> [f64; RESULT_ROW_LEN] {
    let max_width = image_size.map(|(width, _)| width as f64);
    let max_height = image_size.map(|(_, height)| height as f64);
    [
        result.timestamp,
        validate(result.beam_intensity, -1.0, DEFAULT_MIN, None),
        validate(result.beam_center_x, -1.0, DEFAULT_MIN, max_width),
        validate(result.beam_center_y, -1.0, DEFAULT_MIN, max_height),
        validate(result.beam_fwhm_x, 0.0, DEFAULT_MIN, None),
        validate(result.beam_fwhm_y, 0.0, DEFAULT_MIN, None),
        result.frame_number as f64,
    ]
}

impl<W: JpegWriter + 'static> Drop for PreviewDevice<W> {
    fn drop(&mut self) {
        if self.scheduler.is_running() {
            if let Err(e) = self.scheduler.stop() {
                warn!("Failed to stop push thread: {}", e);
            }
        }
    }
}
