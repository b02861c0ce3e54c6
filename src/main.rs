use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use bvdata_preview_rs::logger;
use bvdata_preview_rs::preview_pipeline::{
    BeamResult, BitDepth, DeviceState, PreviewConfig, PreviewDevice, RawFrame, StatisticsProvider,
    Subscriber,
};

use tracing::{info, warn};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;
const FRAME_PERIOD: Duration = Duration::from_millis(5);
const RUN_TIME: Duration = Duration::from_secs(2);
const HISTORY_LEN: usize = 256;

/// Remembers the beam parameters each synthetic frame was generated with.
#[derive(Default)]
struct SyntheticStatistics {
    results: Mutex<VecDeque<BeamResult>>,
}

impl SyntheticStatistics {
    fn record(&self, result: BeamResult) {
        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        if results.len() == HISTORY_LEN {
            results.pop_front();
        }
        results.push_back(result);
    }
}

impl StatisticsProvider for SyntheticStatistics {
    fn result_for(&self, frame_number: i64) -> Option<BeamResult> {
        let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        results
            .iter()
            .rev()
            .find(|r| r.frame_number == frame_number)
            .cloned()
    }

    fn latest(&self) -> Option<BeamResult> {
        let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        results.back().cloned()
    }

    fn history(&self, from_index: usize) -> Vec<BeamResult> {
        let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        results.iter().skip(from_index).cloned().collect()
    }
}

struct LoggingSubscriber;

impl Subscriber for LoggingSubscriber {
    fn emit(&self, payload: &[u8], format: &str) {
        info!(bytes = payload.len(), format, "bvdata pushed");
    }
}

/// Gaussian spot drifting on a circle, 12-bit samples.
fn synthetic_frame(frame_number: i64, timestamp: f64) -> anyhow::Result<(RawFrame, BeamResult)> {
    let phase = frame_number as f64 * 0.01;
    let center_x = WIDTH as f64 / 2.0 + 60.0 * phase.cos();
    let center_y = HEIGHT as f64 / 2.0 + 40.0 * phase.sin();
    let sigma = 12.0;
    let peak = 4000.0;

    let mut data = Vec::with_capacity(WIDTH * HEIGHT);
    let mut total = 0.0;
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let dx = x as f64 - center_x;
            let dy = y as f64 - center_y;
            let value = peak * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
            total += value;
            data.push(value as u32);
        }
    }

    let fwhm = 2.0 * (2.0 * std::f64::consts::LN_2).sqrt() * sigma;
    let result = BeamResult {
        frame_number,
        timestamp,
        beam_center_x: Some(center_x),
        beam_center_y: Some(center_y),
        beam_intensity: Some(total),
        beam_fwhm_x: Some(fwhm),
        beam_fwhm_y: Some(fwhm),
        max_pixel_value: Some(peak),
        ..BeamResult::default()
    };

    let frame = RawFrame::new(WIDTH, HEIGHT, data, BitDepth::Bpp12, frame_number, timestamp)?;
    Ok((frame, result))
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting bvdata preview demo...");

    let config = match std::env::args().nth(1).or_else(|| std::env::var("BVDATA_CONFIG").ok()) {
        Some(path) => PreviewConfig::load(&path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => PreviewConfig::default(),
    };
    info!(
        "Push interval: {}ms, palette: {}",
        config.min_push_interval_ms,
        if config.color_map { "thermal" } else { "grey" }
    );

    let statistics = Arc::new(SyntheticStatistics::default());
    let mut device = PreviewDevice::new(&config, statistics.clone(), Arc::new(LoggingSubscriber))?;
    device.set_state(DeviceState::On)?;

    let start = Instant::now();
    let mut frame_number = 0i64;
    while start.elapsed() < RUN_TIME {
        let (frame, result) = synthetic_frame(frame_number, start.elapsed().as_secs_f64())?;
        statistics.record(result);
        device.process_frame(frame);
        frame_number += 1;
        thread::sleep(FRAME_PERIOD);
    }

    device.set_state(DeviceState::Off)?;

    let counters = device.counters();
    info!(
        frames = frame_number,
        emitted = counters.emitted,
        dropped = counters.dropped,
        "Acquisition finished"
    );

    match device.read_bvdata() {
        Ok((bytes, format)) => info!(bytes = bytes.len(), format = %format, "Final synchronous read"),
        Err(e) => warn!("Final read failed: {}", e),
    }

    let beam = device.beam_result();
    info!(
        "Last beam at ({:.1}, {:.1}), fwhm ({:.1}, {:.1})",
        beam.x, beam.y, beam.fwhm_x, beam.fwhm_y
    );

    Ok(())
}
