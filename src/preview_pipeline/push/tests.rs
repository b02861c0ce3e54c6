use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::preview_pipeline::common::error::{PreviewError, Result};
use crate::preview_pipeline::frame::Roi;
use crate::preview_pipeline::payload::{BvDataPayload, EncodedPayload};
use crate::preview_pipeline::push::{PayloadSource, PushScheduler, SchedulerState, Subscriber};
use crate::preview_pipeline::stats::BeamStatistics;

/// Returns a payload stamped with an increasing frame number.
#[derive(Default)]
struct CountingSource {
    renders: AtomicU64,
    fail_first: bool,
}

impl PayloadSource for CountingSource {
    fn render_latest(&self) -> Result<EncodedPayload> {
        let call = self.renders.fetch_add(1, Ordering::SeqCst);
        if self.fail_first && call == 0 {
            return Err(PreviewError::EncodeError("Mock encode error".to_string()));
        }
        let payload = BvDataPayload::new(
            call as i64,
            &BeamStatistics::fallback(0.0),
            Roi::default(),
            Vec::new(),
            Vec::new(),
            vec![0xFF, 0xD8],
        );
        Ok(payload.pack())
    }
}

#[derive(Default)]
struct RecordingSubscriber {
    received: Mutex<Vec<(Vec<u8>, String)>>,
}

impl RecordingSubscriber {
    fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl Subscriber for RecordingSubscriber {
    fn emit(&self, payload: &[u8], format: &str) {
        self.received
            .lock()
            .unwrap()
            .push((payload.to_vec(), format.to_string()));
    }
}

fn started(interval: Duration) -> (PushScheduler, Arc<CountingSource>, Arc<RecordingSubscriber>) {
    let source = Arc::new(CountingSource::default());
    let subscriber = Arc::new(RecordingSubscriber::default());
    let mut scheduler = PushScheduler::new(interval);
    scheduler.start(source.clone(), subscriber.clone()).unwrap();
    (scheduler, source, subscriber)
}

#[test]
fn test_lifecycle_states_and_misuse() {
    let mut scheduler = PushScheduler::default();
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert!(matches!(scheduler.stop(), Err(PreviewError::SchedulerNotRunning)));

    let source = Arc::new(CountingSource::default());
    let subscriber = Arc::new(RecordingSubscriber::default());
    scheduler.start(source.clone(), subscriber.clone()).unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Running);
    assert!(matches!(
        scheduler.start(source.clone(), subscriber.clone()),
        Err(PreviewError::SchedulerAlreadyRunning)
    ));

    scheduler.stop().unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert!(matches!(scheduler.stop(), Err(PreviewError::SchedulerNotRunning)));

    // a stopped scheduler can be armed again
    scheduler.start(source, subscriber).unwrap();
    scheduler.stop().unwrap();
}

#[test]
fn test_burst_inside_window_emits_at_most_once() {
    let (mut scheduler, _source, subscriber) = started(Duration::from_millis(40));

    let notifier = scheduler.notifier();
    for _ in 0..100 {
        notifier.on_frame();
    }
    thread::sleep(Duration::from_millis(100));
    scheduler.stop().unwrap();

    assert!(subscriber.count() <= 1);
    assert_eq!(scheduler.counters().notifications, 100);
}

#[test]
fn test_burst_after_window_coalesces_to_one_render() {
    let (mut scheduler, source, subscriber) = started(Duration::from_millis(500));
    thread::sleep(Duration::from_millis(550));

    for _ in 0..100 {
        scheduler.on_frame();
    }
    thread::sleep(Duration::from_millis(150));
    scheduler.stop().unwrap();

    assert_eq!(subscriber.count(), 1);
    assert_eq!(source.renders.load(Ordering::SeqCst), 1);
}

#[test]
fn test_spaced_notifications_are_throttled_to_window() {
    let (mut scheduler, _source, subscriber) = started(Duration::from_millis(40));

    let notifier = scheduler.notifier();
    for _ in 0..20 {
        thread::sleep(Duration::from_millis(50));
        notifier.on_frame();
    }
    thread::sleep(Duration::from_millis(20));
    scheduler.stop().unwrap();

    let emitted = subscriber.count();
    assert!((19..=21).contains(&emitted), "emitted {emitted}");
}

#[test]
fn test_stop_without_frames_is_prompt() {
    let (mut scheduler, _source, subscriber) = started(Duration::from_millis(40));
    thread::sleep(Duration::from_millis(20));

    let started_at = Instant::now();
    scheduler.stop().unwrap();
    assert!(started_at.elapsed() < Duration::from_millis(200));
    assert_eq!(subscriber.count(), 0);
}

#[test]
fn test_render_failure_does_not_kill_push_thread() {
    let source = Arc::new(CountingSource {
        fail_first: true,
        ..CountingSource::default()
    });
    let subscriber = Arc::new(RecordingSubscriber::default());
    let mut scheduler = PushScheduler::new(Duration::from_millis(1));
    scheduler.start(source.clone(), subscriber.clone()).unwrap();

    thread::sleep(Duration::from_millis(10));
    scheduler.on_frame();
    thread::sleep(Duration::from_millis(30));
    scheduler.on_frame();
    thread::sleep(Duration::from_millis(30));
    scheduler.stop().unwrap();

    assert_eq!(source.renders.load(Ordering::SeqCst), 2);
    assert_eq!(subscriber.count(), 1);
    let counters = scheduler.counters();
    assert_eq!((counters.failed, counters.emitted), (1, 1));
}

#[test]
fn test_emitted_payload_carries_its_format() {
    let (mut scheduler, _source, subscriber) = started(Duration::from_millis(1));
    thread::sleep(Duration::from_millis(10));
    scheduler.on_frame();
    thread::sleep(Duration::from_millis(30));
    scheduler.stop().unwrap();

    let received = subscriber.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let (bytes, format) = &received[0];
    assert_eq!(format, "dldddliiiidd0s0s2s");
    let decoded = BvDataPayload::unpack(bytes, &format.parse().unwrap()).unwrap();
    assert_eq!(decoded.jpeg, vec![0xFF, 0xD8]);
}

#[test]
fn test_drop_joins_running_thread() {
    let (scheduler, source, subscriber) = started(Duration::from_millis(40));
    drop(scheduler);

    // the push thread held the only other references
    assert_eq!(Arc::strong_count(&source), 1);
    assert_eq!(Arc::strong_count(&subscriber), 1);
}
