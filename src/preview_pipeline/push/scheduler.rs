use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use crate::preview_pipeline::common::error::{PreviewError, Result};
use crate::preview_pipeline::push::subscriber::{PayloadSource, Subscriber};

/// 25 Hz ceiling on pushed payloads.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(40);

const THREAD_NAME: &str = "bvdata-push";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    /// Held only while `stop` joins the push thread. `stop` takes
    /// `&mut self`, so callers never read it back.
    Stopping,
}

/// Running totals since the scheduler was last started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushCounters {
    pub notifications: u64,
    pub emitted: u64,
    pub dropped: u64,
    pub failed: u64,
}

struct PushState {
    new_frame_ready: bool,
    stop_requested: bool,
    last_emit: Instant,
    counters: PushCounters,
}

struct Shared {
    state: Mutex<PushState>,
    wake: Condvar,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: Mutex::new(PushState {
                new_frame_ready: false,
                stop_requested: false,
                last_emit: Instant::now(),
                counters: PushCounters::default(),
            }),
            wake: Condvar::new(),
        }
    }

    // a panicking subscriber must not wedge the producer side
    fn lock(&self) -> MutexGuard<'_, PushState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Producer-side handle. Cheap to clone and safe to call from the
/// acquisition thread: it only flips a flag and signals.
#[derive(Clone)]
pub struct FrameNotifier {
    shared: Arc<Shared>,
}

impl FrameNotifier {
    pub fn on_frame(&self) {
        let mut state = self.shared.lock();
        state.new_frame_ready = true;
        state.counters.notifications += 1;
        self.shared.wake.notify_one();
    }
}

pub struct PushScheduler {
    shared: Arc<Shared>,
    min_interval: Duration,
    worker: Option<JoinHandle<()>>,
    state: SchedulerState,
}

impl PushScheduler {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            min_interval,
            worker: None,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn notifier(&self) -> FrameNotifier {
        FrameNotifier {
            shared: self.shared.clone(),
        }
    }

    pub fn on_frame(&self) {
        self.notifier().on_frame();
    }

    pub fn counters(&self) -> PushCounters {
        self.shared.lock().counters
    }

    /// Spawns the push thread. Fails if one is already running.
    pub fn start(
        &mut self,
        source: Arc<dyn PayloadSource>,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<()> {
        if self.worker.is_some() {
            return Err(PreviewError::SchedulerAlreadyRunning);
        }

        {
            let mut state = self.shared.lock();
            state.new_frame_ready = false;
            state.stop_requested = false;
            state.last_emit = Instant::now();
            state.counters = PushCounters::default();
        }

        let shared = self.shared.clone();
        let min_interval = self.min_interval;
        let worker = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || push_loop(&shared, source.as_ref(), subscriber.as_ref(), min_interval))?;

        self.worker = Some(worker);
        self.state = SchedulerState::Running;
        info!(
            interval_ms = self.min_interval.as_millis() as u64,
            "Push scheduler started"
        );
        Ok(())
    }

    /// Asks the push thread to exit and joins it. Fails if not running.
    pub fn stop(&mut self) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            return Err(PreviewError::SchedulerNotRunning);
        };
        self.state = SchedulerState::Stopping;

        {
            let mut state = self.shared.lock();
            state.stop_requested = true;
            self.shared.wake.notify_all();
        }

        if worker.join().is_err() {
            error!("Push thread panicked");
        }
        self.state = SchedulerState::Idle;

        let counters = self.counters();
        info!(
            emitted = counters.emitted,
            dropped = counters.dropped,
            failed = counters.failed,
            "Push scheduler stopped"
        );
        Ok(())
    }
}

impl Default for PushScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl Drop for PushScheduler {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.stop();
        }
    }
}

fn push_loop(
    shared: &Shared,
    source: &dyn PayloadSource,
    subscriber: &dyn Subscriber,
    min_interval: Duration,
) {
    debug!("Push thread running");
    loop {
        let last_emit = {
            let mut state = shared.lock();
            while !state.new_frame_ready && !state.stop_requested {
                state = shared
                    .wake
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            if state.stop_requested {
                break;
            }
            state.new_frame_ready = false;
            state.last_emit
        };

        let now = Instant::now();
        if now.duration_since(last_emit) <= min_interval {
            trace!("Notification inside push window, dropped");
            shared.lock().counters.dropped += 1;
            continue;
        }

        // rendering happens outside the lock so the producer never waits on it
        match source.render_latest() {
            Ok(payload) => {
                subscriber.emit(&payload.bytes, &payload.format_string());
                let mut state = shared.lock();
                state.last_emit = now;
                state.counters.emitted += 1;
            }
            Err(e) => {
                warn!("Preview render failed: {}", e);
                shared.lock().counters.failed += 1;
            }
        }
    }
    debug!("Push thread exiting");
}
