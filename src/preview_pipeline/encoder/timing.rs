use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Per-step durations of one render pass, in execution order.
#[derive(Debug, Default)]
pub struct RenderTimings {
    steps: Vec<StepTiming>,
}

impl RenderTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, timer: Timer) {
        self.steps.push(timer.stop());
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Summed over repeats of the same step.
    pub fn get_step(&self, name: &str) -> Option<Duration> {
        let mut matching = self.steps.iter().filter(|s| s.name == name).peekable();
        matching.peek()?;
        Some(matching.map(|s| s.duration).sum())
    }

    pub fn slowest(&self) -> Option<StepTiming> {
        self.steps.iter().copied().max_by_key(|s| s.duration)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        let total_ms = self.total_duration().as_secs_f64() * 1000.0;
        let breakdown = self
            .steps
            .iter()
            .map(|s| format!("{}={:.3}ms", s.name, s.duration.as_secs_f64() * 1000.0))
            .collect::<Vec<_>>()
            .join(" ");
        let slowest = self.slowest().map_or("none", |s| s.name);
        debug!(total_ms, slowest, "Render steps: {}", breakdown);
    }
}

pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn stop(self) -> StepTiming {
        StepTiming {
            name: self.name,
            duration: self.start.elapsed(),
        }
    }
}
