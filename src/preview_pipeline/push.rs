//! Throttled push module
//!
//! A single consumer thread turns bursts of frame notifications into at most
//! one emitted payload per time window. Notifications inside the window are
//! dropped, never queued.

mod scheduler;
mod subscriber;

#[cfg(test)]
mod tests;

pub use scheduler::{DEFAULT_MIN_INTERVAL, FrameNotifier, PushCounters, PushScheduler, SchedulerState};
pub use subscriber::{PayloadSource, Subscriber};
