//! Beam statistics module
//!
//! The statistics themselves come from an external image-processing engine.
//! This module defines the engine result, the sanitized form sent to
//! subscribers, and the rules turning one into the other.

mod provider;
mod sanitize;
pub mod types;
pub mod validate;

pub use provider::StatisticsProvider;
pub use sanitize::{disabled_statistics, sanitize};
pub use types::{BeamResult, BeamStatistics, Calibration, ENGINE_OK};
pub use validate::{validate, DEFAULT_MIN};
