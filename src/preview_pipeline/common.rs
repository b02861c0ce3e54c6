//! Common utilities module
//!
//! This module contains shared utilities used across the preview pipeline.

pub mod error;

pub use error::{PreviewError, Result};
