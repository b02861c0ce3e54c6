//! JPEG writing module
//!
//! The codec sits behind [`JpegWriter`] so a faster native encoder can be
//! swapped in; outputs need not be byte-identical across writers.

mod writer;
mod standard_jpeg_writer;

pub use writer::JpegWriter;
pub use standard_jpeg_writer::StandardJpegWriter;
