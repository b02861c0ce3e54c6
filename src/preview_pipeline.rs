//! Beam-viewer live preview pipeline
//!
//! This module turns processed detector frames into false-colour JPEG previews
//! with beam statistics, packs them into the beam-viewer wire record and pushes
//! them to subscribers at a throttled rate.

pub mod common;
pub mod config;
pub mod device;
pub mod encoder;
pub mod frame;
pub mod jpeg;
pub mod palette;
pub mod payload;
pub mod push;
pub mod scaling;
pub mod stats;

pub use common::{
    PreviewError,
    Result,
};

pub use config::PreviewConfig;

pub use device::{
    DeviceState,
    PreviewDevice,
    PreviewSettings,
};

pub use encoder::{
    FrameEncoder,
    RenderedFrame,
};

pub use frame::{
    BitDepth,
    LatestFrame,
    RawFrame,
    Roi,
};

pub use jpeg::{
    JpegWriter,
    StandardJpegWriter,
};

pub use palette::{
    PaletteKind,
    PaletteTable,
};

pub use payload::{
    BvDataPayload,
    EncodedPayload,
    FormatTag,
};

pub use push::{
    PushScheduler,
    Subscriber,
};

pub use scaling::{
    LutMethod,
    ScalingPolicy,
    normalize,
};

pub use stats::{
    BeamResult,
    BeamStatistics,
    Calibration,
    StatisticsProvider,
    validate,
};
