use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Wrong value lut_method: {0}, use log or linear instead")]
    InvalidLutMethod(String),

    #[error("Wrong values min_max: [{min}, {max}], max < min")]
    InvalidManualRange { min: u64, max: u64 },

    #[error("Wrong value min_max: [{min}, {max}], out of range [0, {limit}]")]
    ManualRangeOutOfBounds { min: u64, max: u64, limit: u64 },

    #[error("Invalid jpeg quality: {0}, expected a value from 1 to 100")]
    InvalidJpegQuality(i64),

    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u32),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Frame buffer holds {actual} samples, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Frame buffer is empty")]
    EmptyFrame,

    #[error("No frame available for preview")]
    NoFrameAvailable,

    #[error("Failed to encode JPEG image: {0}")]
    EncodeError(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid payload format tag: {0}")]
    InvalidFormatTag(String),

    #[error("Push scheduler is already running")]
    SchedulerAlreadyRunning,

    #[error("Push scheduler is not running")]
    SchedulerNotRunning,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PreviewError>;
