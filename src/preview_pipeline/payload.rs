//! Beam-viewer payload module
//!
//! A flat little-endian record: fixed statistics prefix, then three byte
//! strings whose lengths are carried by the format tag.

mod format;
mod packer;

pub use format::{FIXED_PREFIX, FIXED_PREFIX_LEN, FormatTag};
pub use packer::{BvDataPayload, EncodedPayload, profile_bytes, profile_values};
