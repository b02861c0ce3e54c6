use std::fmt;
use std::str::FromStr;

use crate::preview_pipeline::common::error::{PreviewError, Result};

/// Field codes of the fixed prefix: d = f64, l = i64, i = i32.
pub const FIXED_PREFIX: &str = "dldddliiiidd";

/// Size in bytes of the fixed prefix.
pub const FIXED_PREFIX_LEN: usize = 8 * 8 + 4 * 4;

/// Self-describing layout tag, e.g. `dldddliiiidd24s16s5120s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatTag {
    pub profile_x_len: usize,
    pub profile_y_len: usize,
    pub image_len: usize,
}

impl FormatTag {
    pub fn new(profile_x_len: usize, profile_y_len: usize, image_len: usize) -> Self {
        Self {
            profile_x_len,
            profile_y_len,
            image_len,
        }
    }

    /// Total record size described by this tag.
    pub fn payload_len(&self) -> usize {
        FIXED_PREFIX_LEN + self.profile_x_len + self.profile_y_len + self.image_len
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}s{}s{}s",
            FIXED_PREFIX, self.profile_x_len, self.profile_y_len, self.image_len
        )
    }
}

impl FromStr for FormatTag {
    type Err = PreviewError;

    fn from_str(tag: &str) -> Result<Self> {
        let invalid = || PreviewError::InvalidFormatTag(tag.to_string());

        let lengths = tag
            .strip_prefix(FIXED_PREFIX)
            .and_then(|rest| rest.strip_suffix('s'))
            .ok_or_else(invalid)?;

        let parsed = lengths
            .split('s')
            .map(|len| {
                if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                len.parse::<usize>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>>>()?;

        match parsed.as_slice() {
            [x, y, image] => Ok(Self::new(*x, *y, *image)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_text_is_rebuilt_from_lengths() {
        let tag = FormatTag::new(24, 16, 5120);
        assert_eq!(tag.to_string(), "dldddliiiidd24s16s5120s");
        assert_eq!(tag.to_string().parse::<FormatTag>().unwrap(), tag);
        assert_eq!(tag.payload_len(), 80 + 24 + 16 + 5120);
    }

    #[test]
    fn test_empty_trailing_fields() {
        let tag: FormatTag = "dldddliiiidd0s0s0s".parse().unwrap();
        assert_eq!(tag, FormatTag::new(0, 0, 0));
        assert_eq!(tag.payload_len(), FIXED_PREFIX_LEN);
    }

    #[test]
    fn test_malformed_tags_are_rejected() {
        for tag in [
            "",
            "dldddliiiidd",
            "dldddliiiidd1s2s",
            "dldddliiiidd1s2s3",
            "dldddliiiidd1s2s3s4s",
            "ddddddddddd1s2s3s",
            "dldddliiiidd1s-2s3s",
            "dldddliiiidd1ss3s",
        ] {
            assert!(
                matches!(tag.parse::<FormatTag>(), Err(PreviewError::InvalidFormatTag(_))),
                "{tag} should be rejected"
            );
        }
    }
}
