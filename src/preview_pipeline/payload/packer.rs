use tracing::trace;

use crate::preview_pipeline::common::error::{PreviewError, Result};
use crate::preview_pipeline::frame::Roi;
use crate::preview_pipeline::payload::format::{FIXED_PREFIX_LEN, FormatTag};
use crate::preview_pipeline::stats::BeamStatistics;

/// Decoded form of one beam-viewer record.
///
/// The image field holds raw JPEG bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct BvDataPayload {
    pub acq_time: f64,
    pub frame_number: i64,
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    pub max_intensity: i64,
    pub roi: Roi,
    pub fwhm_x: f64,
    pub fwhm_y: f64,
    pub profile_x: Vec<u8>,
    pub profile_y: Vec<u8>,
    pub jpeg: Vec<u8>,
}

/// Packed bytes together with the tag a reader needs to parse them.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPayload {
    pub bytes: Vec<u8>,
    pub format: FormatTag,
}

impl BvDataPayload {
    pub fn new(
        frame_number: i64,
        statistics: &BeamStatistics,
        roi: Roi,
        profile_x: Vec<u8>,
        profile_y: Vec<u8>,
        jpeg: Vec<u8>,
    ) -> Self {
        Self {
            acq_time: statistics.acq_time,
            frame_number,
            x: statistics.x,
            y: statistics.y,
            intensity: statistics.intensity,
            max_intensity: statistics.max_intensity as i64,
            roi,
            fwhm_x: statistics.fwhm_x,
            fwhm_y: statistics.fwhm_y,
            profile_x,
            profile_y,
            jpeg,
        }
    }

    pub fn format(&self) -> FormatTag {
        FormatTag::new(self.profile_x.len(), self.profile_y.len(), self.jpeg.len())
    }

    pub fn pack(&self) -> EncodedPayload {
        let format = self.format();
        let mut out = Vec::with_capacity(format.payload_len());

        out.extend_from_slice(&self.acq_time.to_le_bytes());
        out.extend_from_slice(&self.frame_number.to_le_bytes());
        out.extend_from_slice(&self.x.to_le_bytes());
        out.extend_from_slice(&self.y.to_le_bytes());
        out.extend_from_slice(&self.intensity.to_le_bytes());
        out.extend_from_slice(&self.max_intensity.to_le_bytes());
        out.extend_from_slice(&self.roi.x.to_le_bytes());
        out.extend_from_slice(&self.roi.y.to_le_bytes());
        out.extend_from_slice(&self.roi.width.to_le_bytes());
        out.extend_from_slice(&self.roi.height.to_le_bytes());
        out.extend_from_slice(&self.fwhm_x.to_le_bytes());
        out.extend_from_slice(&self.fwhm_y.to_le_bytes());
        out.extend_from_slice(&self.profile_x);
        out.extend_from_slice(&self.profile_y);
        out.extend_from_slice(&self.jpeg);

        trace!(len = out.len(), format = %format, "Packed payload");
        EncodedPayload { bytes: out, format }
    }

    pub fn unpack(bytes: &[u8], format: &FormatTag) -> Result<Self> {
        if bytes.len() != format.payload_len() {
            return Err(PreviewError::MalformedPayload(format!(
                "{} bytes do not match format {} ({} bytes)",
                bytes.len(),
                format,
                format.payload_len()
            )));
        }

        let mut cursor = 0usize;
        let acq_time = read_f64(bytes, &mut cursor)?;
        let frame_number = read_i64(bytes, &mut cursor)?;
        let x = read_f64(bytes, &mut cursor)?;
        let y = read_f64(bytes, &mut cursor)?;
        let intensity = read_f64(bytes, &mut cursor)?;
        let max_intensity = read_i64(bytes, &mut cursor)?;
        let roi = Roi::new(
            read_i32(bytes, &mut cursor)?,
            read_i32(bytes, &mut cursor)?,
            read_i32(bytes, &mut cursor)?,
            read_i32(bytes, &mut cursor)?,
        );
        let fwhm_x = read_f64(bytes, &mut cursor)?;
        let fwhm_y = read_f64(bytes, &mut cursor)?;
        debug_assert_eq!(cursor, FIXED_PREFIX_LEN);

        let profile_x = read_slice(bytes, &mut cursor, format.profile_x_len)?.to_vec();
        let profile_y = read_slice(bytes, &mut cursor, format.profile_y_len)?.to_vec();
        let jpeg = read_slice(bytes, &mut cursor, format.image_len)?.to_vec();

        Ok(Self {
            acq_time,
            frame_number,
            x,
            y,
            intensity,
            max_intensity,
            roi,
            fwhm_x,
            fwhm_y,
            profile_x,
            profile_y,
            jpeg,
        })
    }
}

impl EncodedPayload {
    pub fn format_string(&self) -> String {
        self.format.to_string()
    }
}

/// Serializes a profile as consecutive little-endian `i64` values.
pub fn profile_bytes(profile: &[i64]) -> Vec<u8> {
    profile.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn profile_values(bytes: &[u8]) -> Result<Vec<i64>> {
    if bytes.len() % 8 != 0 {
        return Err(PreviewError::MalformedPayload(format!(
            "profile of {} bytes is not a whole number of i64 values",
            bytes.len()
        )));
    }
    let mut cursor = 0usize;
    let mut values = Vec::with_capacity(bytes.len() / 8);
    while cursor < bytes.len() {
        values.push(read_i64(bytes, &mut cursor)?);
    }
    Ok(values)
}

fn read_slice<'a>(bytes: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8]> {
    if *cursor + len > bytes.len() {
        return Err(PreviewError::MalformedPayload(format!(
            "field of {} bytes at offset {} runs past the end",
            len, *cursor
        )));
    }
    let out = &bytes[*cursor..*cursor + len];
    *cursor += len;
    Ok(out)
}

fn read_array<const N: usize>(bytes: &[u8], cursor: &mut usize) -> Result<[u8; N]> {
    let slice = read_slice(bytes, cursor, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}

fn read_f64(bytes: &[u8], cursor: &mut usize) -> Result<f64> {
    Ok(f64::from_le_bytes(read_array(bytes, cursor)?))
}

fn read_i64(bytes: &[u8], cursor: &mut usize) -> Result<i64> {
    Ok(i64::from_le_bytes(read_array(bytes, cursor)?))
}

fn read_i32(bytes: &[u8], cursor: &mut usize) -> Result<i32> {
    Ok(i32::from_le_bytes(read_array(bytes, cursor)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> BvDataPayload {
        BvDataPayload {
            acq_time: 1.5,
            frame_number: 42,
            x: 3.25,
            y: 7.0,
            intensity: 100.0,
            max_intensity: 4095,
            roi: Roi::new(10, 20, 64, 64),
            fwhm_x: 1.1,
            fwhm_y: 2.2,
            profile_x: vec![1, 2, 3],
            profile_y: vec![4, 5],
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9],
        }
    }

    #[test]
    fn test_round_trip_reproduces_every_field() {
        let payload = sample_payload();
        let encoded = payload.pack();

        assert_eq!(encoded.format_string(), "dldddliiiidd3s2s8s");
        assert_eq!(encoded.bytes.len(), FIXED_PREFIX_LEN + 3 + 2 + 8);

        let tag: FormatTag = encoded.format_string().parse().unwrap();
        let decoded = BvDataPayload::unpack(&encoded.bytes, &tag).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(decoded.profile_x, vec![1, 2, 3]);
        assert_eq!(decoded.profile_y, vec![4, 5]);
        assert_eq!(&decoded.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_fixed_prefix_layout_is_little_endian() {
        let bytes = sample_payload().pack().bytes;

        assert_eq!(&bytes[0..8], &1.5f64.to_le_bytes());
        assert_eq!(&bytes[8..16], &42i64.to_le_bytes());
        assert_eq!(&bytes[40..48], &4095i64.to_le_bytes());
        assert_eq!(&bytes[48..52], &10i32.to_le_bytes());
        assert_eq!(&bytes[60..64], &64i32.to_le_bytes());
        assert_eq!(&bytes[72..80], &2.2f64.to_le_bytes());
        assert_eq!(&bytes[80..83], &[1, 2, 3]);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let encoded = sample_payload().pack();
        let wrong = FormatTag::new(3, 2, 9);
        assert!(matches!(
            BvDataPayload::unpack(&encoded.bytes, &wrong),
            Err(PreviewError::MalformedPayload(_))
        ));
        assert!(matches!(
            BvDataPayload::unpack(&encoded.bytes[..40], &FormatTag::new(0, 0, 0)),
            Err(PreviewError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_new_takes_scalars_from_statistics() {
        let mut stats = BeamStatistics::fallback(9.0);
        stats.max_intensity = 250.7;
        let payload = BvDataPayload::new(5, &stats, Roi::default(), vec![], vec![], vec![1]);

        assert_eq!(payload.acq_time, 9.0);
        assert_eq!(payload.x, -1.0);
        assert_eq!(payload.max_intensity, 250);
        assert_eq!(payload.format(), FormatTag::new(0, 0, 1));
    }

    #[test]
    fn test_profile_bytes_are_i64_values() {
        let bytes = profile_bytes(&[1, -2, 300]);
        assert_eq!(bytes.len(), 24);
        assert_eq!(profile_values(&bytes).unwrap(), vec![1, -2, 300]);
        assert!(profile_values(&bytes[..5]).is_err());
        assert!(profile_values(&[]).unwrap().is_empty());
    }
}
