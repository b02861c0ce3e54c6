//! Palette lookup tables
//!
//! Both tables are indexed directly by a 16-bit scaled intensity.

const ENTRIES: usize = 1 << 16;
const QUARTER: usize = ENTRIES / 4;

/// Which of the two tables to map through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    Grey,
    /// blue → cyan → green → yellow → red
    Thermal,
}

impl PaletteKind {
    pub fn for_color_map(color_map: bool) -> Self {
        if color_map { Self::Thermal } else { Self::Grey }
    }
}

/// Immutable greyscale and thermal RGB tables, 65536 entries each.
pub struct PaletteTable {
    grey: Vec<[u8; 3]>,
    thermal: Vec<[u8; 3]>,
}

impl PaletteTable {
    pub fn new() -> Self {
        let grey = (0..ENTRIES)
            .map(|i| {
                let level = ramp_up(i, ENTRIES);
                [level, level, level]
            })
            .collect();

        let thermal = (0..ENTRIES)
            .map(|i| {
                let offset = i % QUARTER;
                let up = ramp_up(offset, QUARTER);
                let down = ramp_down(offset, QUARTER);
                match i / QUARTER {
                    0 => [0, up, 255],
                    1 => [0, 255, down],
                    2 => [up, 255, 0],
                    _ => [255, down, 0],
                }
            })
            .collect();

        Self { grey, thermal }
    }

    pub fn lookup(&self, value: u16, kind: PaletteKind) -> [u8; 3] {
        self.table(kind)[value as usize]
    }

    /// Maps scaled intensities to interleaved RGB bytes.
    pub fn apply(&self, scaled: &[u16], kind: PaletteKind) -> Vec<u8> {
        let table = self.table(kind);
        let mut rgb = Vec::with_capacity(scaled.len() * 3);
        for &value in scaled {
            rgb.extend_from_slice(&table[value as usize]);
        }
        rgb
    }

    fn table(&self, kind: PaletteKind) -> &[[u8; 3]] {
        match kind {
            PaletteKind::Grey => &self.grey,
            PaletteKind::Thermal => &self.thermal,
        }
    }
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PaletteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteTable")
            .field("entries", &ENTRIES)
            .finish()
    }
}

// i-th of n evenly spaced points from 0 to 255, truncated
fn ramp_up(i: usize, n: usize) -> u8 {
    (255.0 * i as f64 / (n - 1) as f64) as u8
}

// i-th of n evenly spaced points from 255 down to 0, truncated
fn ramp_down(i: usize, n: usize) -> u8 {
    (255.0 - 255.0 * i as f64 / (n - 1) as f64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grey_ramp_endpoints_and_monotonic() {
        let palette = PaletteTable::new();
        assert_eq!(palette.lookup(0, PaletteKind::Grey), [0, 0, 0]);
        assert_eq!(palette.lookup(u16::MAX, PaletteKind::Grey), [255, 255, 255]);
        assert_eq!(palette.lookup(257, PaletteKind::Grey), [1, 1, 1]);

        let mut previous = 0;
        for value in 0..=u16::MAX {
            let [r, g, b] = palette.lookup(value, PaletteKind::Grey);
            assert!(r == g && g == b);
            assert!(r >= previous);
            previous = r;
        }
    }

    #[test]
    fn test_thermal_quartile_boundaries() {
        let palette = PaletteTable::new();
        let at = |v: usize| palette.lookup(v as u16, PaletteKind::Thermal);

        assert_eq!(at(0), [0, 0, 255]);
        assert_eq!(at(QUARTER - 1), [0, 255, 255]);
        assert_eq!(at(QUARTER), [0, 255, 255]);
        assert_eq!(at(2 * QUARTER - 1), [0, 255, 0]);
        assert_eq!(at(2 * QUARTER), [0, 255, 0]);
        assert_eq!(at(3 * QUARTER - 1), [255, 255, 0]);
        assert_eq!(at(3 * QUARTER), [255, 255, 0]);
        assert_eq!(at(ENTRIES - 1), [255, 0, 0]);
    }

    #[test]
    fn test_thermal_holds_one_channel_per_quartile() {
        let palette = PaletteTable::new();
        for value in (0..ENTRIES).step_by(97) {
            let [r, g, b] = palette.lookup(value as u16, PaletteKind::Thermal);
            match value / QUARTER {
                0 => assert_eq!((r, b), (0, 255)),
                1 => assert_eq!((r, g), (0, 255)),
                2 => assert_eq!((g, b), (255, 0)),
                _ => assert_eq!((r, b), (255, 0)),
            }
        }
    }

    #[test]
    fn test_apply_interleaves_rgb() {
        let palette = PaletteTable::new();
        let rgb = palette.apply(&[0, u16::MAX], PaletteKind::Thermal);
        assert_eq!(rgb, vec![0, 0, 255, 255, 0, 0]);
        assert_eq!(PaletteKind::for_color_map(false), PaletteKind::Grey);
    }
}
