use clap::ValueEnum;

use crate::color::ColorDepth;

pub const TWO_PI: f32 = 6.283_185_3;
const DEG_TO_RAD: f32 = 0.017_453_292;

// Perceptual ramp tables, indexed by shade.
const CLASSIC_LUM: [f32; 4] = [1.0 / 6.0, 2.0 / 6.0, 4.0 / 6.0, 5.0 / 6.0];
const CLASSIC_SAT: [f32; 4] = [1.0 / 6.0, 2.0 / 6.0, 2.0 / 6.0, 1.0 / 6.0];

const COMPACT_LUM: [f32; 3] = [1.0 / 4.0, 2.0 / 4.0, 3.0 / 4.0];
const COMPACT_SAT: [f32; 3] = [1.0 / 6.0, 2.0 / 6.0, 1.0 / 6.0];

// Compact hue phases are a fixed degree table rather than a computed wheel.
const COMPACT_HUE_DEGREES: [f32; 6] = [0.0, 60.0, 120.0, 180.0, 240.0, 300.0];

/// On-disk format variant. The two variants are incompatible (packing
/// widths, palette counts, and the slot-0 convention all differ), so they
/// stay behind an explicit selection and are never mixed in one file.
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Profile {
    /// 15-bit color, 16 palettes of 16 slots, 4-bit cell indices.
    /// Slot 0 of each palette is the transparency marker (keyed to cyan).
    Classic,
    /// 12-bit color, 7 palettes of 4 slots, 2-bit cell indices.
    /// Slot 0 of palette 0 is the reserved no-match sentinel.
    Compact,
}

impl Profile {
    pub fn depth(self) -> ColorDepth {
        match self {
            Profile::Classic => ColorDepth::Rgb555,
            Profile::Compact => ColorDepth::Rgb444,
        }
    }

    pub fn num_shades(self) -> usize {
        self.lum_table().len()
    }

    pub fn num_hues(self) -> usize {
        match self {
            Profile::Classic => 15,
            Profile::Compact => COMPACT_HUE_DEGREES.len(),
        }
    }

    // Classic: 15 hue palettes plus one extra that repeats the greys.
    // Compact: one grey palette plus one palette per hue.
    pub fn num_palettes(self) -> usize {
        self.num_hues() + 1
    }

    pub fn colors_per_palette(self) -> usize {
        match self {
            Profile::Classic => 16,
            Profile::Compact => 4,
        }
    }

    /// Cell index width on disk: the minimum width that losslessly covers
    /// the slot range, independent of the color depth.
    pub fn index_bits(self) -> usize {
        match self {
            Profile::Classic => 4,
            Profile::Compact => 2,
        }
    }

    pub fn lum_table(self) -> &'static [f32] {
        match self {
            Profile::Classic => &CLASSIC_LUM,
            Profile::Compact => &COMPACT_LUM,
        }
    }

    pub fn sat_table(self) -> &'static [f32] {
        match self {
            Profile::Classic => &CLASSIC_SAT,
            Profile::Compact => &COMPACT_SAT,
        }
    }

    /// Chroma phase for a hue, in radians.
    pub fn hue_angle(self, hue: usize) -> f32 {
        match self {
            Profile::Classic => (TWO_PI * hue as f32) / 15.0,
            Profile::Compact => COMPACT_HUE_DEGREES[hue] * DEG_TO_RAD,
        }
    }

    /// Container signature tags, concatenated and null-padded to 16 bytes
    /// when written.
    pub fn signature_tags(self) -> [&'static str; 3] {
        match self {
            Profile::Classic => ["NSKM", "GRAPHICS", "v1.0"],
            Profile::Compact => ["NSKM", "GFX", "v0.5"],
        }
    }
}
