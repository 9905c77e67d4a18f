use crate::state::ColorRGB;

/// Converts a YIQ color to 8-bit RGB: f32 arithmetic, round by adding 0.5
/// and truncating, then hard clipping. The exact rounding order matters for
/// matching previously shipped palettes.
pub fn yiq_to_rgb(y: f32, i: f32, q: f32) -> ColorRGB {
    let r = (y + (i * 0.956) + (q * 0.619)) * 255.0 + 0.5;
    let g = (y - (i * 0.272) - (q * 0.647)) * 255.0 + 0.5;
    let b = (y - (i * 1.106) + (q * 1.703)) * 255.0 + 0.5;
    (clip(r), clip(g), clip(b))
}

fn clip(channel: f32) -> u8 {
    let channel = channel as i32;
    channel.clamp(0, 255) as u8
}

/// Lossy packed-color width. All palette storage and pixel matching operate
/// on these packed words, never on the original 24-bit values.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ColorDepth {
    /// 5 bits per channel (value fits in the low 15 bits of a word).
    Rgb555,
    /// 4 bits per channel (value fits in the low 12 bits of a word).
    Rgb444,
}

impl ColorDepth {
    pub fn pack(self, (r, g, b): ColorRGB) -> u16 {
        let (r, g, b) = (r as u16, g as u16, b as u16);
        match self {
            ColorDepth::Rgb555 => ((r << 7) & 0x7C00) | ((g << 2) & 0x03E0) | ((b >> 3) & 0x001F),
            ColorDepth::Rgb444 => ((r & 0xF0) << 4) | (g & 0xF0) | (b >> 4),
        }
    }

    // Reconstruction replicates each field's high bits into the low bits of
    // the 8-bit channel, so pack(unpack(w)) == w for any packed word even
    // though unpack(pack(c)) is not the identity on arbitrary 8-bit input.
    pub fn unpack(self, value: u16) -> ColorRGB {
        match self {
            ColorDepth::Rgb555 => {
                let r = ((value >> 7) & 0xF8) | ((value >> 12) & 0x07);
                let g = ((value >> 2) & 0xF8) | ((value >> 7) & 0x07);
                let b = ((value << 3) & 0xF8) | ((value >> 2) & 0x07);
                (r as u8, g as u8, b as u8)
            }
            ColorDepth::Rgb444 => {
                let r = ((value >> 8) & 0x0F) * 0x11;
                let g = ((value >> 4) & 0x0F) * 0x11;
                let b = (value & 0x0F) * 0x11;
                (r as u8, g as u8, b as u8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yiq_grey_axis() {
        assert_eq!(yiq_to_rgb(0.0, 0.0, 0.0), (0, 0, 0));
        assert_eq!(yiq_to_rgb(1.0, 0.0, 0.0), (255, 255, 255));
        assert_eq!(yiq_to_rgb(0.5, 0.0, 0.0), (128, 128, 128));
    }

    #[test]
    fn yiq_clips_every_channel_at_both_ends() {
        // i = +2 drives red far above 255; i = -2 drives it below 0 and
        // pushes green above 255.
        let (r, g, _) = yiq_to_rgb(0.5, 2.0, 0.0);
        assert_eq!(r, 255);
        assert_eq!(g, 0);
        let (r, g, _) = yiq_to_rgb(0.5, -2.0, 0.0);
        assert_eq!(r, 0);
        assert_eq!(g, 255);
        // q saturates blue in both directions.
        let (_, _, b) = yiq_to_rgb(0.5, 0.0, 2.0);
        assert_eq!(b, 255);
        let (_, _, b) = yiq_to_rgb(0.5, 0.0, -2.0);
        assert_eq!(b, 0);
    }

    #[test]
    fn pack_555_reference_values() {
        assert_eq!(ColorDepth::Rgb555.pack((0, 0, 0)), 0x0000);
        assert_eq!(ColorDepth::Rgb555.pack((255, 255, 255)), 0x7FFF);
        assert_eq!(ColorDepth::Rgb555.pack((255, 0, 0)), 0x7C00);
        assert_eq!(ColorDepth::Rgb555.pack((0, 255, 0)), 0x03E0);
        assert_eq!(ColorDepth::Rgb555.pack((0, 0, 255)), 0x001F);
    }

    #[test]
    fn pack_444_reference_values() {
        assert_eq!(ColorDepth::Rgb444.pack((255, 255, 255)), 0x0FFF);
        assert_eq!(ColorDepth::Rgb444.pack((0xAB, 0x5C, 0x0D)), 0x0A50);
    }

    #[test]
    fn unpack_replicates_high_bits() {
        assert_eq!(ColorDepth::Rgb555.unpack(0x7FFF), (255, 255, 255));
        assert_eq!(ColorDepth::Rgb444.unpack(0x0FFF), (255, 255, 255));
        assert_eq!(ColorDepth::Rgb444.unpack(0x0A50), (0xAA, 0x55, 0x00));
    }

    #[test]
    fn repacking_an_unpacked_word_is_stable() {
        for depth in [ColorDepth::Rgb555, ColorDepth::Rgb444] {
            for rgb in [(13, 200, 77), (1, 2, 3), (250, 128, 9), (255, 0, 255)] {
                let once = depth.pack(rgb);
                let again = depth.pack(depth.unpack(once));
                assert_eq!(once, again);
            }
        }
    }
}
