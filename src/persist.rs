use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::profile::Profile;
use crate::state::{GraphicsState, PaletteTable};

/// Writes the palette listing in GIMP palette format. Downstream tools
/// parse the color lines as fixed columns, so the space padding is part of
/// the contract, not cosmetics.
pub fn save_palette_gpl(path: &Path, palettes: &PaletteTable) -> Result<()> {
    info!("Saving palette listing to {}", path.display());
    let text = render_palette_gpl(palettes);
    std::fs::write(path, &text)
        .with_context(|| format!("Unable to write palette file {}", path.display()))?;
    Ok(())
}

pub fn render_palette_gpl(palettes: &PaletteTable) -> String {
    let depth = palettes.profile().depth();
    let mut out = String::new();
    out.push_str("GIMP Palette\n");
    out.push_str("Name: NSKM GUI Colors\n");
    out.push_str("Columns: 16\n\n");
    for &word in palettes.words() {
        let (r, g, b) = depth.unpack(word);
        writeln!(out, "{r:>3} {g:>3} {b:>3}\t({r}, {g}, {b})").unwrap();
    }
    out
}

/// Writes the packed texture container: 16-byte signature, palette block,
/// cell block, in that order with no length prefixes. Block sizes are fixed
/// by the profile and known to both writer and reader.
pub fn save_texture_dat(path: &Path, state: &GraphicsState) -> Result<()> {
    info!("Saving packed texture to {}", path.display());
    let data = encode_texture(state);
    std::fs::write(path, &data)
        .with_context(|| format!("Unable to write output file {}", path.display()))?;
    Ok(())
}

pub fn encode_texture(state: &GraphicsState) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&signature(state.profile));
    encode_palettes(state.profile, state.palettes.words(), &mut out);
    encode_cells(state.profile, state.cells.bytes(), &mut out);
    out
}

pub fn signature(profile: Profile) -> [u8; 16] {
    let mut sig = [0u8; 16];
    let mut pos = 0;
    for tag in profile.signature_tags() {
        sig[pos..pos + tag.len()].copy_from_slice(tag.as_bytes());
        pos += tag.len();
    }
    sig
}

fn encode_palettes(profile: Profile, words: &[u16], out: &mut Vec<u8>) {
    match profile {
        Profile::Classic => {
            // Two bytes per word, top bit of the high byte forced to zero.
            for &word in words {
                out.push((word >> 8) as u8 & 0x7F);
                out.push(word as u8);
            }
        }
        Profile::Compact => {
            // Two 12-bit words per three bytes.
            debug_assert!(words.len() % 2 == 0);
            for (a, b) in words.iter().copied().tuples() {
                out.push((a >> 4) as u8);
                out.push((((a & 0x0F) << 4) | (b >> 8)) as u8);
                out.push(b as u8);
            }
        }
    }
}

// The first logical index always occupies the most significant bits of the
// byte, at either width.
fn encode_cells(profile: Profile, cells: &[u8], out: &mut Vec<u8>) {
    match profile {
        Profile::Classic => {
            for (c0, c1) in cells.iter().copied().tuples() {
                out.push((c0 & 0x0F) << 4 | (c1 & 0x0F));
            }
        }
        Profile::Compact => {
            for (c0, c1, c2, c3) in cells.iter().copied().tuples() {
                out.push((c0 & 0x03) << 6 | (c1 & 0x03) << 4 | (c2 & 0x03) << 2 | (c3 & 0x03));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;

    fn generated_state(profile: Profile) -> GraphicsState {
        let mut state = GraphicsState::new(profile);
        palette::generate(&mut state.palettes);
        state
    }

    #[test]
    fn signatures() {
        assert_eq!(&signature(Profile::Classic), b"NSKMGRAPHICSv1.0");
        assert_eq!(&signature(Profile::Compact), b"NSKMGFXv0.5\0\0\0\0\0");
    }

    #[test]
    fn container_sizes_are_fixed() {
        // classic: 16 + 256 words * 2 + 10240 indices / 2
        let classic = encode_texture(&generated_state(Profile::Classic));
        assert_eq!(classic.len(), 16 + 512 + 5120);
        // compact: 16 + 28 words * 3/2 + 10240 indices / 4
        let compact = encode_texture(&generated_state(Profile::Compact));
        assert_eq!(compact.len(), 16 + 42 + 2560);
    }

    #[test]
    fn classic_palette_words_drop_the_top_bit() {
        let state = generated_state(Profile::Classic);
        let data = encode_texture(&state);
        // Slot 2 of palette 0 is white, 0x7FFF.
        assert_eq!(data[16 + 4], 0x7F);
        assert_eq!(data[16 + 5], 0xFF);
        assert!(data[16..16 + 512].iter().step_by(2).all(|&b| b & 0x80 == 0));
    }

    #[test]
    fn compact_palette_words_pack_two_into_three_bytes() {
        let mut out = Vec::new();
        encode_palettes(Profile::Compact, &[0x0ABC, 0x0DEF], &mut out);
        assert_eq!(out, [0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn cell_indices_pack_msb_first() {
        let mut out = Vec::new();
        encode_cells(Profile::Classic, &[0x1, 0x2], &mut out);
        assert_eq!(out, [0x12]);

        let mut out = Vec::new();
        encode_cells(Profile::Compact, &[1, 2, 3, 0], &mut out);
        assert_eq!(out, [0b01_10_11_00]);
    }

    #[test]
    fn gpl_listing_has_fixed_columns() {
        let state = generated_state(Profile::Classic);
        let text = render_palette_gpl(&state.palettes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "GIMP Palette");
        assert_eq!(lines[1], "Name: NSKM GUI Colors");
        assert_eq!(lines[2], "Columns: 16");
        assert_eq!(lines[3], "");
        // One line per slot, after the header.
        assert_eq!(lines.len(), 4 + 256);
        // Slot 0 (black) and slot 2 (white) show the padding rule.
        assert_eq!(lines[4], "  0   0   0\t(0, 0, 0)");
        assert_eq!(lines[6], "255 255 255\t(255, 255, 255)");
    }
}
