// Procedural palette generation from the perceptual ramp tables. This is a
// pure function of the profile: no inputs, deterministic output, and the
// table is reset first so regenerating is idempotent.
use log::info;

use crate::color::{yiq_to_rgb, ColorDepth};
use crate::profile::Profile;
use crate::state::{ColorRGB, PaletteTable};

pub fn generate(table: &mut PaletteTable) {
    table.reset();
    match table.profile() {
        Profile::Classic => generate_classic(table),
        Profile::Compact => generate_compact(table),
    }
    info!(
        "Generated {} palettes of {} colors.",
        table.profile().num_palettes(),
        table.profile().colors_per_palette()
    );
}

// Shade `n` of hue `m` in YIQ: luminance from the ramp table, chroma as
// saturation rotated to the hue's phase angle. Trig runs in f64 and the
// products narrow back to f32; changing this would shift shipped palettes.
fn hue_shade(profile: Profile, hue: usize, shade: usize) -> ColorRGB {
    let theta = profile.hue_angle(hue) as f64;
    let sat = profile.sat_table()[shade] as f64;
    let y = profile.lum_table()[shade];
    let i = (sat * theta.cos()) as f32;
    let q = (sat * theta.sin()) as f32;
    yiq_to_rgb(y, i, q)
}

fn grey_shade(profile: Profile, shade: usize) -> ColorRGB {
    let c = (profile.lum_table()[shade] * 255.0 + 0.5) as u8;
    (c, c, c)
}

fn generate_classic(table: &mut PaletteTable) {
    let profile = Profile::Classic;
    let depth = ColorDepth::Rgb555;

    // Black and white in every palette. Slot 0 stays zero: it is the
    // transparency marker and never holds a real color.
    for m in 0..profile.num_palettes() {
        table.set(m, 1, depth.pack((0, 0, 0)));
        table.set(m, 2, depth.pack((255, 255, 255)));
    }

    // Grey ramp in palette 0, slots 4-7.
    for n in 0..profile.num_shades() {
        table.set(0, 4 + n, depth.pack(grey_shade(profile, n)));
    }

    // Copy the greys to the other palettes.
    for m in 1..profile.num_palettes() {
        for n in 0..profile.num_shades() {
            let value = table.get(0, 4 + n);
            table.set(m, 4 + n, value);
        }
    }

    // One hue ramp per palette, slots 8-11.
    for m in 0..profile.num_hues() {
        for n in 0..profile.num_shades() {
            table.set(m, 8 + n, depth.pack(hue_shade(profile, m, n)));
        }
    }

    // There is no 16th hue; the last palette takes the greys again.
    let last = profile.num_palettes() - 1;
    for n in 0..profile.num_shades() {
        let value = table.get(0, 4 + n);
        table.set(last, 8 + n, value);
    }

    // Remaining slots (3 and 12-15) stay black per the edge policy.
}

fn generate_compact(table: &mut PaletteTable) {
    let profile = Profile::Compact;
    let depth = ColorDepth::Rgb444;

    // Grey ramp in palette 0, slots 1-3. Slot 0 of every palette stays
    // zero; palette 0's doubles as the no-match sentinel.
    for n in 0..profile.num_shades() {
        table.set(0, 1 + n, depth.pack(grey_shade(profile, n)));
    }

    // One hue ramp per remaining palette.
    for h in 0..profile.num_hues() {
        for n in 0..profile.num_shades() {
            table.set(h + 1, 1 + n, depth.pack(hue_shade(profile, h, n)));
        }
    }
}
