// Maps every source pixel to a palette-0 slot index and stores it in the
// cell grid: 8x8 blocks in row-major block order, each block flattened
// row-major into one contiguous 64-byte cell region.
use anyhow::{bail, ensure, Result};
use clap::ValueEnum;
use hashbrown::HashSet;
use log::{info, warn};

use crate::import::SourceImage;
use crate::profile::Profile;
use crate::state::{CellGrid, ColorRGB, PaletteTable, CELL_DIM, NUM_CELLS, PIXELS_PER_CELL};

/// What to do with a source color that has no exact match in palette 0.
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum UnmatchedPolicy {
    /// Keep the cell byte at its previous value (zero) and warn.
    Leave,
    /// Fail the quantization pass on the first unmatched color.
    Reject,
    /// Substitute the closest palette-0 color by squared RGB distance.
    Nearest,
}

#[derive(Default, Debug)]
pub struct QuantizeReport {
    pub matched: usize,
    pub unmatched: usize,
    pub distinct_unmatched: usize,
}

pub fn quantize(
    image: &SourceImage,
    palettes: &PaletteTable,
    cells: &mut CellGrid,
    policy: UnmatchedPolicy,
) -> Result<QuantizeReport> {
    ensure!(
        image.width > 0
            && image.width % CELL_DIM == 0
            && image.height > 0
            && image.height % CELL_DIM == 0,
        "Invalid image dimensions: {}x{} (must be positive multiples of {CELL_DIM})",
        image.width,
        image.height
    );
    let num_rows = image.height / CELL_DIM;
    let num_cols = image.width / CELL_DIM;
    ensure!(
        num_rows * num_cols <= NUM_CELLS,
        "Too many cells: {}x{} needs {} of {NUM_CELLS} available",
        num_cols,
        num_rows,
        num_rows * num_cols
    );

    let profile = palettes.profile();
    let palette0 = palettes.palette(0);

    let mut report = QuantizeReport::default();
    let mut seen_unmatched: HashSet<ColorRGB> = HashSet::new();

    for m in 0..num_rows {
        for n in 0..num_cols {
            let pixel_corner = (PIXELS_PER_CELL * m * num_cols) + (CELL_DIM * n);
            let cell_corner = PIXELS_PER_CELL * (m * num_cols + n);

            for i in 0..CELL_DIM {
                for j in 0..CELL_DIM {
                    let pixel_index = pixel_corner + (CELL_DIM * i * num_cols) + j;
                    let cell_index = cell_corner + (CELL_DIM * i) + j;

                    let rgb = image.rgb(pixel_index);
                    if let Some(slot) = match_color(profile, palette0, rgb) {
                        cells.set(cell_index, slot as u8);
                        report.matched += 1;
                        continue;
                    }

                    report.unmatched += 1;
                    match policy {
                        UnmatchedPolicy::Reject => {
                            bail!(
                                "Unknown color encountered: ({}, {}, {})",
                                rgb.0,
                                rgb.1,
                                rgb.2
                            );
                        }
                        UnmatchedPolicy::Leave => {
                            if seen_unmatched.insert(rgb) {
                                warn!(
                                    "Unknown color encountered: ({}, {}, {})",
                                    rgb.0, rgb.1, rgb.2
                                );
                            }
                        }
                        UnmatchedPolicy::Nearest => {
                            let slot = nearest_slot(profile, palette0, rgb);
                            cells.set(cell_index, slot as u8);
                            if seen_unmatched.insert(rgb) {
                                warn!(
                                    "Unknown color ({}, {}, {}) substituted with slot {slot}",
                                    rgb.0, rgb.1, rgb.2
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    report.distinct_unmatched = seen_unmatched.len();
    info!(
        "Quantized {} pixels into {} cells ({} unmatched, {} distinct).",
        report.matched + report.unmatched,
        num_rows * num_cols,
        report.unmatched,
        report.distinct_unmatched
    );
    Ok(report)
}

// Exact matching over the packed value; first match wins. The classic
// profile keys slot 0 to pure cyan in the original 8-bit channels instead
// of comparing against the stored word.
fn match_color(profile: Profile, palette0: &[u16], rgb: ColorRGB) -> Option<usize> {
    let value = profile.depth().pack(rgb);
    for (k, &slot_value) in palette0.iter().enumerate() {
        if profile == Profile::Classic && k == 0 {
            if rgb == (0, 255, 255) {
                return Some(0);
            }
        } else if value == slot_value {
            return Some(k);
        }
    }
    None
}

fn nearest_slot(profile: Profile, palette0: &[u16], rgb: ColorRGB) -> usize {
    let depth = profile.depth();
    let target = depth.unpack(depth.pack(rgb));

    // Classic slot 0 is transparency; it can be matched exactly but is
    // never assigned by distance.
    let first = match profile {
        Profile::Classic => 1,
        Profile::Compact => 0,
    };

    let mut best = first;
    let mut best_dist = u32::MAX;
    for (k, &slot_value) in palette0.iter().enumerate().skip(first) {
        let dist = distance_sq(target, depth.unpack(slot_value));
        if dist < best_dist {
            best = k;
            best_dist = dist;
        }
    }
    best
}

fn distance_sq(a: ColorRGB, b: ColorRGB) -> u32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}
