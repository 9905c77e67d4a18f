use crate::profile::Profile;

pub type ColorValue = u8; // 8-bit channel value (0-255)
pub type ColorRGB = (ColorValue, ColorValue, ColorValue);

pub const CELL_DIM: usize = 8; // Cells are 8x8 pixels
pub const PIXELS_PER_CELL: usize = CELL_DIM * CELL_DIM;
pub const NUM_CELLS: usize = 160; // 16 * 10

/// Packed palette words for every palette, in storage order
/// (palette-major, then slot).
pub struct PaletteTable {
    profile: Profile,
    words: Vec<u16>,
}

impl PaletteTable {
    pub fn new(profile: Profile) -> Self {
        PaletteTable {
            profile,
            words: vec![0; profile.num_palettes() * profile.colors_per_palette()],
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn reset(&mut self) {
        self.words.fill(0);
    }

    pub fn get(&self, palette: usize, slot: usize) -> u16 {
        self.words[palette * self.profile.colors_per_palette() + slot]
    }

    pub fn set(&mut self, palette: usize, slot: usize, value: u16) {
        let idx = palette * self.profile.colors_per_palette() + slot;
        self.words[idx] = value;
    }

    /// All slots of one palette, in slot order.
    pub fn palette(&self, palette: usize) -> &[u16] {
        let per = self.profile.colors_per_palette();
        &self.words[palette * per..(palette + 1) * per]
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }
}

/// Palette-index bytes for the whole tile grid, one 64-byte region per cell.
/// The grid has fixed capacity; images smaller than the capacity leave the
/// trailing cells zeroed.
pub struct CellGrid {
    cells: Vec<u8>,
}

impl CellGrid {
    pub fn new() -> Self {
        CellGrid {
            cells: vec![0; NUM_CELLS * PIXELS_PER_CELL],
        }
    }

    pub fn reset(&mut self) {
        self.cells.fill(0);
    }

    pub fn set(&mut self, index: usize, value: u8) {
        self.cells[index] = value;
    }

    pub fn bytes(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for CellGrid {
    fn default() -> Self {
        CellGrid::new()
    }
}

/// Owned pipeline state passed through the stages: reset once per run,
/// populated once, then serialized. Single-threaded by design; nothing here
/// is safe to share without external synchronization.
pub struct GraphicsState {
    pub profile: Profile,
    pub palettes: PaletteTable,
    pub cells: CellGrid,
}

impl GraphicsState {
    pub fn new(profile: Profile) -> Self {
        GraphicsState {
            profile,
            palettes: PaletteTable::new(profile),
            cells: CellGrid::new(),
        }
    }

    pub fn reset(&mut self) {
        self.palettes.reset();
        self.cells.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_start_zeroed_and_reset_to_zero() {
        let mut state = GraphicsState::new(Profile::Classic);
        assert!(state.palettes.words().iter().all(|&w| w == 0));
        assert_eq!(state.cells.bytes().len(), NUM_CELLS * PIXELS_PER_CELL);

        state.palettes.set(3, 7, 0x1234);
        state.cells.set(99, 9);
        state.reset();
        assert!(state.palettes.words().iter().all(|&w| w == 0));
        assert!(state.cells.bytes().iter().all(|&c| c == 0));
    }

    #[test]
    fn palette_slice_tracks_storage_order() {
        let mut table = PaletteTable::new(Profile::Compact);
        table.set(2, 3, 0x0FFF);
        assert_eq!(table.palette(2)[3], 0x0FFF);
        assert_eq!(table.words()[2 * 4 + 3], 0x0FFF);
    }
}
