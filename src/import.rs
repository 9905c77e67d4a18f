// Minimal TGA reader for the supported subset: uncompressed truecolor
// (type 2), no colormap, 24 or 32 bpp, tile-aligned dimensions. Anything
// else is a hard parse failure.
use anyhow::{bail, ensure, Context, Result};
use log::info;
use std::path::Path;

use crate::state::{ColorRGB, CELL_DIM};

/// Decoded truecolor image. Rows are stored top-down regardless of which
/// corner the file's origin was in.
pub struct SourceImage {
    pub width: usize,
    pub height: usize,
    pub bytes_per_pixel: usize,
    pub data: Vec<u8>,
}

impl SourceImage {
    /// Channels for the pixel at a row-major index. TGA stores them as BGR.
    pub fn rgb(&self, pixel_index: usize) -> ColorRGB {
        let offset = pixel_index * self.bytes_per_pixel;
        (
            self.data[offset + 2],
            self.data[offset + 1],
            self.data[offset],
        )
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn read_u8(&mut self) -> Result<u8> {
        ensure!(self.pos < self.data.len(), "unexpected end of TGA file");
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn read_u16(&mut self) -> Result<u16> {
        ensure!(self.pos + 2 <= self.data.len(), "unexpected end of TGA file");
        let b0 = self.data[self.pos] as u16;
        let b1 = self.data[self.pos + 1] as u16;
        self.pos += 2;
        Ok(b0 | b1 << 8)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        ensure!(
            self.pos + n <= self.data.len(),
            "unexpected end of TGA file"
        );
        self.pos += n;
        Ok(())
    }

    fn read_n(&mut self, n: usize) -> Result<&'a [u8]> {
        ensure!(
            self.pos + n <= self.data.len(),
            "unexpected end of TGA file"
        );
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

pub fn load_texture_tga(path: &Path) -> Result<SourceImage> {
    info!("Reading texture from {}", path.display());
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to open TGA file: {}", path.display()))?;
    decode_tga(&bytes)
}

pub fn decode_tga(bytes: &[u8]) -> Result<SourceImage> {
    let mut reader = Reader {
        data: bytes,
        pos: 0,
    };

    let id_field_length = reader.read_u8()?;

    let color_map_type = reader.read_u8()?;
    ensure!(
        color_map_type == 0,
        "Unsupported TGA colormap type: {color_map_type}"
    );

    let image_type = reader.read_u8()?;
    ensure!(
        image_type == 2,
        "Unsupported TGA image type: {image_type} (need uncompressed truecolor)"
    );

    // 5-byte colormap specification, meaningless without a colormap.
    reader.skip(5)?;

    let _x_origin = reader.read_u16()?;
    let _y_origin = reader.read_u16()?;
    let width = reader.read_u16()? as usize;
    let height = reader.read_u16()? as usize;

    let bits_per_pixel = reader.read_u8()?;
    let bytes_per_pixel = match bits_per_pixel {
        24 => 3,
        32 => 4,
        _ => bail!("Invalid pixel bpp: {bits_per_pixel}"),
    };

    // Bit 5 of the descriptor selects a top-left origin; otherwise rows are
    // stored bottom-up.
    let descriptor = reader.read_u8()?;

    reader.skip(id_field_length as usize)?;

    ensure!(
        width > 0 && width % CELL_DIM == 0 && height > 0 && height % CELL_DIM == 0,
        "Invalid image dimensions: {width}x{height} (must be positive multiples of {CELL_DIM})"
    );

    let row_bytes = width * bytes_per_pixel;
    let mut data = vec![0u8; row_bytes * height];
    if descriptor & 0x20 != 0 {
        // Origin at top left: rows are already in top-down order.
        for m in 0..height {
            let row = reader.read_n(row_bytes)?;
            data[m * row_bytes..(m + 1) * row_bytes].copy_from_slice(row);
        }
    } else {
        // Origin at bottom left: fill rows backwards.
        for m in (0..height).rev() {
            let row = reader.read_n(row_bytes)?;
            data[m * row_bytes..(m + 1) * row_bytes].copy_from_slice(row);
        }
    }

    Ok(SourceImage {
        width,
        height,
        bytes_per_pixel,
        data,
    })
}
