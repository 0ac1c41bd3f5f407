//! Planar (bitplane) images and the Amiga color palette
//!
//! A planar image of depth `d` is stored as `d` consecutive bitplanes. Each
//! plane holds `height` rows of `ceil(width / 8)` bytes, most significant bit
//! first, so the leftmost pixel of a byte is bit 7. Plane `b` supplies bit `b`
//! of every pixel's palette index.

use bitvec::prelude::*;
use log::trace;

use crate::error::{DecodeError, Result};

pub const PALETTE_ENTRIES: usize = 32;
pub const PALETTE_BYTES: usize = PALETTE_ENTRIES * 2;
pub const MAX_DEPTH: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Extra-half-brite variant used by the upper 32 entries of a 64 color screen
    fn half_bright(self) -> Self {
        Color::new(self.r >> 1, self.g >> 1, self.b >> 1)
    }
}

/// The 32 hardware color registers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; PALETTE_ENTRIES],
}

impl Palette {
    /// Decode 32 entries of `0x0RGB` words. Each 4-bit channel lands in the
    /// high nibble of the 8-bit output channel.
    pub fn decode(raw: &[u8; PALETTE_BYTES]) -> Palette {
        let mut colors = [Color::default(); PALETTE_ENTRIES];
        for (color, pair) in colors.iter_mut().zip(raw.chunks_exact(2)) {
            let (hi, lo) = (pair[0], pair[1]);
            *color = Color::new((hi & 0x0F) << 4, lo & 0xF0, (lo & 0x0F) << 4);
        }
        Palette { colors }
    }

    /// Stand-in used until a bank's real palette is known
    pub fn gray_gradient() -> Palette {
        let mut colors = [Color::default(); PALETTE_ENTRIES];
        for (i, color) in colors.iter_mut().enumerate() {
            let v = (8 * i) as u8;
            *color = Color::new(v, v, v);
        }
        Palette { colors }
    }

    pub fn colors(&self) -> &[Color; PALETTE_ENTRIES] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// The `2^depth` colors a raster of that depth can reference. Depth 6
    /// screens reuse the 32 registers at half brightness for indices 32-63.
    pub fn color_table(&self, depth: u16) -> Vec<Color> {
        let depth = depth.clamp(1, MAX_DEPTH);
        let count = 1usize << depth;
        if count <= PALETTE_ENTRIES {
            return self.colors[..count].to_vec();
        }
        self.colors
            .iter()
            .copied()
            .chain(self.colors.iter().map(|c| c.half_bright()))
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::gray_gradient()
    }
}

pub fn decode_palette(raw: &[u8; PALETTE_BYTES]) -> Palette {
    Palette::decode(raw)
}

/// A still-planar image as stored in a sprite or icon bank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarImage {
    /// In pixels, already multiplied out from the stored 16-pixel word count
    pub width: usize,
    pub height: usize,
    pub depth: u16,
    pub hotspot_x: u16,
    pub hotspot_y: u16,
    pub data: Vec<u8>,
}

impl PlanarImage {
    pub fn decode(&self, palette: &Palette) -> Result<IndexedRaster> {
        decode(self.width, self.height, self.depth, &self.data, palette)
    }
}

/// Chunky pixels: one palette index per byte, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRaster {
    width: usize,
    height: usize,
    depth: u16,
    pixels: Vec<u8>,
    palette: Palette,
}

impl IndexedRaster {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        Some(&self.pixels[y * self.width..(y + 1) * self.width])
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn color_table(&self) -> Vec<Color> {
        self.palette.color_table(self.depth)
    }

    pub fn with_palette(self, palette: Palette) -> IndexedRaster {
        IndexedRaster { palette, ..self }
    }
}

/// Planar to chunky conversion
pub fn decode(
    width: usize,
    height: usize,
    depth: u16,
    planar: &[u8],
    palette: &Palette,
) -> Result<IndexedRaster> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(DecodeError::corrupt_data(format!(
            "incompatible image depth ({})",
            depth
        )));
    }

    let bytes_per_row = (width + 7) / 8;
    let plane_len = bytes_per_row * height;
    let needed = plane_len * depth as usize;
    if planar.len() < needed {
        return Err(DecodeError::corrupt_data(format!(
            "{}x{}x{} image needs {} bytes of planar data, got {}",
            width,
            height,
            depth,
            needed,
            planar.len()
        )));
    }
    trace!(
        "planar decode {}x{}x{} ({} bytes per row)",
        width,
        height,
        depth,
        bytes_per_row
    );

    let mut pixels = vec![0u8; width * height];
    if plane_len > 0 {
        for (plane, plane_data) in planar[..needed].chunks_exact(plane_len).enumerate() {
            for (y, row) in plane_data.chunks_exact(bytes_per_row).enumerate() {
                let out = &mut pixels[y * width..(y + 1) * width];
                for (x, bit) in row.view_bits::<Msb0>().iter().by_vals().take(width).enumerate() {
                    if bit {
                        out[x] |= 1 << plane;
                    }
                }
            }
        }
    }

    Ok(IndexedRaster {
        width,
        height,
        depth,
        pixels,
        palette: palette.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_leftmost_pixel_is_bit_7() {
        let raster = decode(16, 1, 1, &[0b1000_0001, 0x00], &Palette::default()).unwrap();
        assert_eq!(
            raster.row(0),
            Some(&[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0][..])
        );
    }

    #[test]
    fn test_row_out_of_range() {
        let raster = decode(16, 2, 1, &[0xFF; 4], &Palette::default()).unwrap();
        assert_eq!(raster.row(1).map(|r| r.len()), Some(16));
        assert_eq!(raster.row(2), None);

        let empty = decode(16, 0, 1, &[], &Palette::default()).unwrap();
        assert_eq!(empty.row(0), None);
    }

    #[test]
    fn test_plane_order() {
        // 16x2, depth 3. Plane 0 marks x=0, plane 1 marks x=1, plane 2 marks x=0 on row 1.
        let planar = [
            0x80, 0x00, 0x00, 0x00, // plane 0
            0x40, 0x00, 0x00, 0x00, // plane 1
            0x00, 0x00, 0x80, 0x00, // plane 2
        ];
        let raster = decode(16, 2, 3, &planar, &Palette::default()).unwrap();
        assert_eq!(raster.pixel(0, 0), Some(1));
        assert_eq!(raster.pixel(1, 0), Some(2));
        assert_eq!(raster.pixel(0, 1), Some(4));
        assert_eq!(raster.pixel(1, 1), Some(0));
        assert_eq!(raster.pixel(16, 0), None);
    }

    #[test]
    fn test_all_planes_set_gives_max_index() {
        let planar = vec![0xFF; 2 * 6];
        let raster = decode(16, 1, 6, &planar, &Palette::default()).unwrap();
        assert!(raster.pixels().iter().all(|p| *p == 63));
    }

    #[test]
    fn test_depth_bounds() {
        for depth in [0u16, 7, 8] {
            let err = decode(16, 1, depth, &[0; 32], &Palette::default()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::CorruptStream);
        }
    }

    #[test]
    fn test_short_buffer_rejected() {
        let err = decode(16, 2, 2, &[0; 7], &Palette::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStream);
    }

    #[test]
    fn test_decode_palette() {
        let mut raw = [0u8; PALETTE_BYTES];
        raw[0] = 0x0F;
        raw[1] = 0xF0;
        raw[2] = 0x01;
        raw[3] = 0x23;
        let palette = decode_palette(&raw);
        assert_eq!(palette.get(0), Some(Color::new(0xF0, 0xF0, 0x00)));
        assert_eq!(palette.get(1), Some(Color::new(0x10, 0x20, 0x30)));
        assert_eq!(palette.get(31), Some(Color::new(0, 0, 0)));
        assert_eq!(palette.get(32), None);
    }

    #[test]
    fn test_color_table_sizes() {
        let palette = Palette::gray_gradient();
        assert_eq!(palette.color_table(1).len(), 2);
        assert_eq!(palette.color_table(5).len(), 32);
        let ehb = palette.color_table(6);
        assert_eq!(ehb.len(), 64);
        assert_eq!(ehb[33], Color::new(4, 4, 4));
    }
}
