//! Packed picture (`Pac.Pic.`) memory banks
//!
//! The bank starts with a screen header and a picture header, 114 bytes in
//! total. The rest is the compressed picture: an RLE stream plus the
//! POINTS/RLEDATA control streams the picture header points into.
//!
//! Decompression is not implemented. `PackedPicture::raster` returns a 1x1
//! placeholder carrying only the decoded palette, so callers must not expect
//! the real picture from it; the compressed bytes are kept in `packed_data`.

use log::{debug, warn};

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};
use crate::planar::{self, IndexedRaster, Palette, PALETTE_BYTES};

pub const HEADER_LEN: usize = 114;
pub const SCREEN_HEADER_ID: u32 = 0x1203_1990;
pub const PICTURE_HEADER_ID: u32 = 0x0607_1963;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenHeader {
    pub width: u16,
    pub height: u16,
    pub hardware_x: u16,
    pub hardware_y: u16,
    pub hardware_width: u16,
    pub hardware_height: u16,
    /// Value of the BPLCON0 register (HAM, hires, interlace)
    pub bplcon0: u16,
    /// 2 to 64, or 4096 for HAM
    pub num_colors: u16,
    pub num_bitplanes: u16,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureHeader {
    /// Offset of the picture within the screen, in bytes
    pub x_offset: u16,
    /// Offset of the picture within the screen, in lines
    pub y_offset: u16,
    /// In bytes
    pub width: u16,
    /// In line lumps
    pub height: u16,
    pub lines_per_lump: u16,
    pub num_bitplanes: u16,
    /// Relative to the picture header
    pub rledata_offset: u32,
    pub points_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPicture {
    pub screen: ScreenHeader,
    pub picture: PictureHeader,
    /// Everything after the headers, still compressed
    pub packed_data: Vec<u8>,
}

impl PackedPicture {
    pub fn parse(payload: &[u8]) -> Result<PackedPicture> {
        if payload.len() < HEADER_LEN {
            return Err(DecodeError::corrupt_data(format!(
                "packed picture bank holds {} bytes, header alone needs {}",
                payload.len(),
                HEADER_LEN
            )));
        }
        let mut cursor = ByteCursor::new(payload);

        let id = cursor.read_u32()?;
        if id != SCREEN_HEADER_ID {
            warn!("unexpected packed picture screen id {:#010x}", id);
        }
        let width = cursor.read_u16()?;
        let height = cursor.read_u16()?;
        let hardware_x = cursor.read_u16()?;
        let hardware_y = cursor.read_u16()?;
        let hardware_width = cursor.read_u16()?;
        let hardware_height = cursor.read_u16()?;
        cursor.skip(4)?; // unknown
        let bplcon0 = cursor.read_u16()?;
        let num_colors = cursor.read_u16()?;
        let num_bitplanes = cursor.read_u16()?;
        let palette = Palette::decode(&cursor.read_array::<PALETTE_BYTES>()?);
        let screen = ScreenHeader {
            width,
            height,
            hardware_x,
            hardware_y,
            hardware_width,
            hardware_height,
            bplcon0,
            num_colors,
            num_bitplanes,
            palette,
        };

        let id = cursor.read_u32()?;
        if id != PICTURE_HEADER_ID {
            warn!("unexpected packed picture header id {:#010x}", id);
        }
        let picture = PictureHeader {
            x_offset: cursor.read_u16()?,
            y_offset: cursor.read_u16()?,
            width: cursor.read_u16()?,
            height: cursor.read_u16()?,
            lines_per_lump: cursor.read_u16()?,
            num_bitplanes: cursor.read_u16()?,
            rledata_offset: cursor.read_u32()?,
            points_offset: cursor.read_u32()?,
        };
        debug!(
            "packed picture {}x{}, {} colors, {} bitplanes, {} packed bytes",
            screen.width,
            screen.height,
            screen.num_colors,
            screen.num_bitplanes,
            payload.len() - HEADER_LEN
        );

        Ok(PackedPicture {
            screen,
            picture,
            packed_data: payload[HEADER_LEN..].to_vec(),
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.screen.palette
    }

    /// Placeholder 1x1 raster with the screen palette. The picture data is
    /// still compressed, so this is not the picture.
    pub fn raster(&self) -> Result<IndexedRaster> {
        planar::decode(1, 1, 1, &[0], self.palette())
    }
}
