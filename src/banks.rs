//! Memory banks stored after the tokenized source
//!
//! The bank section starts with `AmBs` and a bank count. Each bank begins
//! with a 4-byte type tag:
//! - `AmSp` / `AmIc`: sprite or icon images followed by one shared palette
//! - `AmBk`: a generic memory bank with a number, chip-memory flag, size,
//!   flags and an 8-byte name that identifies its subtype
//!
//! Banks have no index, so each payload must be consumed exactly before the
//! next header can be found. Generic banks are read in full according to
//! their declared size before their payload is looked at, so a payload that
//! fails to parse never moves the next header.

use std::fmt;
use std::io::Read;

use log::{debug, warn};

use crate::container::AmosFile;
use crate::error::{DecodeError, Result};
use crate::pacpic::PackedPicture;
use crate::planar::{IndexedRaster, Palette, PlanarImage, MAX_DEPTH, PALETTE_BYTES};

pub const BANK_SECTION_MARKER: &[u8; 4] = b"AmBs";

/// Bytes of the generic bank header counted in its declared size
const MEMORY_BANK_NAME_LEN: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankType {
    Sprite,
    Icon,
    Memory,
}

impl BankType {
    pub fn from_tag(tag: &[u8; 4]) -> Option<BankType> {
        match tag {
            b"AmSp" => Some(BankType::Sprite),
            b"AmIc" => Some(BankType::Icon),
            b"AmBk" => Some(BankType::Memory),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static [u8; 4] {
        match self {
            BankType::Sprite => b"AmSp",
            BankType::Icon => b"AmIc",
            BankType::Memory => b"AmBk",
        }
    }
}

/// Subtype of a generic memory bank, from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryKind {
    PackedPicture,
    Tracker,
    Samples,
    /// Any other name; the payload is passed through untouched
    Generic,
}

impl MemoryKind {
    pub fn from_name(name: &[u8; 8]) -> MemoryKind {
        match name {
            b"Pac.Pic." => MemoryKind::PackedPicture,
            b"Tracker " => MemoryKind::Tracker,
            b"Samples " => MemoryKind::Samples,
            _ => MemoryKind::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBankHeader {
    pub number: u16,
    pub chip_memory: bool,
    /// Top nibble of the size field
    pub flags: u8,
    /// Payload size, the 8-byte name excluded
    pub size: u32,
    pub name: [u8; 8],
    pub kind: MemoryKind,
}

impl MemoryBankHeader {
    pub fn name(&self) -> String {
        self.name.iter().map(|&b| b as char).collect::<String>()
    }
}

impl fmt::Display for MemoryBankHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bank {}: {}{}{} bytes",
            self.number,
            self.name(),
            if self.chip_memory { " (chip) " } else { " " },
            self.size
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBankKind {
    Sprites,
    Icons,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankImage {
    pub hotspot_x: u16,
    pub hotspot_y: u16,
    pub raster: IndexedRaster,
}

/// Decoded sprite or icon bank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBank {
    pub images: Vec<BankImage>,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankContent {
    Images(ImageBankKind, ImageBank),
    PackedPicture(MemoryBankHeader, PackedPicture),
    /// Tracker, samples, unknown names, or a packed picture that failed to parse
    Raw(MemoryBankHeader, Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    /// Position in the bank section, from 0
    pub ordinal: u16,
    pub content: BankContent,
}

impl<R: Read> AmosFile<R> {
    /// Read the `AmBs` marker that follows the source and the bank count
    pub fn read_bank_count(&mut self) -> Result<u16> {
        if self.source_consumed() != self.header().source_len as u64 {
            return Err(DecodeError::corrupt(
                self.position(),
                format!(
                    "bank section requested after {} of {} source bytes",
                    self.source_consumed(),
                    self.header().source_len
                ),
            ));
        }
        let offset = self.position();
        let tag = self.cursor.read_array::<4>()?;
        if &tag != BANK_SECTION_MARKER {
            return Err(DecodeError::corrupt(
                offset,
                format!(
                    "file doesn't contain a description of memory banks (expected {:?}, found {:?})",
                    String::from_utf8_lossy(BANK_SECTION_MARKER),
                    String::from_utf8_lossy(&tag)
                ),
            ));
        }
        let count = self.cursor.read_u16()?;
        debug!("decoding {} banks", count);
        self.bank_count = Some(count);
        self.banks_read = 0;
        Ok(count)
    }

    pub fn read_bank_type_tag(&mut self) -> Result<BankType> {
        let offset = self.position();
        let tag = self.cursor.read_array::<4>()?;
        BankType::from_tag(&tag).ok_or_else(|| {
            DecodeError::corrupt(
                offset,
                format!("unknown memory bank type {:?}", String::from_utf8_lossy(&tag)),
            )
        })
    }

    /// Header of an `AmBk` bank, read right after its tag
    pub fn read_memory_bank_subtype(&mut self) -> Result<MemoryBankHeader> {
        let offset = self.position();
        let number = self.cursor.read_u16()?;
        let chip_memory = self.cursor.read_u16()? == 0;
        let size_field = self.cursor.read_u32()?;
        let flags = (size_field >> 28) as u8;
        let declared = size_field & 0x0FFF_FFFF;
        if declared < MEMORY_BANK_NAME_LEN {
            return Err(DecodeError::corrupt(
                offset,
                format!(
                    "memory bank {} declares {} bytes, less than its {} byte name",
                    number, declared, MEMORY_BANK_NAME_LEN
                ),
            ));
        }
        let name = self.cursor.read_array::<8>()?;
        let header = MemoryBankHeader {
            number,
            chip_memory,
            flags,
            size: declared - MEMORY_BANK_NAME_LEN,
            name,
            kind: MemoryKind::from_name(&name),
        };
        debug!("{}", header);
        if header.kind == MemoryKind::Generic {
            warn!("unknown memory bank: {:?}", header.name());
        }
        self.current_bank_number = Some(number);
        Ok(header)
    }

    /// Number of the generic memory bank most recently read
    pub fn current_bank_number(&self) -> Option<u16> {
        self.current_bank_number
    }

    pub fn banks_remaining(&self) -> u16 {
        self.bank_count.unwrap_or(0).saturating_sub(self.banks_read)
    }

    /// Sprite or icon images and the palette after them
    pub fn read_image_bank(&mut self) -> Result<ImageBank> {
        let count = self.cursor.read_u16()?;
        debug!("... reading {} images", count);

        let mut planar = Vec::with_capacity(count as usize);
        for i in 0..count {
            let width_words = self.cursor.read_u16()? as usize;
            let height = self.cursor.read_u16()? as usize;
            let depth_offset = self.position();
            let depth = self.cursor.read_u16()?;
            if !(1..=MAX_DEPTH).contains(&depth) {
                return Err(DecodeError::corrupt(
                    depth_offset,
                    format!("incompatible depth ({}) for image {}", depth, i),
                ));
            }
            let hotspot_x = self.cursor.read_u16()?;
            let hotspot_y = self.cursor.read_u16()?;
            let data = self
                .cursor
                .read_bytes(2 * width_words * height * depth as usize)?;
            debug!(
                "img({})={}x{}x{}, ({}, {})",
                i,
                16 * width_words,
                height,
                depth,
                hotspot_x,
                hotspot_y
            );
            planar.push(PlanarImage {
                width: 16 * width_words,
                height,
                depth,
                hotspot_x,
                hotspot_y,
                data,
            });
        }

        let palette = Palette::decode(&self.cursor.read_array::<PALETTE_BYTES>()?);
        let images = planar
            .iter()
            .map(|image| {
                Ok(BankImage {
                    hotspot_x: image.hotspot_x,
                    hotspot_y: image.hotspot_y,
                    raster: image.decode(&palette)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ImageBank { images, palette })
    }

    /// Read the next bank. `read_bank_count` must have been called first.
    pub fn read_bank(&mut self) -> Result<Bank> {
        if self.banks_remaining() == 0 {
            return Err(DecodeError::corrupt(
                self.position(),
                format!(
                    "all {} declared banks have been read",
                    self.bank_count.unwrap_or(0)
                ),
            ));
        }
        let ordinal = self.banks_read;
        self.banks_read += 1;

        let content = match self.read_bank_type_tag()? {
            BankType::Sprite => BankContent::Images(ImageBankKind::Sprites, self.read_image_bank()?),
            BankType::Icon => BankContent::Images(ImageBankKind::Icons, self.read_image_bank()?),
            BankType::Memory => {
                let header = self.read_memory_bank_subtype()?;
                let payload = self.cursor.read_bytes(header.size as usize)?;
                match header.kind {
                    MemoryKind::PackedPicture => match PackedPicture::parse(&payload) {
                        Ok(picture) => BankContent::PackedPicture(header, picture),
                        Err(e) => {
                            warn!("bank {}: {}, keeping raw bytes", header.number, e);
                            BankContent::Raw(header, payload)
                        }
                    },
                    _ => BankContent::Raw(header, payload),
                }
            }
        };
        Ok(Bank { ordinal, content })
    }

    /// Read the bank section: marker, count, then every bank
    pub fn read_banks(&mut self) -> Result<Vec<Bank>> {
        let count = self.read_bank_count()?;
        (0..count).map(|_| self.read_bank()).collect()
    }
}
