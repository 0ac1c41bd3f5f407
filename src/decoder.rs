//! Whole-file decode driver
//!
//! Runs one `AmosFile` session from header to last bank and hands every
//! decoded item to a `DecodeSink` as soon as it is read.

use std::fmt;
use std::io::Read;

use log::info;

use crate::banks::{BankContent, ImageBankKind};
use crate::config::DecodeOptions;
use crate::container::AmosFile;
use crate::error::Result;
use crate::header::HeaderInfo;
use crate::sink::DecodeSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeSummary {
    pub header: HeaderInfo,
    pub lines: usize,
    /// Banks read, 0 when only the source was decoded
    pub banks: usize,
    pub sprites: usize,
    pub icons: usize,
    pub packed_pictures: usize,
    pub raw_banks: usize,
}

impl DecodeSummary {
    fn new(header: HeaderInfo) -> Self {
        DecodeSummary {
            header,
            lines: 0,
            banks: 0,
            sprites: 0,
            icons: 0,
            packed_pictures: 0,
            raw_banks: 0,
        }
    }
}

impl fmt::Display for DecodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} banks ({} sprites, {} icons, {} packed pictures, {} raw)",
            self.lines, self.banks, self.sprites, self.icons, self.packed_pictures, self.raw_banks
        )
    }
}

/// Decode the listing and, unless `source_only`, every bank after it.
pub fn decode<R: Read, S: DecodeSink + ?Sized>(
    reader: R,
    options: DecodeOptions,
    source_only: bool,
    sink: &mut S,
) -> Result<DecodeSummary> {
    let mut file = AmosFile::open(reader, options)?;
    let mut summary = DecodeSummary::new(file.header().clone());

    while !file.is_source_exhausted() {
        let line = file.read_line()?;
        sink.source_line(&line)?;
        summary.lines += 1;
    }

    if source_only {
        info!("{}", summary);
        return Ok(summary);
    }

    file.read_bank_count()?;
    while file.banks_remaining() > 0 {
        let bank = file.read_bank()?;
        match &bank.content {
            BankContent::Images(ImageBankKind::Sprites, images) => {
                summary.sprites += images.images.len()
            }
            BankContent::Images(ImageBankKind::Icons, images) => summary.icons += images.images.len(),
            BankContent::PackedPicture(..) => summary.packed_pictures += 1,
            BankContent::Raw(..) => summary.raw_banks += 1,
        }
        sink.bank(&bank)?;
        summary.banks += 1;
    }

    info!("{}", summary);
    Ok(summary)
}
