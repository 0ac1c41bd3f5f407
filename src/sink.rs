// Destinations for decoded output

use crate::banks::{Bank, BankContent, ImageBank, ImageBankKind, MemoryBankHeader};
use crate::detokenizer::SourceLine;
use crate::error::Result;
use crate::pacpic::PackedPicture;

/// Receives everything a decode session produces, in stream order.
///
/// Every method may fail; the first error stops the decode and is returned
/// to the caller unchanged.
pub trait DecodeSink {
    fn source_line(&mut self, line: &SourceLine) -> Result<()>;

    /// A sprite or icon bank, after planar conversion
    fn sprite_bank(&mut self, kind: ImageBankKind, bank: &ImageBank) -> Result<()>;

    fn packed_picture(&mut self, header: &MemoryBankHeader, picture: &PackedPicture) -> Result<()>;

    /// Tracker, samples and unrecognised memory banks
    fn raw_bank(&mut self, header: &MemoryBankHeader, payload: &[u8]) -> Result<()>;

    fn bank(&mut self, bank: &Bank) -> Result<()> {
        match &bank.content {
            BankContent::Images(kind, images) => self.sprite_bank(*kind, images),
            BankContent::PackedPicture(header, picture) => self.packed_picture(header, picture),
            BankContent::Raw(header, payload) => self.raw_bank(header, payload),
        }
    }
}

/// Keeps everything in memory
#[derive(Debug, Default)]
pub struct CollectSink {
    pub lines: Vec<SourceLine>,
    pub image_banks: Vec<(ImageBankKind, ImageBank)>,
    pub packed_pictures: Vec<(MemoryBankHeader, PackedPicture)>,
    pub raw_banks: Vec<(MemoryBankHeader, Vec<u8>)>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing text, one string per line
    pub fn text(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

impl DecodeSink for CollectSink {
    fn source_line(&mut self, line: &SourceLine) -> Result<()> {
        self.lines.push(line.clone());
        Ok(())
    }

    fn sprite_bank(&mut self, kind: ImageBankKind, bank: &ImageBank) -> Result<()> {
        self.image_banks.push((kind, bank.clone()));
        Ok(())
    }

    fn packed_picture(&mut self, header: &MemoryBankHeader, picture: &PackedPicture) -> Result<()> {
        self.packed_pictures.push((header.clone(), picture.clone()));
        Ok(())
    }

    fn raw_bank(&mut self, header: &MemoryBankHeader, payload: &[u8]) -> Result<()> {
        self.raw_banks.push((header.clone(), payload.to_vec()));
        Ok(())
    }
}
