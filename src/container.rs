//! An opened AMOS source file
//!
//! `AmosFile` is one decode session: it owns the byte cursor and every
//! per-stream counter. Reading is strictly forward, first the listing with
//! `read_line`, then the banks (see `banks.rs`).

use std::io::Read;

use log::{debug, info};

use crate::config::DecodeOptions;
use crate::cursor::ByteCursor;
use crate::detokenizer::{self, SourceLine};
use crate::error::{DecodeError, Result};
use crate::header::{self, HeaderInfo, Magic, MAGIC_LEN};

pub struct AmosFile<R> {
    pub(crate) cursor: ByteCursor<R>,
    header: HeaderInfo,
    pub(crate) options: DecodeOptions,
    source_start: u64,
    lines_read: usize,
    pub(crate) bank_count: Option<u16>,
    pub(crate) banks_read: u16,
    pub(crate) current_bank_number: Option<u16>,
}

impl<R: Read> AmosFile<R> {
    /// Check the magic header and read the source length
    pub fn open(reader: R, options: DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::new(reader);

        let mut magic: Magic = [0; MAGIC_LEN];
        match cursor.read_into(&mut magic) {
            Ok(()) => {}
            Err(DecodeError::IncompleteRead { actual, .. }) => {
                return Err(DecodeError::UnsupportedFormat {
                    header: magic[..actual].to_vec(),
                });
            }
            Err(e) => return Err(e),
        }

        let variant = header::identify(&magic).ok_or_else(|| DecodeError::UnsupportedFormat {
            header: magic.to_vec(),
        })?;
        let source_len = cursor.read_u32()?;
        let header = HeaderInfo {
            magic,
            variant,
            source_len,
        };

        info!(
            "{} ({}), {} bytes of source",
            header.label(),
            variant.origin,
            source_len
        );
        if !variant.tested {
            debug!("header {:?} has not been sanity tested", header.label());
        }

        let source_start = cursor.position();
        Ok(AmosFile {
            cursor,
            header,
            options,
            source_start,
            lines_read: 0,
            bank_count: None,
            banks_read: 0,
            current_bank_number: None,
        })
    }

    pub fn header(&self) -> &HeaderInfo {
        &self.header
    }

    pub fn is_sanity_tested(&self) -> bool {
        self.header.is_sanity_tested()
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Bytes read from the whole stream so far
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Bytes of tokenized source read so far
    pub fn source_consumed(&self) -> u64 {
        self.cursor.position().saturating_sub(self.source_start)
    }

    pub fn is_source_exhausted(&self) -> bool {
        self.source_consumed() >= self.header.source_len as u64
    }

    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Decode the next source line
    pub fn read_line(&mut self) -> Result<SourceLine> {
        if self.is_source_exhausted() {
            return Err(DecodeError::corrupt(
                self.cursor.position(),
                "no source left to read",
            ));
        }
        let line = detokenizer::decode_line(&mut self.cursor, &self.options)?;
        if self.source_consumed() > self.header.source_len as u64 {
            return Err(DecodeError::corrupt(
                self.cursor.position(),
                format!(
                    "line runs past the end of the source ({} of {} bytes)",
                    self.source_consumed(),
                    self.header.source_len
                ),
            ));
        }
        self.lines_read += 1;
        Ok(line)
    }

    /// Decode every remaining line
    pub fn read_source(&mut self) -> Result<Vec<SourceLine>> {
        let mut lines = Vec::new();
        while !self.is_source_exhausted() {
            lines.push(self.read_line()?);
        }
        Ok(lines)
    }

    /// Skip the rest of the listing without decoding it
    pub fn skip_source(&mut self) -> Result<()> {
        let remaining = (self.header.source_len as u64).saturating_sub(self.source_consumed());
        self.cursor.skip(remaining as usize)
    }
}
