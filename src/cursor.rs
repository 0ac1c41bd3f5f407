//! Forward-only big-endian reader over a byte stream

use std::io::{self, Read};

use log::trace;

use crate::error::{DecodeError, Result};
use crate::float::{self, FloatMode};

/// Upper bound on the up-front allocation of `read_bytes`
const READ_CHUNK: usize = 64 * 1024;

pub struct ByteCursor<R> {
    reader: R,
    position: u64,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(reader: R) -> Self {
        ByteCursor {
            reader,
            position: 0,
        }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Fill `buf` completely or fail with `IncompleteRead`
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let start = self.position;
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.position += filled as u64;
        if filled < buf.len() {
            trace!(
                "short read at {:#x}: wanted {}, got {}",
                start,
                buf.len(),
                filled
            );
            return Err(DecodeError::IncompleteRead {
                offset: start,
                expected: buf.len(),
                actual: filled,
            });
        }
        Ok(())
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Read `len` bytes. The buffer grows with the data actually read, so a
    /// bogus length in a truncated file ends in `IncompleteRead`.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let start = self.position;
        let mut buf = Vec::with_capacity(len.min(READ_CHUNK));
        (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
        self.position += buf.len() as u64;
        if buf.len() < len {
            trace!(
                "short read at {:#x}: wanted {}, got {}",
                start,
                len,
                buf.len()
            );
            return Err(DecodeError::IncompleteRead {
                offset: start,
                expected: len,
                actual: buf.len(),
            });
        }
        Ok(buf)
    }

    /// Discard `len` bytes
    pub fn skip(&mut self, len: usize) -> Result<()> {
        let start = self.position;
        let copied = io::copy(&mut (&mut self.reader).take(len as u64), &mut io::sink())?;
        self.position += copied;
        if copied < len as u64 {
            return Err(DecodeError::IncompleteRead {
                offset: start,
                expected: len,
                actual: copied as usize,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_custom_float32(&mut self, mode: FloatMode) -> Result<f32> {
        let bytes = self.read_array::<4>()?;
        float::decode_float(bytes, mode)
    }
}
