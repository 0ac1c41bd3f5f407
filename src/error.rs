// Decoder error handling

use std::fmt;
use std::io;

/// Coarse classification of a `DecodeError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    CorruptStream,
    IncompleteRead,
    Io,
    Config,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The 16-byte magic header matched none of the known variants
    UnsupportedFormat { header: Vec<u8> },

    /// Tag or length bookkeeping went wrong; offsets after this are unrecoverable.
    /// `offset` is None when the failure happened outside the byte stream (e.g. a
    /// planar buffer handed in by a caller).
    CorruptStream { offset: Option<u64>, reason: String },

    /// The stream ended in the middle of a record
    IncompleteRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    // Any other I/O failure
    Io(String),

    InvalidConfig(String),
}

impl DecodeError {
    pub fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        DecodeError::CorruptStream {
            offset: Some(offset),
            reason: reason.into(),
        }
    }

    pub fn corrupt_data(reason: impl Into<String>) -> Self {
        DecodeError::CorruptStream {
            offset: None,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            DecodeError::CorruptStream { .. } => ErrorKind::CorruptStream,
            DecodeError::IncompleteRead { .. } => ErrorKind::IncompleteRead,
            DecodeError::Io(_) => ErrorKind::Io,
            DecodeError::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::UnsupportedFormat { header } => {
                write!(
                    f,
                    "Unsupported format: unknown header {:?}",
                    String::from_utf8_lossy(header)
                )
            }
            DecodeError::CorruptStream {
                offset: Some(offset),
                reason,
            } => {
                write!(f, "Corrupt stream at byte {:#x}: {}", offset, reason)
            }
            DecodeError::CorruptStream {
                offset: None,
                reason,
            } => {
                write!(f, "Corrupt data: {}", reason)
            }
            DecodeError::IncompleteRead {
                offset,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Incomplete read at byte {:#x}: expected {} bytes, got {}",
                    offset, expected, actual
                )
            }
            DecodeError::Io(msg) => {
                write!(f, "IO error: {}", msg)
            }
            DecodeError::InvalidConfig(msg) => {
                write!(f, "Invalid config: {}", msg)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<io::Error> for DecodeError {
    fn from(e: io::Error) -> Self {
        DecodeError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DecodeError::corrupt(0x1a, "bad tag").to_string(),
            "Corrupt stream at byte 0x1a: bad tag"
        );
        assert_eq!(
            DecodeError::corrupt_data("depth 7").to_string(),
            "Corrupt data: depth 7"
        );
        assert_eq!(
            DecodeError::IncompleteRead {
                offset: 20,
                expected: 4,
                actual: 1
            }
            .to_string(),
            "Incomplete read at byte 0x14: expected 4 bytes, got 1"
        );
        assert_eq!(
            DecodeError::UnsupportedFormat {
                header: b"GIF89a".to_vec()
            }
            .to_string(),
            "Unsupported format: unknown header \"GIF89a\""
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            DecodeError::corrupt(0, "x").kind(),
            ErrorKind::CorruptStream
        );
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(DecodeError::from(io_err).kind(), ErrorKind::Io);
    }
}
