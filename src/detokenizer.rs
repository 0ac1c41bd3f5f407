//! Tokenized source line decoding
//!
//! A line starts with one byte holding its length in 16-bit words and one
//! byte holding its indent level. Those two bytes count as the first word.
//! Opcodes follow until the declared length is used up, and the last opcode
//! of a well-formed line is the null opcode.
//!
//! Every opcode branch reports exactly how many words it consumed. The word
//! tally is what ends the loop, so a branch that miscounts would silently
//! shift every following line.

use std::fmt;
use std::io::Read;

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::DecodeOptions;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};
use crate::tokens::{self, op};

/// How opcodes missing from the token table are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStyle {
    /// `[0x1234]`
    #[default]
    Bracketed,
    /// ` 0x1234`
    Permissive,
}

impl FallbackStyle {
    pub fn render(self, opcode: u16) -> String {
        match self {
            FallbackStyle::Bracketed => format!("[0x{:x}]", opcode),
            FallbackStyle::Permissive => format!(" 0x{:x}", opcode),
        }
    }
}

/// One opcode as it was read from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeRecord {
    pub opcode: u16,
    /// Stream offset of the opcode word
    pub offset: u64,
    /// Words consumed, the opcode word included
    pub words: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    pub indent: u8,
    /// Line length from the line header, in words
    pub declared_words: usize,
    pub opcodes: Vec<OpcodeRecord>,
}

impl SourceLine {
    /// Header word plus every opcode's words
    pub fn words_consumed(&self) -> usize {
        1 + self.opcodes.iter().map(|o| o.words).sum::<usize>()
    }

    pub fn last_opcode(&self) -> Option<u16> {
        self.opcodes.last().map(|o| o.opcode)
    }
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Text produced by one opcode and the words its payload used
struct Fragment {
    text: String,
    words: usize,
}

impl Fragment {
    fn new(text: impl Into<String>, words: usize) -> Self {
        Fragment {
            text: text.into(),
            words,
        }
    }
}

/// What follows a referenced name
#[derive(Clone, Copy)]
enum NameSuffix {
    /// `#` for floats, `$` for strings, nothing for integers
    TypeFlag,
    /// Label definitions end in a colon
    Colon,
}

pub fn decode_line<R: Read>(
    cursor: &mut ByteCursor<R>,
    options: &DecodeOptions,
) -> Result<SourceLine> {
    let line_start = cursor.position();
    let declared_words = cursor.read_u8()? as usize;
    let indent = cursor.read_u8()?;
    if declared_words == 0 {
        return Err(DecodeError::corrupt(
            line_start,
            "line header declares a length of zero words",
        ));
    }

    let mut text = " ".repeat(indent.saturating_sub(1) as usize);
    let mut opcodes = Vec::new();
    let mut words = 1;
    let mut last_opcode = op::NULL;

    while words < declared_words {
        let offset = cursor.position();
        let opcode = cursor.read_u16()?;
        let fragment = decode_opcode(cursor, opcode, options)?;
        trace!(
            "{:#08x}: opcode {:#06x} +{} words {:?}",
            offset,
            opcode,
            fragment.words,
            fragment.text
        );
        words += 1 + fragment.words;
        text.push_str(&fragment.text);
        opcodes.push(OpcodeRecord {
            opcode,
            offset,
            words: 1 + fragment.words,
        });
        last_opcode = opcode;
    }

    if last_opcode != op::NULL {
        return Err(DecodeError::corrupt(
            cursor.position(),
            format!(
                "line didn't end with a null opcode, but {:#06x} ({})",
                last_opcode, text
            ),
        ));
    }
    if words != declared_words {
        return Err(DecodeError::corrupt(
            cursor.position(),
            format!(
                "line at {:#x} declares {} words but {} were consumed ({})",
                line_start, declared_words, words, text
            ),
        ));
    }

    Ok(SourceLine {
        text,
        indent,
        declared_words,
        opcodes,
    })
}

fn decode_opcode<R: Read>(
    cursor: &mut ByteCursor<R>,
    opcode: u16,
    options: &DecodeOptions,
) -> Result<Fragment> {
    let fragment = match opcode {
        op::NULL => Fragment::new("", 0),

        op::VARIABLE | op::PROCEDURE_CALL | op::LABEL_REF => {
            read_name(cursor, NameSuffix::TypeFlag)?
        }
        op::LABEL => read_name(cursor, NameSuffix::Colon)?,

        op::DOUBLE_QUOTED => read_quoted(cursor, '"')?,
        op::SINGLE_QUOTED => read_quoted(cursor, '\'')?,

        op::BINARY => Fragment::new(format!("%{:b}", cursor.read_i32()?), 2),
        op::HEX => Fragment::new(format!("${:x}", cursor.read_i32()?), 2),
        op::DECIMAL => Fragment::new(cursor.read_i32()?.to_string(), 2),
        op::FLOAT => {
            let value = cursor.read_custom_float32(options.float_mode)?;
            Fragment::new(format!("{:?}", value), 2)
        }

        op::EXTENSION => {
            let module = cursor.read_u8()?;
            cursor.skip(1)?;
            let offset = cursor.read_i16()?;
            let text = match tokens::lookup_extension(module, offset) {
                Some(text) => text.to_string(),
                None => {
                    warn!(
                        "unknown extension command {}:{:#x} at {:#x}",
                        module,
                        offset,
                        cursor.position() - 6
                    );
                    format!("[ext{}(0x{:x})]", module, offset)
                }
            };
            Fragment::new(text, 2)
        }

        op::REM | op::REM_QUOTE => {
            let keyword = tokens::lookup(opcode).unwrap_or_default();
            cursor.skip(1)?;
            let len = word_aligned(cursor.read_u8()? as usize);
            let comment = latin1(&cursor.read_bytes(len)?);
            Fragment::new(format!("{}{}", keyword, comment), 1 + len / 2)
        }

        _ => {
            if let Some((keyword, extra_words)) = tokens::fixed_width_keyword(opcode) {
                cursor.skip(extra_words * 2)?;
                Fragment::new(keyword, extra_words)
            } else if let Some(text) = tokens::lookup(opcode) {
                Fragment::new(text, 0)
            } else {
                warn!(
                    "unknown opcode {:#06x} at {:#x}",
                    opcode,
                    cursor.position() - 2
                );
                Fragment::new(options.unknown_opcode.render(opcode), 0)
            }
        }
    };
    Ok(fragment)
}

/// Variables, labels, procedure calls and label references all share this layout:
/// 2 unknown bytes, name length, flags, then the padded name.
fn read_name<R: Read>(cursor: &mut ByteCursor<R>, suffix: NameSuffix) -> Result<Fragment> {
    cursor.skip(2)?;
    let len = word_aligned(cursor.read_u8()? as usize);
    let flags = cursor.read_u8()?;
    let mut text = latin1(&cursor.read_bytes(len)?);
    match suffix {
        NameSuffix::Colon => text.push(':'),
        NameSuffix::TypeFlag => {
            if flags & 0x01 != 0 {
                text.push('#');
            } else if flags & 0x02 != 0 {
                text.push('$');
            }
        }
    }
    Ok(Fragment::new(text, 2 + len / 2))
}

fn read_quoted<R: Read>(cursor: &mut ByteCursor<R>, quote: char) -> Result<Fragment> {
    let len = word_aligned(cursor.read_u16()? as usize);
    let body = latin1(&cursor.read_bytes(len)?);
    Ok(Fragment::new(
        format!("{}{}{}", quote, body, quote),
        1 + len / 2,
    ))
}

/// Round a byte count up to a whole number of words
pub fn word_aligned(len: usize) -> usize {
    len + (len & 1)
}

/// Bytes as ISO-8859-1, without the NUL padding added for word alignment
fn latin1(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    bytes[..end].iter().map(|&b| b as char).collect()
}
