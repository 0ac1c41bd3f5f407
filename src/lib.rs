#![crate_name = "amosdecode"]

#[macro_use]
extern crate lazy_static;

pub mod banks;
pub mod config;
pub mod container;
pub mod cursor;
pub mod decoder;
pub mod detokenizer;
pub mod error;
pub mod export;
pub mod float;
pub mod header;
pub mod pacpic;
pub mod planar;
pub mod sink;
pub mod tokens;

#[doc(hidden)]
pub mod test_utils;

#[cfg(test)]
mod detokenizer_tests;

pub use banks::{Bank, BankContent, ImageBank, ImageBankKind, MemoryBankHeader, MemoryKind};
pub use config::{Config, DecodeOptions, OutputOptions};
pub use container::AmosFile;
pub use decoder::{decode, DecodeSummary};
pub use detokenizer::{FallbackStyle, SourceLine};
pub use error::{DecodeError, ErrorKind, Result};
pub use export::Exporter;
pub use float::FloatMode;
pub use header::HeaderInfo;
pub use planar::{IndexedRaster, Palette};
pub use sink::{CollectSink, DecodeSink};

/*
File layout
        0000    16 byte header, e.g. "AMOS Basic V134 "
        0010    u32 length of the tokenized source in bytes
        0014    source lines: u8 length in words, u8 indent, opcodes, 0x0000
        ....    "AmBs" u16 bank count
        ....    banks, each starting with "AmSp", "AmIc" or "AmBk"
*/
