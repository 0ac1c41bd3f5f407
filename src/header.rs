use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use indexmap::IndexMap;

pub const MAGIC_LEN: usize = 16;

pub type Magic = [u8; MAGIC_LEN];

/// Where a known header comes from and whether files with it have been checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderVariant {
    pub tested: bool,
    pub origin: &'static str,
}

lazy_static! {
    /// Every header accepted by the decoder. Tested variants come first.
    pub static ref KNOWN_HEADERS: IndexMap<Magic, HeaderVariant> = {
        let mut m = IndexMap::new();
        let mut add = |magic: &[u8; MAGIC_LEN], tested: bool, origin: &'static str| {
            m.insert(*magic, HeaderVariant { tested, origin });
        };
        add(b"AMOS Pro101V\0\0\0\0", true, "AMOS Professional");
        add(b"AMOS Basic V134 ", true, "AMOS Pro, but AMOS 1.3 compatible");
        add(b"AMOS Basic V1.3 ", true, "AMOS The Creator v1.3");
        add(b"AMOS Basic V1.00", true, "AMOS The Creator v1.0 - v1.2");
        add(b"AMOS Pro101v\0\0\0\0", false, "AMOS Professional");
        add(b"AMOS Pro101v\0\0\0\x03", false, "AMOS Professional");
        add(b"AMOS Basic v134 ", false, "AMOS Pro, but AMOS 1.3 compatible");
        add(b"AMOS Basic v1.3 ", false, "AMOS The Creator v1.3");
        add(b"AMOS Basic v1.00", false, "AMOS The Creator v1.0 - v1.2");
        m
    };
}

/// Header of an opened file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub magic: Magic,
    pub variant: HeaderVariant,
    /// Length of the tokenized source in bytes
    pub source_len: u32,
}

impl HeaderInfo {
    /// False for headers that are accepted but were never checked against real files
    pub fn is_sanity_tested(&self) -> bool {
        self.variant.tested
    }

    /// The header text with NUL padding dropped
    pub fn label(&self) -> String {
        printable(&self.magic)
    }
}

pub fn identify(magic: &Magic) -> Option<HeaderVariant> {
    KNOWN_HEADERS.get(magic).copied()
}

fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|b| **b >= 0x20)
        .map(|b| *b as char)
        .collect::<String>()
        .trim_end()
        .to_string()
}

impl Display for HeaderInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "
Header:                   {}
Saved by:                 {}
Sanity tested:            {}
Source length:            {:#010x}
",
            self.label(),
            self.variant.origin,
            if self.variant.tested { "yes" } else { "no" },
            self.source_len,
        )
    }
}
