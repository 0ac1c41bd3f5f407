// Builders for synthetic AMOS files, used by unit and integration tests

use crate::detokenizer::word_aligned;
use crate::header::Magic;
use crate::tokens::{self, op};

/// Encodes the opcodes of one line. The null terminator is added by `encode`.
#[derive(Default, Clone)]
pub struct LineBuilder {
    body: Vec<u8>,
    unterminated: bool,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(mut self, opcode: u16) -> Self {
        self.body.extend_from_slice(&opcode.to_be_bytes());
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    fn name(self, opcode: u16, name: &str, flags: u8) -> Self {
        let len = name.len();
        let mut padded = name.as_bytes().to_vec();
        padded.resize(word_aligned(len), 0);
        self.token(opcode)
            .raw(&[0, 0, len as u8, flags])
            .raw(&padded)
    }

    pub fn variable(self, name: &str, flags: u8) -> Self {
        self.name(op::VARIABLE, name, flags)
    }

    pub fn label(self, name: &str) -> Self {
        self.name(op::LABEL, name, 0)
    }

    pub fn procedure_call(self, name: &str, flags: u8) -> Self {
        self.name(op::PROCEDURE_CALL, name, flags)
    }

    pub fn label_ref(self, name: &str, flags: u8) -> Self {
        self.name(op::LABEL_REF, name, flags)
    }

    fn quoted(self, opcode: u16, text: &str) -> Self {
        let mut padded = text.as_bytes().to_vec();
        padded.resize(word_aligned(text.len()), 0);
        self.token(opcode)
            .raw(&(text.len() as u16).to_be_bytes())
            .raw(&padded)
    }

    pub fn double_quoted(self, text: &str) -> Self {
        self.quoted(op::DOUBLE_QUOTED, text)
    }

    pub fn single_quoted(self, text: &str) -> Self {
        self.quoted(op::SINGLE_QUOTED, text)
    }

    pub fn binary(self, value: i32) -> Self {
        self.token(op::BINARY).raw(&value.to_be_bytes())
    }

    pub fn hex(self, value: i32) -> Self {
        self.token(op::HEX).raw(&value.to_be_bytes())
    }

    pub fn decimal(self, value: i32) -> Self {
        self.token(op::DECIMAL).raw(&value.to_be_bytes())
    }

    pub fn float_bytes(self, bytes: [u8; 4]) -> Self {
        self.token(op::FLOAT).raw(&bytes)
    }

    pub fn extension(self, module: u8, offset: i16) -> Self {
        self.token(op::EXTENSION)
            .raw(&[module, 0])
            .raw(&offset.to_be_bytes())
    }

    /// A fixed-width control keyword with zeroed payload words
    pub fn keyword(self, opcode: u16) -> Self {
        let (_, extra_words) = tokens::fixed_width_keyword(opcode).unwrap_or(("", 0));
        self.token(opcode).raw(&vec![0u8; extra_words * 2])
    }

    pub fn rem(self, opcode: u16, comment: &str) -> Self {
        let mut padded = comment.as_bytes().to_vec();
        padded.resize(word_aligned(comment.len()), 0);
        self.token(opcode)
            .raw(&[0, comment.len() as u8])
            .raw(&padded)
    }

    /// Leave off the null terminator
    pub fn unterminated(mut self) -> Self {
        self.unterminated = true;
        self
    }

    pub fn encode(&self, indent: u8) -> Vec<u8> {
        let mut body = self.body.clone();
        if !self.unterminated {
            body.extend_from_slice(&op::NULL.to_be_bytes());
        }
        assert!(body.len() % 2 == 0, "line body must be word aligned");
        let words = 1 + body.len() / 2;
        let mut bytes = vec![words as u8, indent];
        bytes.extend_from_slice(&body);
        bytes
    }
}

/// A whole file: magic, source length, source, and whatever follows
#[derive(Clone)]
pub struct ContainerBuilder {
    magic: Magic,
    source: Vec<u8>,
    tail: Vec<u8>,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::with_magic(*b"AMOS Basic V134 ")
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_magic(magic: Magic) -> Self {
        ContainerBuilder {
            magic,
            source: Vec::new(),
            tail: Vec::new(),
        }
    }

    pub fn line(mut self, indent: u8, build: impl FnOnce(LineBuilder) -> LineBuilder) -> Self {
        let line = build(LineBuilder::new());
        self.source.extend(line.encode(indent));
        self
    }

    pub fn raw_source(mut self, bytes: &[u8]) -> Self {
        self.source.extend_from_slice(bytes);
        self
    }

    /// The `AmBs` marker and bank count
    pub fn banks(mut self, count: u16) -> Self {
        self.tail.extend_from_slice(b"AmBs");
        self.tail.extend_from_slice(&count.to_be_bytes());
        self
    }

    pub fn raw_tail(mut self, bytes: &[u8]) -> Self {
        self.tail.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = self.magic.to_vec();
        bytes.extend_from_slice(&(self.source.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&self.source);
        bytes.extend_from_slice(&self.tail);
        bytes
    }
}

/// One image of a sprite or icon bank
pub struct TestImage {
    pub width_words: u16,
    pub height: u16,
    pub depth: u16,
    pub hotspot: (u16, u16),
    pub data: Vec<u8>,
}

/// `AmSp`/`AmIc` bank bytes
pub fn image_bank(tag: &[u8; 4], images: &[TestImage], palette: &[u8; 64]) -> Vec<u8> {
    let mut bytes = tag.to_vec();
    bytes.extend_from_slice(&(images.len() as u16).to_be_bytes());
    for image in images {
        for word in [
            image.width_words,
            image.height,
            image.depth,
            image.hotspot.0,
            image.hotspot.1,
        ] {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        bytes.extend_from_slice(&image.data);
    }
    bytes.extend_from_slice(palette);
    bytes
}

/// `AmBk` bank bytes. `payload.len()` becomes the declared size (plus the 8 byte header).
pub fn memory_bank(number: u16, chip: bool, flags: u8, name: &[u8; 8], payload: &[u8]) -> Vec<u8> {
    let mut bytes = b"AmBk".to_vec();
    bytes.extend_from_slice(&number.to_be_bytes());
    bytes.extend_from_slice(&(if chip { 0u16 } else { 1u16 }).to_be_bytes());
    let size = ((flags as u32 & 0x0F) << 28) | (payload.len() as u32 + 8);
    bytes.extend_from_slice(&size.to_be_bytes());
    bytes.extend_from_slice(name);
    bytes.extend_from_slice(payload);
    bytes
}

/// A 114 byte packed picture header followed by `packed` as the compressed data
pub fn packed_picture(width: u16, height: u16, bitplanes: u16, palette: &[u8; 64], packed: &[u8]) -> Vec<u8> {
    let mut bytes = 0x1203_1990u32.to_be_bytes().to_vec();
    for word in [width, height, 0x81, 0x2C, width, height, 0, 0, 0x4200, 1 << bitplanes, bitplanes] {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    bytes.extend_from_slice(palette);
    bytes.extend_from_slice(&0x0607_1963u32.to_be_bytes());
    for word in [0u16, 0, width / 8, height / 8, 8, bitplanes] {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    bytes.extend_from_slice(&24u32.to_be_bytes());
    bytes.extend_from_slice(&(24 + packed.len() as u32 / 2).to_be_bytes());
    bytes.extend_from_slice(packed);
    bytes
}
