//! Opcode values and the static opcode-to-text tables
//!
//! The tables are built once on first use and never mutated, so they can be
//! shared between decode sessions on any thread.

use std::collections::HashMap;

/// Opcodes with their own payload layout. Everything else is a plain table lookup.
pub mod op {
    pub const NULL: u16 = 0x0000;

    pub const VARIABLE: u16 = 0x0006;
    pub const LABEL: u16 = 0x000C;
    pub const PROCEDURE_CALL: u16 = 0x0012;
    pub const LABEL_REF: u16 = 0x0018;

    pub const BINARY: u16 = 0x001E;
    pub const DOUBLE_QUOTED: u16 = 0x0026;
    pub const SINGLE_QUOTED: u16 = 0x002E;
    pub const HEX: u16 = 0x0036;
    pub const DECIMAL: u16 = 0x003E;
    pub const FLOAT: u16 = 0x0046;
    pub const EXTENSION: u16 = 0x004E;

    pub const FOR: u16 = 0x023C;
    pub const REPEAT: u16 = 0x0250;
    pub const WHILE: u16 = 0x0268;
    pub const DO: u16 = 0x027E;
    pub const EXIT_IF: u16 = 0x0290;
    pub const EXIT: u16 = 0x029E;
    pub const IF: u16 = 0x02BE;
    pub const ELSE: u16 = 0x02D0;
    pub const ON: u16 = 0x0316;
    pub const PROCEDURE: u16 = 0x0376;
    pub const DATA: u16 = 0x0404;

    pub const REM: u16 = 0x064A;
    pub const REM_QUOTE: u16 = 0x0652;
}

/// Control keywords followed by a fixed number of opaque words
/// (jump offsets, encryption seeds, flags).
pub fn fixed_width_keyword(opcode: u16) -> Option<(&'static str, usize)> {
    let entry = match opcode {
        op::FOR => ("For ", 1),
        op::REPEAT => ("Repeat", 1),
        op::WHILE => ("While ", 1),
        op::DO => ("Do ", 1),
        op::IF => ("If ", 1),
        op::ELSE => (" Else ", 1),
        op::DATA => ("Data ", 1),
        op::EXIT_IF => ("Exit If ", 2),
        op::EXIT => ("Exit ", 2),
        op::ON => ("On ", 2),
        // 4 bytes to the matching End Proc, 2 bytes of seed, flags, seed
        op::PROCEDURE => ("Procedure ", 4),
        _ => return None,
    };
    Some(entry)
}

pub const EXT_MUSIC: u8 = 1;
pub const EXT_COMPACT: u8 = 2;
pub const EXT_CRAFT: u8 = 19;

lazy_static! {
    pub static ref TOKENS: HashMap<u16, &'static str> = {
        let mut m = HashMap::new();
        for (opcode, text) in [
            (0x0054, " : "),
            (0x005C, ","),
            (0x0064, ";"),
            (0x0074, "("),
            (0x007C, ")"),
            (0x0094, " To "),
            (0x00F2, "Inkey$"),
            (0x012C, "Double Buffer"),
            (0x0246, "Next "),
            (0x025C, "Until "),
            (0x02C6, " Then "),
            (0x02A8, "Goto "),
            (0x02B2, "Gosub "),
            (0x02DA, "End If"),
            (0x0356, " Step "),
            (0x0360, "Return"),
            (0x0390, "End Proc "),
            (0x03AA, "Global "),
            (0x03B6, "End "),
            (0x040E, "Read "),
            (0x0418, "Restore "),
            (0x0426, "Break Off "),
            (0x0444, "Inc "),
            (0x044E, "Dec "),
            (0x0458, "Add "),
            (0x0476, "Print "),
            (0x04D0, "Input "),
            (0x057C, "Upper$"),
            (0x0598, "Str$"),
            (0x0640, "Dim "),
            (op::REM, "REM "),
            (op::REM_QUOTE, "'"),
            (0x0686, "Rnd"),
            (0x06D6, "Pi#"),
            (0x0702, "Sin"),
            (0x070C, "Cos"),
            (0x09EA, "Screen Open "),
            (0x0A04, "Screen Close "),
            (0x0A18, "Screen Display "),
            (0x0B16, "View"),
            (0x0BB8, "Cls "),
            (0x0C6E, "Screen "),
            (0x0C84, "Hires"),
            (0x0C90, "Lowres"),
            (0x0CCA, "Wait Vbl"),
            (0x0D1C, "Colour "),
            (0x0D34, "Flash Off"),
            (0x0D52, "Shift Off"),
            (0x0D62, "Shift Up "),
            (0x0D90, "Set Rainbow "),
            (0x0DD4, "Rainbow Del "),
            (0x0DDC, "Rainbow "),
            (0x0DF0, "Rain"),
            (0x0DFE, "Fade "),
            (0x0EC8, "Bar "),
            (0x0ED8, "Box "),
            (0x1044, "Ink "),
            (0x11F8, "Joy"),
            (0x1202, "Jup"),
            (0x120C, "Jdown"),
            (0x1218, "Jleft"),
            (0x1224, "Jright"),
            (0x1232, "Fire"),
            (0x1290, "Wait Key"),
            (0x129E, "Wait "),
            (0x12CE, "Timer"),
            (0x12F4, "Wind Open "),
            (0x131A, "Wind Close"),
            (0x1351, "Window "),
            (0x135E, "Window "),
            (0x1378, "Locate "),
            (0x1392, "Home"),
            (0x13D2, "Pen "),
            (0x13DC, "Paper "),
            (0x13E8, "Centre "),
            (0x1446, "Curs Off"),
            (0x14B2, "Shade On"),
            (0x1528, "Cdown"),
            (0x1540, "Cright"),
            (0x175A, "Dir$"),
            (0x184E, "Load "),
            (0x185A, "Load "),
            (0x19B0, "Sprite Off "),
            (0x1A26, "Spritebob Col"),
            (0x1A94, "Sprite "),
            (0x1AA8, "Bob Off"),
            (0x1AB6, "Bob Off "),
            (0x1B14, "Bobsprite Col"),
            (0x1B36, "Bob Col"),
            (0x1B46, "Bob Col"),
            (0x1B52, "Col"),
            (0x1B9E, "Bob "),
            (0x1BAE, "Get Sprite Palette"),
            (0x1BD0, "Get Sprite "),
            (0x1CFE, "Paste Bob "),
            (0x1D12, "Paste Icon "),
            (0x1D28, "Make Mask "),
            (0x1DE0, "Hide"),
            (0x1F94, "Channel "),
            (0x1FA2, "Amreg"),
            (0x1FBC, "Amal On "),
            (0x1FCA, "Amal On "),
            (0x1FD2, "Amal Off "),
            (0x1FE2, "Amal Off "),
            (0x1FEA, "Amal Freeze "),
            (0x1FFC, "Amal Freeze "),
            (0x2012, "Amal "),
            (0x2BAE, "Get Bob Palette"),
            (0xFF4C, " or "),
            (0xFF58, " and "),
            (0xFF66, "<>"),
            (0xFF7A, "<="),
            (0xFF8E, ">="),
            (0xFF98, "=>"),
            (0xFFA2, "="),
            (0xFFAC, "<"),
            (0xFFB6, ">"),
            (0xFFC0, "+"),
            (0xFFCA, "-"),
            (0xFFE2, "*"),
            (0xFFEC, "/"),
            (0xFFF6, "^"),
        ] {
            m.insert(opcode, text);
        }
        m
    };

    /// Keyed by (extension module id, signed offset into the module's token table)
    pub static ref EXTENSIONS: HashMap<(u8, i16), &'static str> = {
        let mut m = HashMap::new();
        for (key, text) in [
            // Music
            ((EXT_MUSIC, 0x002C), "Music Off"),
            ((EXT_MUSIC, 0x0058), "Music "),
            ((EXT_MUSIC, 0x0074), "Boom"),
            ((EXT_MUSIC, 0x00F8), "Sam Play "),
            ((EXT_MUSIC, 0x0144), "Play "),
            ((EXT_MUSIC, 0x0196), "Mvolume "),
            // Compact
            ((EXT_COMPACT, 0x0056), "Unpack "),
            // Craft / MUSICraft
            ((EXT_CRAFT, 0x0028), "St Play "),
            ((EXT_CRAFT, 0x0030), "St Stop"),
        ] {
            m.insert(key, text);
        }
        m
    };
}

pub fn lookup(opcode: u16) -> Option<&'static str> {
    TOKENS.get(&opcode).copied()
}

pub fn lookup_extension(module: u8, offset: i16) -> Option<&'static str> {
    EXTENSIONS.get(&(module, offset)).copied()
}
