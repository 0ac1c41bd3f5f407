#[cfg(test)]
mod tests {
    use crate::config::DecodeOptions;
    use crate::cursor::ByteCursor;
    use crate::detokenizer::{decode_line, FallbackStyle, SourceLine};
    use crate::error::{ErrorKind, Result};
    use crate::float::FloatMode;
    use crate::test_utils::LineBuilder;
    use crate::tokens::{op, EXT_COMPACT, EXT_MUSIC};
    use test_log::test;

    const PRINT: u16 = 0x0476;
    const SEMICOLON: u16 = 0x0064;

    fn decode_bytes(bytes: &[u8], options: DecodeOptions) -> Result<SourceLine> {
        let mut cursor = ByteCursor::new(bytes);
        let line = decode_line(&mut cursor, &options)?;
        assert_eq!(
            cursor.position(),
            bytes.len() as u64,
            "line must consume exactly its own bytes"
        );
        Ok(line)
    }

    fn decode_with(line: LineBuilder, options: DecodeOptions) -> SourceLine {
        let line = decode_bytes(&line.encode(1), options).unwrap();
        assert_eq!(line.words_consumed(), line.declared_words);
        assert_eq!(line.last_opcode(), Some(op::NULL));
        line
    }

    fn decode(line: LineBuilder) -> String {
        decode_with(line, DecodeOptions::default()).text
    }

    #[test]
    fn test_variables_and_type_suffixes() {
        assert_eq!(decode(LineBuilder::new().variable("A", 0)), "A");
        assert_eq!(decode(LineBuilder::new().variable("SCORE", 0x01)), "SCORE#");
        assert_eq!(decode(LineBuilder::new().variable("NAME", 0x02)), "NAME$");
        // Float flag wins over string flag
        assert_eq!(decode(LineBuilder::new().variable("X", 0x03)), "X#");
    }

    #[test]
    fn test_labels_and_calls() {
        assert_eq!(decode(LineBuilder::new().label("MAINLOOP")), "MAINLOOP:");
        assert_eq!(
            decode(LineBuilder::new().procedure_call("DRAW", 0)),
            "DRAW"
        );
        assert_eq!(
            decode(LineBuilder::new().procedure_call("TITLE", 0x02)),
            "TITLE$"
        );
        assert_eq!(decode(LineBuilder::new().label_ref("START", 0)), "START");
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(
            decode(LineBuilder::new().double_quoted("Hello")),
            "\"Hello\""
        );
        assert_eq!(decode(LineBuilder::new().single_quoted("ab")), "'ab'");
        assert_eq!(decode(LineBuilder::new().double_quoted("")), "\"\"");
    }

    #[test]
    fn test_latin1_string() {
        let line = LineBuilder::new().token(op::DOUBLE_QUOTED).raw(&[0, 2, b'c', 0xE9]);
        assert_eq!(decode(line), "\"c\u{e9}\"");
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(decode(LineBuilder::new().binary(5)), "%101");
        assert_eq!(decode(LineBuilder::new().hex(255)), "$ff");
        assert_eq!(decode(LineBuilder::new().hex(-1)), "$ffffffff");
        assert_eq!(decode(LineBuilder::new().decimal(-42)), "-42");
        assert_eq!(decode(LineBuilder::new().decimal(0)), "0");
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(
            decode(LineBuilder::new().float_bytes([0x80, 0x00, 0x00, 0x41])),
            "1.0"
        );
        assert_eq!(
            decode(LineBuilder::new().float_bytes([0xC0, 0x00, 0x00, 0x41])),
            "1.5"
        );
        assert_eq!(
            decode(LineBuilder::new().float_bytes([0x80, 0x00, 0x00, 0xC2])),
            "-2.0"
        );
    }

    #[test]
    fn test_float_literals_stay_positional() {
        // 0.59604645 * 2^24
        assert_eq!(
            decode(LineBuilder::new().float_bytes([0x98, 0x96, 0x80, 0x58])),
            "10000000.0"
        );
        // 0.5 * 2^-9
        assert_eq!(
            decode(LineBuilder::new().float_bytes([0x80, 0x00, 0x00, 0x37])),
            "0.0009765625"
        );
    }

    #[test]
    fn test_float_mode_changes_rendering_not_width() {
        let options = DecodeOptions {
            float_mode: FloatMode::Ieee,
            ..DecodeOptions::default()
        };
        let ieee = decode_with(
            LineBuilder::new().float_bytes([0x3F, 0x80, 0x00, 0x00]),
            options,
        );
        assert_eq!(ieee.text, "1.0");
        let amos = decode_with(
            LineBuilder::new().float_bytes([0x3F, 0x80, 0x00, 0x00]),
            DecodeOptions::default(),
        );
        assert_ne!(amos.text, "1.0");
        assert_eq!(ieee.declared_words, amos.declared_words);
    }

    #[test]
    fn test_extension_commands() {
        assert_eq!(decode(LineBuilder::new().extension(EXT_MUSIC, 0x58)), "Music ");
        assert_eq!(decode(LineBuilder::new().extension(EXT_COMPACT, 0x56)), "Unpack ");
        assert_eq!(
            decode(LineBuilder::new().extension(7, 0x10)),
            "[ext7(0x10)]"
        );
    }

    #[test]
    fn test_fixed_width_keywords() {
        let cases = [
            (op::FOR, "For "),
            (op::REPEAT, "Repeat"),
            (op::WHILE, "While "),
            (op::DO, "Do "),
            (op::IF, "If "),
            (op::ELSE, " Else "),
            (op::DATA, "Data "),
            (op::EXIT_IF, "Exit If "),
            (op::EXIT, "Exit "),
            (op::ON, "On "),
            (op::PROCEDURE, "Procedure "),
        ];
        for (opcode, text) in cases {
            let line = decode_with(LineBuilder::new().keyword(opcode), DecodeOptions::default());
            assert_eq!(line.text, text, "opcode {:#06x}", opcode);
        }
    }

    #[test]
    fn test_procedure_skips_four_words() {
        let line = decode_with(
            LineBuilder::new().keyword(op::PROCEDURE).procedure_call("INIT", 0),
            DecodeOptions::default(),
        );
        assert_eq!(line.text, "Procedure INIT");
        assert_eq!(line.opcodes[0].words, 5);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            decode(LineBuilder::new().rem(op::REM, "hello")),
            "REM hello"
        );
        assert_eq!(decode(LineBuilder::new().rem(op::REM_QUOTE, "x")), "'x");
        assert_eq!(decode(LineBuilder::new().rem(op::REM, "")), "REM ");
    }

    #[test]
    fn test_indent() {
        let bytes = LineBuilder::new().token(PRINT).encode(3);
        assert_eq!(decode_bytes(&bytes, DecodeOptions::default()).unwrap().text, "  Print ");
        let bytes = LineBuilder::new().token(PRINT).encode(0);
        assert_eq!(decode_bytes(&bytes, DecodeOptions::default()).unwrap().text, "Print ");
    }

    #[test]
    fn test_mixed_line() {
        let line = decode_with(
            LineBuilder::new()
                .token(PRINT)
                .double_quoted("HI")
                .token(SEMICOLON)
                .variable("A", 0),
            DecodeOptions::default(),
        );
        assert_eq!(line.text, "Print \"HI\";A");
        let opcodes: Vec<u16> = line.opcodes.iter().map(|o| o.opcode).collect();
        assert_eq!(
            opcodes,
            vec![PRINT, op::DOUBLE_QUOTED, SEMICOLON, op::VARIABLE, op::NULL]
        );
        assert_eq!(line.opcodes[0].words, 1);
        assert_eq!(line.opcodes[1].words, 3);
        assert_eq!(line.opcodes[3].words, 4);
    }

    #[test]
    fn test_unknown_opcode_fallbacks() {
        let line = || LineBuilder::new().token(PRINT).token(0x7776);
        assert_eq!(decode(line()), "Print [0x7776]");

        let options = DecodeOptions {
            unknown_opcode: FallbackStyle::Permissive,
            ..DecodeOptions::default()
        };
        assert_eq!(decode_with(line(), options).text, "Print  0x7776");
    }

    #[test]
    fn test_empty_line() {
        let line = decode_bytes(&[1, 1], DecodeOptions::default()).unwrap();
        assert_eq!(line.text, "");
        assert!(line.opcodes.is_empty());
    }

    #[test]
    fn test_zero_length_line_is_corrupt() {
        let err = decode_bytes(&[0, 1, 0, 0], DecodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStream);
    }

    #[test]
    fn test_unterminated_line_is_corrupt() {
        let bytes = LineBuilder::new().token(PRINT).unterminated().encode(1);
        let err = decode_bytes(&bytes, DecodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStream);
        assert!(err.to_string().contains("Print"), "{}", err);
    }

    #[test]
    fn test_payload_overrunning_declared_length_is_corrupt() {
        // Declares 2 words, but the decimal literal needs 3
        let bytes = [2, 1, 0x00, 0x3E, 0x00, 0x00, 0x00, 0x07];
        let err = decode_bytes(&bytes, DecodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStream);
    }

    #[test]
    fn test_truncated_line_is_incomplete() {
        let bytes = [4, 1, 0x00, 0x3E, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&bytes[..]);
        let err = decode_line(&mut cursor, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteRead);
    }
}
