//! Stackbot parser: turns program lines into a [`Program`](stackbot_syntax::Program).

pub mod literal;
pub mod parser;

pub use parser::{collect_labels, parse_line, parse_source, Parser};

#[cfg(test)]
mod tests {
    use super::*;
    use stackbot_syntax::error::ErrorKind;
    use stackbot_syntax::instruction::Instruction;

    fn parse_ok(text: &str) -> Instruction {
        parse_line(text, 1).expect("Parsing should succeed")
    }

    fn parse_err(text: &str) -> ErrorKind {
        parse_line(text, 7).expect_err("Parsing should fail").kind
    }

    #[test]
    fn test_blank_and_label_lines() {
        assert_eq!(parse_ok(""), Instruction::Nop);
        assert_eq!(parse_ok("   \t "), Instruction::Nop);
        assert_eq!(parse_ok("LABEL start"), Instruction::Label("start".to_string()));
        assert_eq!(parse_ok("  LABEL   start  extra"), Instruction::Label("start".to_string()));
        assert!(matches!(parse_err("LABEL"), ErrorKind::MalformedArgument(_)));
    }

    #[test]
    fn test_push_literals() {
        assert_eq!(parse_ok("PUSH 'x'"), Instruction::Push("x".to_string()));
        assert_eq!(parse_ok("PUSH 'it''s'"), Instruction::Push("it's".to_string()));
        assert_eq!(parse_ok("PUSH 'a b  c'"), Instruction::Push("a b  c".to_string()));
        assert_eq!(parse_ok("PUSH    'padded'"), Instruction::Push("padded".to_string()));
        assert_eq!(parse_ok("PUSH ''"), Instruction::Push(String::new()));
        assert!(matches!(parse_err("PUSH 'open"), ErrorKind::MalformedLiteral(_)));
        assert!(matches!(parse_err("PUSH bare"), ErrorKind::MalformedLiteral(_)));
        assert!(matches!(parse_err("PUSH"), ErrorKind::MalformedLiteral(_)));
    }

    #[test]
    fn test_operand_free_opcodes() {
        assert_eq!(parse_ok("POP"), Instruction::Pop);
        assert_eq!(parse_ok("READ"), Instruction::Read);
        assert_eq!(parse_ok("WRITE"), Instruction::Write);
        assert_eq!(parse_ok("CONCAT"), Instruction::Concat);
        assert_eq!(parse_ok("REPLACEONE"), Instruction::ReplaceOne);
    }

    #[test]
    fn test_depth_arguments() {
        assert_eq!(parse_ok("SWAP 1 2"), Instruction::Swap(1, 2));
        assert_eq!(parse_ok("SWAP   3\t1"), Instruction::Swap(3, 1));
        assert_eq!(parse_ok("COPY 4"), Instruction::Copy(4));

        for bad in ["SWAP 1", "SWAP 1 2 3", "SWAP a 1", "SWAP 0 1", "SWAP -1 2", "COPY", "COPY 0", "COPY x", "COPY 1 2"] {
            assert!(matches!(parse_err(bad), ErrorKind::MalformedArgument(_)), "{}", bad);
        }
    }

    #[test]
    fn test_jump_forms() {
        assert_eq!(parse_ok("JMP"), Instruction::Jmp(None));
        assert_eq!(parse_ok("JMP loop"), Instruction::Jmp(Some("loop".to_string())));
        assert!(matches!(parse_err("JMP a b"), ErrorKind::MalformedArgument(_)));
    }

    #[test]
    fn test_unknown_opcodes_are_noops() {
        assert_eq!(parse_ok("HALT"), Instruction::Nop);
        assert_eq!(parse_ok("push 'lowercase'"), Instruction::Nop);
        assert_eq!(parse_ok("LABELX foo"), Instruction::Nop);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let lines = ["PUSH 'ok'", "", "COPY zero"];
        let err = Parser::new(&lines).parse_program().unwrap_err();
        assert_eq!(err.line, Some(3));
    }

    #[test]
    fn test_label_table_covers_forward_and_backward_targets() {
        let lines = ["LABEL top", "JMP bottom", "PUSH 'skipped'", "LABEL bottom", "JMP top"];
        let program = Parser::new(&lines).parse_program().unwrap();
        assert_eq!(program.len(), 5);
        assert_eq!(program.resolve("top"), Some(0));
        assert_eq!(program.resolve("bottom"), Some(3));
    }

    #[test]
    fn test_duplicate_labels_last_wins() {
        let program = parse_source("LABEL a\nPOP\nLABEL a\n").unwrap();
        assert_eq!(program.resolve("a"), Some(2));
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        let src = "LABEL l\nPUSH 'it''s here'\nSWAP 2 1\nCOPY 3\nJMP\nJMP l\nREPLACEONE\n";
        let program = parse_source(src).unwrap();
        for (i, instr) in program.instructions().iter().enumerate() {
            let rendered = instr.to_string();
            assert_eq!(&parse_line(&rendered, i + 1).unwrap(), instr, "{}", rendered);
        }
    }
}
