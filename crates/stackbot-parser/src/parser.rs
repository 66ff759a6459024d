//! Line-oriented parser: source lines to a [`Program`].

use log::{debug, warn};
use stackbot_syntax::error::{Error, ErrorKind, Result, error_at};
use stackbot_syntax::instruction::Instruction;
use stackbot_syntax::program::{LabelTable, Program};

use crate::literal::unquote;

/// Parses an ordered list of program lines.
///
/// Line numbers in errors are 1-based; instruction indices are 0-based.
pub struct Parser<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    pub fn new<S: AsRef<str>>(lines: &'a [S]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.as_ref()).collect(),
        }
    }

    /// Parses every line, then builds the label table from the result.
    pub fn parse_program(&self) -> Result<Program> {
        let instructions = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, text)| parse_line(text, i + 1))
            .collect::<Result<Vec<_>>>()?;
        let labels = collect_labels(&instructions);
        Ok(Program::new(instructions, labels))
    }
}

/// Parses a whole source text, one instruction per line.
pub fn parse_source(src: &str) -> Result<Program> {
    let lines: Vec<&str> = src.lines().collect();
    Parser::new(&lines).parse_program()
}

/// Parses a single line. `line` is only used to locate errors.
pub fn parse_line(text: &str, line: usize) -> Result<Instruction> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Instruction::Nop);
    }
    let (op, rest) = match text.split_once(char::is_whitespace) {
        Some((op, rest)) => (op, rest.trim_start()),
        None => (text, ""),
    };

    let instr = match op {
        "LABEL" => match rest.split_whitespace().next() {
            Some(name) => Instruction::Label(name.to_string()),
            None => return error_at(line, ErrorKind::MalformedArgument("LABEL needs a name".to_string())),
        },
        "PUSH" => Instruction::Push(unquote(rest).map_err(|e| e.at_line(line))?),
        "POP" => Instruction::Pop,
        "READ" => Instruction::Read,
        "WRITE" => Instruction::Write,
        "CONCAT" => Instruction::Concat,
        "REPLACEONE" => Instruction::ReplaceOne,
        "SWAP" => {
            let d = parse_depths::<2>(op, rest, line)?;
            Instruction::Swap(d[0], d[1])
        }
        "COPY" => {
            let d = parse_depths::<1>(op, rest, line)?;
            Instruction::Copy(d[0])
        }
        "JMP" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (None, _) => Instruction::Jmp(None),
                (Some(label), None) => Instruction::Jmp(Some(label.to_string())),
                (Some(_), Some(_)) => {
                    return error_at(
                        line,
                        ErrorKind::MalformedArgument(format!("JMP takes at most one label, got '{}'", rest)),
                    )
                }
            }
        }
        other => {
            warn!("line {}: unknown opcode '{}' ignored", line, other);
            Instruction::Nop
        }
    };
    Ok(instr)
}

/// Parses exactly `N` whitespace-separated positive depths.
fn parse_depths<const N: usize>(op: &str, rest: &str, line: usize) -> Result<[usize; N]> {
    let malformed = |msg: String| Error::with_line(ErrorKind::MalformedArgument(msg), line);

    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() != N {
        return Err(malformed(format!(
            "{} expects {} depth argument(s), got {}",
            op,
            N,
            parts.len()
        )));
    }

    let mut depths = [0usize; N];
    for (slot, part) in depths.iter_mut().zip(&parts) {
        *slot = match part.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => return Err(malformed(format!("{} depth must be a positive integer, got '{}'", op, part))),
        };
    }
    Ok(depths)
}

/// Maps every `LABEL` to its instruction index. A repeated name keeps the
/// last declaration.
pub fn collect_labels(instructions: &[Instruction]) -> LabelTable {
    let mut labels = LabelTable::new();
    for (i, instr) in instructions.iter().enumerate() {
        if let Instruction::Label(name) = instr {
            if let Some(prev) = labels.insert(name.clone(), i) {
                warn!(
                    "label '{}' declared on lines {} and {}; the last declaration wins",
                    name,
                    prev + 1,
                    i + 1
                );
            }
        }
    }
    debug!("resolved {} label(s)", labels.len());
    labels
}
