//! Instruction set for the Stackbot machine.

use std::fmt;

/// One parsed program line.
///
/// Arguments are parsed once, up front: `Push` holds the unescaped literal and
/// `Swap`/`Copy` hold 1-based depths measured from the top of the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Blank line or unrecognized opcode.
    Nop,
    /// `LABEL name`: jump target, no runtime effect.
    Label(String),

    // Stack
    Push(String),
    Pop,
    Swap(usize, usize),
    Copy(usize),

    // I/O
    Read,
    Write,

    // Strings
    Concat,
    ReplaceOne,

    // Control flow; `None` pops the target label off the stack
    Jmp(Option<String>),
}

impl Instruction {
    /// Upper-case opcode as written in source, or `None` for [`Instruction::Nop`].
    pub fn opcode(&self) -> Option<&'static str> {
        Some(match self {
            Instruction::Nop => return None,
            Instruction::Label(_) => "LABEL",
            Instruction::Push(_) => "PUSH",
            Instruction::Pop => "POP",
            Instruction::Swap(..) => "SWAP",
            Instruction::Copy(_) => "COPY",
            Instruction::Read => "READ",
            Instruction::Write => "WRITE",
            Instruction::Concat => "CONCAT",
            Instruction::ReplaceOne => "REPLACEONE",
            Instruction::Jmp(_) => "JMP",
        })
    }

    /// Whether executing this instruction never touches the machine state.
    pub fn is_noop(&self) -> bool {
        matches!(self, Instruction::Nop | Instruction::Label(_))
    }
}

/// Renders the canonical source form; `PUSH` literals are re-quoted with
/// embedded `'` doubled.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Nop => Ok(()),
            Instruction::Label(name) => write!(f, "LABEL {}", name),
            Instruction::Push(lit) => write!(f, "PUSH '{}'", lit.replace('\'', "''")),
            Instruction::Swap(i, j) => write!(f, "SWAP {} {}", i, j),
            Instruction::Copy(i) => write!(f, "COPY {}", i),
            Instruction::Jmp(Some(label)) => write!(f, "JMP {}", label),
            other => f.write_str(other.opcode().unwrap_or_default()),
        }
    }
}
