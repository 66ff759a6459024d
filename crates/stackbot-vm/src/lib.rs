//! Stackbot VM: executes line-oriented string stack programs.
//!
//! Programs are plain lists of instruction lines. The simplest entry point is
//! [`evaluate`], which runs a program against a fixed list of input tokens and
//! returns everything it wrote:
//!
//! ```rust
//! let program = ["READ", "PUSH ', world'", "SWAP 1 2", "CONCAT", "WRITE"];
//! let output = stackbot_vm::evaluate(&program, ["hello"]).unwrap();
//! assert_eq!(output, vec!["hello, world"]);
//! ```
//!
//! Every call parses the program and builds a fresh [`Machine`]; no state
//! survives between calls.

pub mod io;
pub mod stack;
pub mod vm;

pub use io::{BatchInput, Input, LineInput, LineOutput, Output};
pub use stack::Stack;
pub use vm::{Machine, State};

use stackbot_parser::Parser;
use stackbot_syntax::error::Result;
use stackbot_syntax::program::Program;

/// Batch mode: runs `lines` reading from `input` and returns the emitted tokens.
///
/// Output produced before an error is discarded; use [`evaluate_into`] to keep it.
pub fn evaluate<S, T>(lines: &[S], input: T) -> Result<Vec<String>>
where
    S: AsRef<str>,
    T: IntoIterator,
    T::Item: Into<String>,
{
    let mut output = Vec::new();
    evaluate_into(lines, input, &mut output)?;
    Ok(output)
}

/// Batch mode appending to `output`, which keeps whatever was written before
/// a failure.
pub fn evaluate_into<S, T>(lines: &[S], input: T, output: &mut Vec<String>) -> Result<()>
where
    S: AsRef<str>,
    T: IntoIterator,
    T::Item: Into<String>,
{
    evaluate_with(lines, BatchInput::new(input), output)
}

/// Runs `lines` against arbitrary collaborators.
pub fn evaluate_with<S, I, O>(lines: &[S], input: I, output: O) -> Result<()>
where
    S: AsRef<str>,
    I: Input,
    O: Output,
{
    let program = Parser::new(lines).parse_program()?;
    run(&program, input, output)
}

/// Interactive mode: `READ` takes lines from stdin, `WRITE` prints lines to stdout.
pub fn evaluate_interactive<S: AsRef<str>>(lines: &[S]) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    evaluate_with(lines, LineInput::new(stdin.lock()), LineOutput::new(stdout.lock()))
}

/// Executes an already parsed program to completion.
pub fn run<I: Input, O: Output>(program: &Program, input: I, output: O) -> Result<()> {
    Machine::new(program, input, output).run()
}
