//! Input and output collaborators.
//!
//! `READ` and `WRITE` never touch a console or buffer directly: the machine
//! is handed one [`Input`] and one [`Output`] when it is created. Batch
//! evaluation uses an in-memory token list and a `Vec<String>`; interactive
//! evaluation uses line-based readers and writers.

use std::io::{BufRead, Write};

use stackbot_syntax::error::Result;

/// Source of tokens for `READ`.
pub trait Input {
    /// Next token, or `None` once the source is exhausted.
    fn next_token(&mut self) -> Result<Option<String>>;
}

/// Sink for tokens emitted by `WRITE`.
pub trait Output {
    fn emit(&mut self, token: &str) -> Result<()>;
}

impl<T: Input + ?Sized> Input for &mut T {
    fn next_token(&mut self) -> Result<Option<String>> {
        (**self).next_token()
    }
}

impl<T: Output + ?Sized> Output for &mut T {
    fn emit(&mut self, token: &str) -> Result<()> {
        (**self).emit(token)
    }
}

/// Pre-supplied input tokens, consumed front to back.
#[derive(Debug, Clone)]
pub struct BatchInput {
    tokens: std::vec::IntoIter<String>,
}

impl BatchInput {
    pub fn new<T>(tokens: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect::<Vec<_>>().into_iter(),
        }
    }
}

impl Input for BatchInput {
    fn next_token(&mut self) -> Result<Option<String>> {
        Ok(self.tokens.next())
    }
}

impl Output for Vec<String> {
    fn emit(&mut self, token: &str) -> Result<()> {
        self.push(token.to_string());
        Ok(())
    }
}

/// Reads one token per line. End of stream exhausts the input.
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Input for LineInput<R> {
    fn next_token(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Writes each token on its own line and flushes, so prompts interleave
/// correctly with interactive input.
pub struct LineOutput<W> {
    writer: W,
}

impl<W: Write> LineOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for LineOutput<W> {
    fn emit(&mut self, token: &str) -> Result<()> {
        writeln!(self.writer, "{}", token)?;
        self.writer.flush()?;
        Ok(())
    }
}
