//! Error handling types and utilities for the Stackbot toolchain.
//!
//! Every failure in Stackbot is fatal: the parser and the VM stop at the first
//! error and hand it back to the caller. Errors carry an [`ErrorKind`] that
//! says what went wrong and, when known, the 1-based program line that caused
//! it.
//!
//! # Examples
//!
//! ```rust
//! use stackbot_syntax::error::{ErrorKind, Result, error_at};
//!
//! fn depth(text: &str, line: usize) -> Result<usize> {
//!     match text.parse::<usize>() {
//!         Ok(n) if n > 0 => Ok(n),
//!         _ => error_at(line, ErrorKind::MalformedArgument(format!("bad depth '{}'", text))),
//!     }
//! }
//!
//! let err = depth("zero", 3).unwrap_err();
//! assert_eq!(err.line, Some(3));
//! assert_eq!(err.to_string(), "malformed argument: bad depth 'zero' at line 3");
//! ```

use std::fmt;

use thiserror::Error as ThisError;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorKind {
    /// A pop or peek found fewer elements than the instruction needs.
    #[error("stack underflow: {0}")]
    EmptyStack(String),

    /// A jump named a label that the program never declares.
    #[error("undefined label '{0}'")]
    UndefinedLabel(String),

    /// An instruction argument could not be used: not a positive integer,
    /// deeper than the stack, or otherwise unusable.
    #[error("malformed argument: {0}")]
    MalformedArgument(String),

    /// `READ` ran after the input source ran dry.
    #[error("input exhausted")]
    ExhaustedInput,

    /// A `PUSH` literal is not a well-formed quoted string.
    #[error("malformed literal: {0}")]
    MalformedLiteral(String),

    /// An injected input or output collaborator failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl ErrorKind {
    /// Short category name used when rendering errors to users.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::EmptyStack(_) => "EmptyStack",
            ErrorKind::UndefinedLabel(_) => "UndefinedLabel",
            ErrorKind::MalformedArgument(_) => "MalformedArgument",
            ErrorKind::ExhaustedInput => "ExhaustedInput",
            ErrorKind::MalformedLiteral(_) => "MalformedLiteral",
            ErrorKind::Io(_) => "Io",
        }
    }
}

/// An error raised while parsing or executing a Stackbot program.
///
/// `line` is the 1-based index of the program line responsible, or `None`
/// when the failure has no single source line (for example a collaborator
/// failing outside of any instruction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub line: Option<usize>,
}

impl Error {
    /// Creates an error without source location.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, line: None }
    }

    /// Creates an error attributed to a 1-based program line.
    pub fn with_line(kind: ErrorKind, line: usize) -> Self {
        Self {
            kind,
            line: Some(line),
        }
    }

    /// Attaches a line number unless one is already present.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line.get_or_insert(line);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(l) => write!(f, "{} at line {}", self.kind, l),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(e.to_string()))
    }
}

/// A specialized `Result` type for Stackbot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind))`.
pub fn error<T>(kind: ErrorKind) -> Result<T> {
    Err(Error::new(kind))
}

/// Shorthand for `Err(Error::with_line(kind, line))`.
pub fn error_at<T>(line: usize, kind: ErrorKind) -> Result<T> {
    Err(Error::with_line(kind, line))
}
