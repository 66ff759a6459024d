//! Shared definitions for the Stackbot toolchain.
//!
//! The parser produces [`Program`]s made of [`Instruction`]s, the VM executes
//! them, and every stage reports failures through [`Error`].

pub mod error;
pub mod instruction;
pub mod program;

pub use error::*;
pub use instruction::*;
pub use program::*;
