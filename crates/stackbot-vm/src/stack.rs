//! # String stack
//! The machine keeps one LIFO stack of strings. Instructions address it by
//! *depth*, counted from the top starting at 1:
//!
//! | **Depth** | 1 | 2 | 3 | ... |
//! | --------- | - | - | - | --- |
//! | **Value** | most recent push | the one below | ... | oldest |

use std::fmt;

use stackbot_syntax::error::{ErrorKind, Result, error};

/// LIFO stack of strings with top-relative addressing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    items: Vec<String>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, value: String) {
        self.items.push(value);
    }

    /// Removes and returns the top element.
    pub fn pop(&mut self) -> Result<String> {
        match self.items.pop() {
            Some(v) => Ok(v),
            None => error(ErrorKind::EmptyStack("pop from an empty stack".to_string())),
        }
    }

    /// Returns the top element without removing it.
    pub fn peek(&self) -> Result<&str> {
        match self.items.last() {
            Some(v) => Ok(v.as_str()),
            None => error(ErrorKind::EmptyStack("peek at an empty stack".to_string())),
        }
    }

    /// Fails unless at least `n` elements are present, so that `op` can pop
    /// all of its operands without leaving the stack half consumed.
    pub fn require(&self, n: usize, op: &str) -> Result<()> {
        if self.items.len() < n {
            return error(ErrorKind::EmptyStack(format!(
                "{} needs {} element(s), stack has {}",
                op,
                n,
                self.items.len()
            )));
        }
        Ok(())
    }

    /// Element at `depth` (1 = top).
    pub fn get(&self, depth: usize) -> Result<&str> {
        let i = self.slot(depth)?;
        Ok(self.items[i].as_str())
    }

    /// Exchanges the elements at depths `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        let a = self.slot(i)?;
        let b = self.slot(j)?;
        self.items.swap(a, b);
        Ok(())
    }

    /// Pushes a duplicate of the element at `depth`.
    pub fn copy(&mut self, depth: usize) -> Result<()> {
        let v = self.get(depth)?.to_string();
        self.items.push(v);
        Ok(())
    }

    /// Elements from the top down.
    pub fn iter_from_top(&self) -> impl Iterator<Item = &str> {
        self.items.iter().rev().map(String::as_str)
    }

    fn slot(&self, depth: usize) -> Result<usize> {
        if self.items.is_empty() {
            return error(ErrorKind::EmptyStack(format!("depth {} on an empty stack", depth)));
        }
        if depth == 0 || depth > self.items.len() {
            return error(ErrorKind::MalformedArgument(format!(
                "depth {} exceeds stack size {}",
                depth,
                self.items.len()
            )));
        }
        Ok(self.items.len() - depth)
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.iter_from_top().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", v)?;
        }
        f.write_str("]")
    }
}

impl<S: Into<String>> FromIterator<S> for Stack {
    /// Builds a stack by pushing the items in order; the last one ends on top.
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}
