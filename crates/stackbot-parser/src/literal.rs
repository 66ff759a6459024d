//! Quoted string literals used by `PUSH`.
//!
//! A literal is delimited by `'`. Inside it, `''` stands for one `'`; every
//! other character, spaces included, is taken verbatim.

use stackbot_syntax::error::{ErrorKind, Result, error};

/// Strips the delimiting quotes from `text` and collapses doubled quotes.
///
/// Only whitespace may follow the closing quote.
pub fn unquote(text: &str) -> Result<String> {
    let mut chars = text.chars().peekable();
    if chars.next() != Some('\'') {
        return error(ErrorKind::MalformedLiteral(format!(
            "expected a quoted literal, found '{}'",
            text
        )));
    }

    let mut out = String::new();
    loop {
        match chars.next() {
            Some('\'') if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            Some('\'') => break,
            Some(c) => out.push(c),
            None => return error(ErrorKind::MalformedLiteral(format!("unterminated literal {}", text))),
        }
    }

    let rest: String = chars.collect();
    if !rest.trim().is_empty() {
        return error(ErrorKind::MalformedLiteral(format!(
            "unexpected text '{}' after closing quote",
            rest.trim()
        )));
    }
    Ok(out)
}
