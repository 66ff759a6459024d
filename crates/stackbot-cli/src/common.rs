use owo_colors::{OwoColorize, Stream::Stderr};
use stackbot_syntax::error::{Error, ErrorKind};

/// Prints `err` to stderr with the offending program line, if known.
pub fn render_error(stage: &str, path: &str, source: &[&str], err: &Error) {
    let title = format!("{} error[{}]", stage, err.kind.name());
    eprintln!(
        "{}: {}",
        title.if_supports_color(Stderr, |t| t.red().bold().to_string()),
        err.kind.if_supports_color(Stderr, |t| t.red())
    );
    if let Some(line) = err.line {
        eprintln!("  --> {}:{}", path, line);
        if let Some(src_line) = line.checked_sub(1).and_then(|i| source.get(i)) {
            let gutter = format!("{:4} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", gutter.if_supports_color(Stderr, |t| t.bright_black()), src_line);
            eprintln!("     |");
        }
    }
    provide_error_suggestions(&err.kind);
}

pub fn provide_error_suggestions(kind: &ErrorKind) {
    let (help, example) = match kind {
        ErrorKind::EmptyStack(_) => (
            "The instruction needs more values than the stack holds.",
            "Push or READ operands first: PUSH 'a' / PUSH 'b' / CONCAT",
        ),
        ErrorKind::UndefinedLabel(_) => (
            "Every jump target needs a matching LABEL line. Label names are case-sensitive.",
            "LABEL loop ... JMP loop",
        ),
        ErrorKind::MalformedArgument(msg) if msg.contains("pattern") => (
            "REPLACEONE treats its pattern as a regular expression.",
            "Escape special characters such as ( [ . * with a backslash",
        ),
        ErrorKind::MalformedArgument(_) => (
            "Depths are positive integers counted from the top of the stack (1 = top).",
            "SWAP 1 2 / COPY 1",
        ),
        ErrorKind::ExhaustedInput => (
            "READ ran after the last input line was consumed.",
            "Supply more input lines, or pass --input <file>",
        ),
        ErrorKind::MalformedLiteral(_) => (
            "PUSH takes one literal in single quotes; write '' for a quote inside it.",
            "PUSH 'it''s quoted'",
        ),
        ErrorKind::Io(_) => (
            "Reading input or writing output failed.",
            "Check that stdin/stdout are still open",
        ),
    };
    eprintln!("{} {}", "Help:".if_supports_color(Stderr, |t| t.yellow()), help);
    eprintln!("    {}", example.if_supports_color(Stderr, |t| t.bright_black()));
}
