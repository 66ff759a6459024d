mod common;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use owo_colors::{OwoColorize, Stream::Stderr, Stream::Stdout};
use stackbot_parser::Parser as ProgramParser;
use stackbot_syntax::program::Program;
use stackbot_vm::{BatchInput, LineInput, LineOutput};

use crate::common::render_error;

#[derive(Parser, Debug)]
#[command(name = "stackbot", version, about = "Run Stackbot string stack programs")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Program to run interactively (shorthand for `stackbot run <FILE>`)
    file: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG applies otherwise.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a program
    Run {
        file: PathBuf,

        /// Read input tokens from this file (one per line) instead of stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },
    /// Parse a program and report labels and unresolved jump targets
    Check { file: PathBuf },
    /// Print every instruction in canonical form with its index
    List { file: PathBuf },
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn fail(msg: String) -> ! {
    eprintln!("{}: {}", "error".if_supports_color(Stderr, |t| t.red().bold().to_string()), msg);
    process::exit(1);
}

fn read_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => fail(format!("Failed to read {}: {}", path.display(), e)),
    }
}

/// Loads and parses `path`, exiting with a rendered error on failure.
fn load(path: &Path, src: &str) -> Program {
    let lines: Vec<&str> = src.lines().collect();
    match ProgramParser::new(&lines).parse_program() {
        Ok(p) => p,
        Err(e) => {
            render_error("Parse", &path.display().to_string(), &lines, &e);
            process::exit(1);
        }
    }
}

fn run(path: &Path, input: Option<&Path>) {
    let src = read_file(path);
    let program = load(path, &src);
    let stdout = io::stdout();
    let output = LineOutput::new(stdout.lock());

    let result = match input {
        Some(input_path) => {
            let tokens = read_file(input_path);
            stackbot_vm::run(&program, BatchInput::new(tokens.lines()), output)
        }
        None => {
            let stdin = io::stdin();
            stackbot_vm::run(&program, LineInput::new(stdin.lock()), output)
        }
    };

    if let Err(e) = result {
        let lines: Vec<&str> = src.lines().collect();
        render_error("Runtime", &path.display().to_string(), &lines, &e);
        process::exit(1);
    }
}

fn check(path: &Path) {
    let src = read_file(path);
    let program = load(path, &src);

    let labels = program.labels();
    if labels.is_empty() {
        println!("{}", "<no labels>".if_supports_color(Stdout, |t| t.dimmed()));
    }
    for (name, index) in labels {
        println!("{} -> line {}", name.if_supports_color(Stdout, |t| t.yellow()), index + 1);
    }

    let unresolved = program.unresolved_jumps();
    if unresolved.is_empty() {
        println!("{}", "ok".if_supports_color(Stdout, |t| t.green()));
        return;
    }
    for (index, label) in &unresolved {
        eprintln!(
            "{}: line {} jumps to undefined label '{}'",
            "warning".if_supports_color(Stderr, |t| t.yellow()),
            index + 1,
            label
        );
    }
    process::exit(1);
}

fn list(path: &Path) {
    let src = read_file(path);
    let program = load(path, &src);
    for (i, instr) in program.instructions().iter().enumerate() {
        let index = format!("{:4}", i);
        println!("{}  {}", index.if_supports_color(Stdout, |t| t.bright_black()), instr);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match (cli.command, cli.file) {
        (Some(Command::Run { file, input }), _) => run(&file, input.as_deref()),
        (Some(Command::Check { file }), _) => check(&file),
        (Some(Command::List { file }), _) => list(&file),
        (None, Some(file)) => run(&file, None),
        (None, None) => fail("no program given; try `stackbot --help`".to_string()),
    }
}
