//! Stackbot VM core.

use std::collections::HashMap;

use log::{debug, trace};
use regex::Regex;
use stackbot_syntax::error::{Error, ErrorKind, Result, error};
use stackbot_syntax::instruction::Instruction;
use stackbot_syntax::program::Program;

use crate::io::{Input, Output};
use crate::stack::Stack;

/// Whether the machine can execute another instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    /// The program counter ran past the last instruction.
    Halted,
}

/// Execution state for one run of one program.
///
/// A machine is created per evaluation and owns its stack and program
/// counter; the program and both collaborators are only borrowed.
pub struct Machine<'p, I, O> {
    program: &'p Program,
    stack: Stack,
    pc: usize,
    input: I,
    output: O,
    patterns: HashMap<String, Regex>,
}

impl<'p, I: Input, O: Output> Machine<'p, I, O> {
    pub fn new(program: &'p Program, input: I, output: O) -> Self {
        Self {
            program,
            stack: Stack::new(),
            pc: 0,
            input,
            output,
            patterns: HashMap::new(),
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn state(&self) -> State {
        if self.pc < self.program.len() {
            State::Running
        } else {
            State::Halted
        }
    }

    /// Runs until the program counter falls off the end of the program.
    ///
    /// There is no step limit: a program that jumps forever never returns.
    /// Hosts that need a bound should drive [`Machine::step`] themselves.
    pub fn run(&mut self) -> Result<()> {
        while self.step()? == State::Running {}
        Ok(())
    }

    /// Executes the instruction at the program counter.
    ///
    /// Errors are attributed to the 1-based line of that instruction.
    pub fn step(&mut self) -> Result<State> {
        let program = self.program;
        let instr = match program.get(self.pc) {
            Some(instr) => instr,
            None => return Ok(State::Halted),
        };
        trace!("pc={} {} stack={}", self.pc, instr, self.stack);
        let line = self.pc + 1;
        self.execute(instr).map_err(|e| e.at_line(line))?;
        Ok(self.state())
    }

    fn execute(&mut self, instr: &Instruction) -> Result<()> {
        match instr {
            Instruction::Nop | Instruction::Label(_) => {}
            Instruction::Push(lit) => self.stack.push(lit.clone()),
            Instruction::Pop => {
                self.stack.pop()?;
            }
            Instruction::Read => {
                let token = self
                    .input
                    .next_token()?
                    .ok_or_else(|| Error::new(ErrorKind::ExhaustedInput))?;
                self.stack.push(token);
            }
            Instruction::Write => {
                let top = self.stack.peek()?;
                self.output.emit(top)?;
            }
            Instruction::Swap(i, j) => self.stack.swap(*i, *j)?,
            Instruction::Copy(depth) => self.stack.copy(*depth)?,
            Instruction::Concat => {
                self.stack.require(2, "CONCAT")?;
                let mut a = self.stack.pop()?;
                let b = self.stack.pop()?;
                a.push_str(&b);
                self.stack.push(a);
            }
            Instruction::ReplaceOne => {
                self.stack.require(4, "REPLACEONE")?;
                let mark = self.stack.pop()?;
                let pattern = self.stack.pop()?;
                let replacement = self.stack.pop()?;
                let subject = self.stack.pop()?;
                match self.replace_first(&pattern, &subject, &replacement)? {
                    Some(replaced) => self.stack.push(replaced),
                    None => {
                        self.stack.push(subject);
                        return self.jump(&mark);
                    }
                }
            }
            Instruction::Jmp(Some(label)) => return self.jump(label),
            Instruction::Jmp(None) => {
                let label = self.stack.pop()?;
                return self.jump(&label);
            }
        }
        self.pc += 1;
        Ok(())
    }

    /// Moves the program counter onto the line declaring `label`.
    fn jump(&mut self, label: &str) -> Result<()> {
        match self.program.resolve(label) {
            Some(target) => {
                debug!("jump {} -> {} ('{}')", self.pc, target, label);
                self.pc = target;
                Ok(())
            }
            None => error(ErrorKind::UndefinedLabel(label.to_string())),
        }
    }

    /// `subject` with the first match of `pattern` replaced by the literal
    /// `replacement`, or `None` when nothing matches.
    fn replace_first(&mut self, pattern: &str, subject: &str, replacement: &str) -> Result<Option<String>> {
        if !self.patterns.contains_key(pattern) {
            let re = Regex::new(pattern).map_err(|e| {
                Error::new(ErrorKind::MalformedArgument(format!("invalid pattern '{}': {}", pattern, e)))
            })?;
            self.patterns.insert(pattern.to_string(), re);
        }
        let re = &self.patterns[pattern];
        Ok(re.find(subject).map(|m| {
            let mut out = String::with_capacity(subject.len() - m.len() + replacement.len());
            out.push_str(&subject[..m.start()]);
            out.push_str(replacement);
            out.push_str(&subject[m.end()..]);
            out
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BatchInput;
    use stackbot_parser::parse_source;

    fn run_src(src: &str, input: &[&str]) -> (Result<()>, Vec<String>, Stack) {
        let program = parse_source(src).expect("Parsing should succeed");
        let mut output = Vec::new();
        let (result, stack) = {
            let mut vm = Machine::new(&program, BatchInput::new(input.iter().copied()), &mut output);
            let result = vm.run();
            (result, vm.stack().clone())
        };
        (result, output, stack)
    }

    fn top_after(src: &str) -> String {
        let (result, _, stack) = run_src(src, &[]);
        result.expect("Program should succeed");
        stack.peek().unwrap().to_string()
    }

    #[test]
    fn test_vm_push_write() {
        let (result, output, stack) = run_src("PUSH 'it''s'\nWRITE", &[]);
        result.unwrap();
        assert_eq!(output, vec!["it's"]);
        // WRITE peeks, it does not pop
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_vm_read() {
        let (result, output, _) = run_src("READ\nREAD\nWRITE\nPOP\nWRITE", &["first", "second"]);
        result.unwrap();
        assert_eq!(output, vec!["second", "first"]);
    }

    #[test]
    fn test_vm_read_exhausted() {
        let (result, output, _) = run_src("READ\nWRITE\nREAD", &["only"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExhaustedInput);
        assert_eq!(err.line, Some(3));
        assert_eq!(output, vec!["only"]);
    }

    #[test]
    fn test_vm_concat_top_is_prefix() {
        assert_eq!(top_after("PUSH 'a'\nPUSH 'b'\nCONCAT"), "ba");
    }

    #[test]
    fn test_vm_concat_underflow_leaves_stack() {
        let (result, _, stack) = run_src("PUSH 'a'\nCONCAT", &[]);
        assert!(matches!(result.unwrap_err().kind, ErrorKind::EmptyStack(_)));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_vm_copy() {
        let (result, _, stack) = run_src("PUSH 'x'\nPUSH 'y'\nCOPY 2", &[]);
        result.unwrap();
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.get(1).unwrap(), "x");
        assert_eq!(stack.get(3).unwrap(), "x");
    }

    #[test]
    fn test_vm_copy_out_of_range() {
        let (result, _, _) = run_src("PUSH 'x'\nCOPY 2", &[]);
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedArgument(_)));
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_vm_replaceone_match_falls_through() {
        let src = "PUSH 'hello'\nPUSH 'HI'\nPUSH 'l+'\nPUSH 'L1'\nREPLACEONE\nWRITE\nLABEL L1";
        let (result, output, stack) = run_src(src, &[]);
        result.unwrap();
        assert_eq!(output, vec!["heHIo"]);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_vm_replaceone_first_match_only() {
        let src = "PUSH 'a-b-c'\nPUSH '+'\nPUSH '-'\nPUSH 'end'\nREPLACEONE\nLABEL end";
        assert_eq!(top_after(src), "a+b-c");
    }

    #[test]
    fn test_vm_replaceone_replacement_is_literal() {
        let src = "PUSH 'abc'\nPUSH '$1$0'\nPUSH '(b)'\nPUSH 'end'\nREPLACEONE\nLABEL end";
        assert_eq!(top_after(src), "a$1$0c");
    }

    #[test]
    fn test_vm_replaceone_no_match_jumps() {
        let src = "PUSH 'hello'\nPUSH 'HI'\nPUSH 'z+'\nPUSH 'L1'\nREPLACEONE\nPUSH 'skipped'\nWRITE\nLABEL L1\nWRITE";
        let (result, output, stack) = run_src(src, &[]);
        result.unwrap();
        assert_eq!(output, vec!["hello"]);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_vm_replaceone_undefined_mark() {
        let src = "PUSH 's'\nPUSH 'r'\nPUSH 'x'\nPUSH 'nowhere'\nREPLACEONE";
        let (result, _, stack) = run_src(src, &[]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::UndefinedLabel("nowhere".to_string()));
        assert_eq!(stack.peek().unwrap(), "s");
    }

    #[test]
    fn test_vm_replaceone_invalid_pattern() {
        let src = "PUSH 's'\nPUSH 'r'\nPUSH '('\nPUSH 'm'\nREPLACEONE";
        let (result, _, _) = run_src(src, &[]);
        assert!(matches!(result.unwrap_err().kind, ErrorKind::MalformedArgument(_)));
    }

    #[test]
    fn test_vm_replaceone_needs_four() {
        let (result, _, stack) = run_src("PUSH 'a'\nPUSH 'b'\nPUSH 'c'\nREPLACEONE", &[]);
        assert!(matches!(result.unwrap_err().kind, ErrorKind::EmptyStack(_)));
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_vm_jump_skips_instructions() {
        let src = "JMP later\nPUSH 'never'\nWRITE\nLABEL later\nPUSH 'reached'\nWRITE";
        let (result, output, _) = run_src(src, &[]);
        result.unwrap();
        assert_eq!(output, vec!["reached"]);
    }

    #[test]
    fn test_vm_jump_target_popped_from_stack() {
        let src = "PUSH 'out'\nJMP\nPUSH 'never'\nLABEL out\nPUSH 'done'\nWRITE";
        let (result, output, stack) = run_src(src, &[]);
        result.unwrap();
        assert_eq!(output, vec!["done"]);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_vm_undefined_label() {
        let (result, _, _) = run_src("PUSH 'x'\nJMP missing", &[]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedLabel("missing".to_string()));
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_vm_backward_jump_loop() {
        // Emits each input token until the input runs dry.
        let src = "LABEL again\nREAD\nWRITE\nPOP\nJMP again";
        let (result, output, _) = run_src(src, &["1", "2", "3"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::ExhaustedInput);
        assert_eq!(output, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_vm_step_reports_state() {
        let program = parse_source("PUSH 'a'\nPOP").unwrap();
        let mut output: Vec<String> = Vec::new();
        let mut vm = Machine::new(&program, BatchInput::new(Vec::<String>::new()), &mut output);
        assert_eq!(vm.state(), State::Running);
        assert_eq!(vm.step().unwrap(), State::Running);
        assert_eq!(vm.pc(), 1);
        assert_eq!(vm.step().unwrap(), State::Halted);
        assert_eq!(vm.step().unwrap(), State::Halted);
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn test_vm_empty_program_halts() {
        let program = parse_source("").unwrap();
        let mut vm = Machine::new(&program, BatchInput::new(Vec::<String>::new()), Vec::<String>::new());
        assert_eq!(vm.state(), State::Halted);
        vm.run().unwrap();
    }
}
