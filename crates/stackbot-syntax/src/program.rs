//! Parsed program container.

use std::collections::HashMap;

use crate::instruction::Instruction;

/// Label name to instruction index, complete before execution starts.
pub type LabelTable = HashMap<String, usize>;

/// A fully parsed program: one [`Instruction`] per source line plus the
/// resolved label table. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    labels: LabelTable,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>, labels: LabelTable) -> Self {
        Self { instructions, labels }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Index of the line declaring `label`.
    pub fn resolve(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }

    /// Declared labels sorted by the line they point at.
    pub fn labels(&self) -> Vec<(&str, usize)> {
        let mut v: Vec<(&str, usize)> = self.labels.iter().map(|(k, &i)| (k.as_str(), i)).collect();
        v.sort_by_key(|&(name, i)| (i, name));
        v
    }

    /// Explicit `JMP` targets that no `LABEL` declares, with their instruction
    /// index. Targets popped off the stack at run time cannot be checked.
    pub fn unresolved_jumps(&self) -> Vec<(usize, &str)> {
        self.instructions
            .iter()
            .enumerate()
            .filter_map(|(i, instr)| match instr {
                Instruction::Jmp(Some(label)) if !self.labels.contains_key(label) => Some((i, label.as_str())),
                _ => None,
            })
            .collect()
    }
}
