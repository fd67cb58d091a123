//! Opcode statistics for an emitted instruction log

use crate::ir::instruction::{Instruction, Opcode};
use rustc_hash::FxHashMap;

/// Count how often each opcode occurs.
pub fn opcode_histogram(instructions: &[Instruction]) -> FxHashMap<Opcode, usize> {
    let mut counts = FxHashMap::default();
    for instruction in instructions {
        *counts.entry(instruction.op).or_insert(0) += 1;
    }
    counts
}

/// Histogram as `(opcode, count)` rows in opcode order, skipping unused opcodes
pub fn opcode_summary(instructions: &[Instruction]) -> Vec<(Opcode, usize)> {
    let counts = opcode_histogram(instructions);
    Opcode::ALL
        .iter()
        .filter_map(|op| counts.get(op).map(|&n| (*op, n)))
        .collect()
}

/// Render the summary as aligned text lines
pub fn format_summary(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    for (op, count) in opcode_summary(instructions) {
        out.push_str(&format!("{:<16}{}\n", op.as_str(), count));
    }
    out.push_str(&format!("{:<16}{}\n", "total", instructions.len()));
    out
}
