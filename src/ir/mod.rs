//! Intermediate representation
//!
//! Lowers a syntax tree into a flat list of three-address style
//! instructions:
//! - [`emitter`]: Depth-first tree walk producing instructions
//! - [`instruction`]: Opcodes, instructions and their text form
//! - [`constants`]: Fixed placeholder and label names
//! - [`stats`]: Opcode histogram
//!
//! The output is a debug artifact. Operands are fixed placeholder names
//! rather than allocated temporaries, and labels are not unique.

pub mod constants;
pub mod emitter;
pub mod errors;
pub mod instruction;
pub mod stats;

pub use emitter::{emit, EmitOptions, Emitter};
pub use errors::EmitError;
pub use instruction::{render, Instruction, Opcode};
