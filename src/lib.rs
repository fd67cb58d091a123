//! # Introduction
//!
//! scriptc is the front end of a compiler for a small scripting language. It
//! turns source text into tokens, builds a syntax tree with a backtracking
//! recursive-descent parser, and lowers the tree into a textual,
//! three-address style instruction listing.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Emitter → Instructions
//! ```
//!
//! 1. [`parser`] tokenises the source (unknown characters are reported and
//!    skipped) and builds an [`parser::AstNode`] tree. The first syntax error
//!    aborts parsing.
//! 2. [`ir`] walks the tree depth-first and emits [`ir::Instruction`]s using
//!    fixed placeholder operand names and fixed label names.
//! 3. [`ui`] is a ratatui viewer over all stages; not part of the stable
//!    library API.
//!
//! ## Example
//!
//! ```
//! use scriptc::{compile, ir::EmitOptions};
//!
//! let ir = compile("main() { return 1; }", EmitOptions::default()).unwrap();
//! assert_eq!(ir[0].to_string(), "Function: main");
//! ```

pub mod error;
pub mod ir;
pub mod parser;
pub mod ui;

pub use error::CompileError;

use ir::{EmitOptions, Emitter, Instruction};

/// Lex, parse and lower `source` in one go.
///
/// Lexer diagnostics are logged as warnings and otherwise ignored.
pub fn compile(source: &str, options: EmitOptions) -> Result<Vec<Instruction>, CompileError> {
    let tokens = parser::tokenize(source);
    let program = parser::parse(tokens)?;
    Ok(Emitter::new(options).emit_program(&program)?)
}
