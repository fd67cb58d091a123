//! Script source parser
//!
//! This module transforms script source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split across `declarations`,
//!   `statements` and `expressions`
//! - [`ast`]: AST node definitions
//! - [`dump`]: Indented debug rendering of a tree
//!
//! # Language
//!
//! - Top level: `main() { ... }`, `function name(a, b) { ... }`, and
//!   variable, array and key/value declarations
//! - Statements: assignments (optionally indexed), calls, `if`/`else`,
//!   `for (i : start, end)`, `return`, blocks
//! - Expressions: literals, identifiers, array access, calls, parentheses,
//!   and binary operators grouped strictly to the right
//! - `#` starts a comment that runs to the end of the line
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one- and two-token lookahead
//! and a single checkpoint/rewind for the call-or-assignment ambiguity.

pub mod ast;
pub mod dump;
pub mod lexer;
pub mod parse;

mod declarations;
mod expressions;
mod statements;

pub use ast::{AstNode, NodeKind, SourceLocation};
pub use lexer::{tokenize, LexError, Lexer, Token, TokenKind};
pub use parse::{parse, ParseError, Parser};
