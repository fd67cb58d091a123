//! Top-level compile error

use crate::ir::EmitError;
use crate::parser::ParseError;
use std::fmt;

/// Any fatal error from the source-to-IR pipeline.
///
/// Lexer diagnostics are not included: they are warnings, and lexing always
/// produces a token list.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    Parse(ParseError),
    Emit(EmitError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::Emit(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Parse(e) => Some(e),
            CompileError::Emit(e) => Some(e),
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<EmitError> for CompileError {
    fn from(e: EmitError) -> Self {
        CompileError::Emit(e)
    }
}
