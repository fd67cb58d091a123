//! Emission error types
//!
//! The emitter only fails when a node does not have the shape its kind
//! promises. The parser never builds such trees, so these errors guard
//! hand-built or externally transformed ASTs. All of them are fatal.

use crate::parser::ast::SourceLocation;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EmitError {
    /// A node is missing children its kind requires
    MalformedNode {
        kind: &'static str,
        message: String,
        location: SourceLocation,
    },
}

impl EmitError {
    pub fn location(&self) -> SourceLocation {
        match self {
            EmitError::MalformedNode { location, .. } => *location,
        }
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::MalformedNode {
                kind,
                message,
                location,
            } => write!(
                f,
                "Malformed {} at line {}, column {}: {}",
                kind, location.line, location.column, message
            ),
        }
    }
}

impl std::error::Error for EmitError {}
