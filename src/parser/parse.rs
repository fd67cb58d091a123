//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the program-level entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, cursor helpers, and top-level dispatch
//! - `declarations`: `main`, functions, variable and aggregate declarations
//! - `statements`: statements (assignment or call, if, for, return, blocks)
//! - `expressions`: right-nested binary expressions and their operands
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared cursor.
//!
//! A lookahead that runs past the last token never matches anything; a
//! production that then requires a token fails with
//! [`ParseError::UnexpectedEof`].

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use log::debug;
use std::fmt;

/// Syntax error. The first one aborts the parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A token was found where the grammar required something else
    UnexpectedToken {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    /// The token sequence ended in the middle of a production
    UnexpectedEof {
        expected: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedToken { location, .. } => *location,
            ParseError::UnexpectedEof { location, .. } => *location,
        }
    }

    pub fn expected(&self) -> &str {
        match self {
            ParseError::UnexpectedToken { expected, .. } => expected,
            ParseError::UnexpectedEof { expected, .. } => expected,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken {
                expected,
                found,
                location,
            } => write!(
                f,
                "Syntax error at line {}, column {}: expected {}, found {}",
                location.line, location.column, expected, found
            ),
            ParseError::UnexpectedEof { expected, location } => write!(
                f,
                "Syntax error at line {}, column {}: expected {}, found end of input",
                location.line, location.column, expected
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Saved cursor position for speculative parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint(usize);

/// Parse a token sequence into a [`NodeKind::Program`] node.
pub fn parse(tokens: Vec<Token>) -> Result<AstNode, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Recursive descent parser for the scripting language
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) -> Result<AstNode, ParseError> {
        let mut program = AstNode::new(NodeKind::Program, SourceLocation::new(1, 1));

        while !self.is_at_end() {
            let decl = self.parse_top_level_declaration()?;
            program.add_child(decl);
        }

        debug!(
            "parsed {} tokens into {} top-level declarations",
            self.tokens.len(),
            program.children.len()
        );

        Ok(program)
    }

    /// Dispatch on the current token, looking two tokens past an identifier
    /// to tell aggregates from plain variable declarations.
    fn parse_top_level_declaration(&mut self) -> Result<AstNode, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Function) => self.parse_function(),
            Some(TokenKind::Main) => self.parse_main(),
            Some(TokenKind::Identifier) => match self.peek_ahead(2).map(|t| t.kind) {
                Some(TokenKind::LeftBracket) => self.parse_array_decl(),
                Some(TokenKind::LeftBrace) => self.parse_key_value_decl(),
                _ => self.parse_var_decl(),
            },
            _ => Err(self.error_expected("'function', 'main' or a declaration")),
        }
    }

    // ===== Helper methods =====

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.0;
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Location of the current token, or of the last token once the
    /// sequence is exhausted.
    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.location)
            .unwrap_or_else(|| SourceLocation::new(1, 1))
    }

    /// Build the error for "wanted `expected` here".
    pub(crate) fn error_expected(&self, expected: impl Into<String>) -> ParseError {
        let expected = expected.into();
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                expected,
                found: token.to_string(),
                location: token.location,
            },
            None => ParseError::UnexpectedEof {
                expected,
                location: self.current_location(),
            },
        }
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind, ctx: &str) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.position += 1;
                Ok(token)
            }
            _ => Err(self.error_expected(format!("{kind} {ctx}"))),
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<AstNode, ParseError> {
        let token = self.expect_token(TokenKind::Identifier, ctx)?;
        Ok(AstNode::identifier(token.text, token.location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse_source(source: &str) -> Result<AstNode, ParseError> {
        parse(tokenize(source))
    }

    #[test]
    fn test_parse_empty_program() {
        let program = parse_source("").unwrap();
        assert_eq!(program.kind, NodeKind::Program);
        assert!(program.children.is_empty());
    }

    #[test]
    fn test_top_level_dispatch() {
        let program = parse_source(
            "x = 1;\n\
             a = [1, 2];\n\
             m = {\"k\": 1};\n\
             function f(p) { return p; }\n\
             main() { }",
        )
        .unwrap();

        let kinds: Vec<&str> = program.children.iter().map(|n| n.kind.name()).collect();
        assert_eq!(kinds, vec!["var_decl", "array", "key_value", "function", "main"]);
    }

    #[test]
    fn test_unexpected_top_level_token() {
        let err = parse_source("return 1;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
        assert_eq!(err.location(), SourceLocation::new(1, 1));
    }

    #[test]
    fn test_identifier_near_end_of_input() {
        // Two-token lookahead runs off the end and falls through to a
        // variable declaration, which then runs out of input.
        let err = parse_source("x").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));

        let err = parse_source("x =").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_error_message_names_expected_and_found() {
        let err = parse_source("main(){ x = ; }").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expected"), "{message}");
        assert!(message.contains("';'"), "{message}");
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut parser = Parser::new(tokenize("a b c"));
        let saved = parser.checkpoint();
        parser.advance();
        parser.advance();
        assert_eq!(parser.peek().unwrap().text, "c");
        parser.restore(saved);
        assert_eq!(parser.peek().unwrap().text, "a");
    }
}
