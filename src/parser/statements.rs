//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Assignments and calls: `x = 1;`, `a[i] = 2;`, `print(x);`
//! - Control flow: `if` / `else`, `for (i : start, end)`
//! - Jump statements: `return`
//! - Compound statements: `{ ... }`
//!
//! # Grammar
//!
//! ```text
//! statement  ::= assign_or_call | if_stmt | for_stmt | return_stmt | block
//! assignment ::= IDENT ("[" expression "]")? "=" expression ";"
//! call_stmt  ::= call ";"
//! if_stmt    ::= "if" "(" expression ")" statement ("else" statement)?
//! for_stmt   ::= "for" "(" IDENT ":" expression "," expression ")" statement
//! return_stmt::= "return" expression? ";"
//! ```
//!
//! A statement starting with an identifier is the only ambiguous spot in the
//! grammar: the identifier is parsed speculatively, the next token decides
//! between call and assignment, and the cursor is rewound before the real
//! production runs.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use log::trace;

impl Parser {
    /// Parse statements up to (not including) the closing brace
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Identifier) => self.parse_assignment_or_call(),
            Some(TokenKind::If) => self.parse_if_statement(),
            Some(TokenKind::For) => self.parse_for_loop(),
            Some(TokenKind::Return) => self.parse_return_statement(),
            Some(TokenKind::LeftBrace) => self.parse_compound_statement(),
            _ => Err(self.error_expected("a statement")),
        }
    }

    /// Parse `{ statement* }`
    pub(crate) fn parse_compound_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self
            .expect_token(TokenKind::LeftBrace, "to open block")?
            .location;
        let statements = self.parse_block_statements()?;
        self.expect_token(TokenKind::RightBrace, "after block")?;

        Ok(AstNode::with_children(
            NodeKind::CompoundStatement,
            statements,
            loc,
        ))
    }

    /// Body of `if`, `else` and `for`: a block or a single statement
    fn parse_branch(&mut self) -> Result<AstNode, ParseError> {
        if self.check(TokenKind::LeftBrace) {
            self.parse_compound_statement()
        } else {
            self.parse_statement()
        }
    }

    fn parse_assignment_or_call(&mut self) -> Result<AstNode, ParseError> {
        let saved = self.checkpoint();
        let ident = self.expect_identifier("at start of statement")?;
        let is_call = self.check(TokenKind::LeftParen);
        self.restore(saved);

        trace!(
            "rewound after '{}' at line {}: parsing as {}",
            ident.identifier_name().unwrap_or_default(),
            ident.location.line,
            if is_call { "call" } else { "assignment" }
        );

        if is_call {
            let call = self.parse_function_call()?;
            self.expect_token(TokenKind::Semicolon, "after function call")?;
            Ok(call)
        } else {
            self.parse_assignment()
        }
    }

    /// Parse `target = value;` where target may be indexed
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let ident = self.expect_identifier("as assignment target")?;
        let loc = ident.location;

        let target = if self.match_token(TokenKind::LeftBracket) {
            let index = self.parse_expression()?;
            self.expect_token(TokenKind::RightBracket, "after index")?;
            AstNode::with_children(NodeKind::ArrayAccess, vec![ident, index], loc)
        } else {
            ident
        };

        self.expect_token(TokenKind::Equals, "in assignment")?;
        let value = self.parse_expression()?;
        self.expect_token(TokenKind::Semicolon, "after assignment")?;

        Ok(AstNode::with_children(
            NodeKind::Assignment,
            vec![target, value],
            loc,
        ))
    }

    /// Parse if statement (the `if` keyword is still current)
    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.expect_token(TokenKind::If, "at start of if")?.location;
        self.expect_token(TokenKind::LeftParen, "after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_token(TokenKind::RightParen, "after if condition")?;

        let then_branch = self.parse_branch()?;
        let mut node = AstNode::with_children(
            NodeKind::IfStatement,
            vec![condition, then_branch],
            loc,
        );

        if self.check(TokenKind::Else) {
            let else_loc = self.current_location();
            self.advance();
            let else_branch = self.parse_branch()?;
            node.add_child(AstNode::with_children(
                NodeKind::ElseStatement,
                vec![else_branch],
                else_loc,
            ));
        }

        Ok(node)
    }

    /// Parse `for (name : start, end) body`
    ///
    /// A braced body is flattened into the loop's children; a bare statement
    /// becomes its only child.
    fn parse_for_loop(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.expect_token(TokenKind::For, "at start of for")?.location;
        self.expect_token(TokenKind::LeftParen, "after 'for'")?;

        let var_name = self
            .expect_token(TokenKind::Identifier, "as loop variable")?
            .text;
        self.expect_token(TokenKind::Colon, "after loop variable")?;
        let start = self.parse_expression()?;
        self.expect_token(TokenKind::Comma, "after loop start")?;
        let end = self.parse_expression()?;
        self.expect_token(TokenKind::RightParen, "after loop bounds")?;

        let body = if self.match_token(TokenKind::LeftBrace) {
            let statements = self.parse_block_statements()?;
            self.expect_token(TokenKind::RightBrace, "after loop body")?;
            statements
        } else {
            vec![self.parse_statement()?]
        };

        Ok(AstNode::with_children(
            NodeKind::ForLoop {
                var_name,
                start: Box::new(start),
                end: Box::new(end),
            },
            body,
            loc,
        ))
    }

    /// Parse `return expression? ;`
    fn parse_return_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self
            .expect_token(TokenKind::Return, "at start of return")?
            .location;

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        self.expect_token(TokenKind::Semicolon, "after return")?;
        Ok(AstNode::new(NodeKind::ReturnStatement { value }, loc))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{parse, ParseError};

    /// Parse `main(){ <body> }` and return the main node's statements
    fn main_body(body: &str) -> Vec<AstNode> {
        let program = parse(tokenize(&format!("main() {{ {body} }}"))).unwrap();
        let main = program.into_children().into_iter().next().unwrap();
        assert_eq!(main.kind, NodeKind::Main);
        main.into_children()
    }

    #[test]
    fn test_call_and_assignment_disambiguation() {
        let stmts = main_body("f(x); f = x;");

        assert_eq!(stmts[0].kind, NodeKind::FunctionCall);
        assert_eq!(stmts[0].children[0].identifier_name(), Some("f"));
        assert_eq!(stmts[0].children[1].kind, NodeKind::ArgumentList);

        assert_eq!(stmts[1].kind, NodeKind::Assignment);
        assert_eq!(stmts[1].children[0].identifier_name(), Some("f"));
        assert_eq!(stmts[1].children[1].identifier_name(), Some("x"));
    }

    #[test]
    fn test_indexed_assignment() {
        let stmts = main_body("a[i + 1] = 2;");
        let target = &stmts[0].children[0];

        assert_eq!(target.kind, NodeKind::ArrayAccess);
        assert_eq!(target.children[0].identifier_name(), Some("a"));
        assert_eq!(target.children[1].kind, NodeKind::Expression);
    }

    #[test]
    fn test_call_without_semicolon() {
        let err = parse(tokenize("main() { f(x) }")).unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, found, .. } => {
                assert!(expected.contains("';'"));
                assert_eq!(found, "'}'");
            }
            other => panic!("Expected unexpected token, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_shapes() {
        let stmts = main_body("if (x > 1) y = 1; else { y = 2; z = 3; }");
        let node = &stmts[0];

        assert_eq!(node.kind, NodeKind::IfStatement);
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.children[0].kind, NodeKind::Expression);
        assert_eq!(node.children[1].kind, NodeKind::Assignment);

        let else_node = &node.children[2];
        assert_eq!(else_node.kind, NodeKind::ElseStatement);
        assert_eq!(else_node.children[0].kind, NodeKind::CompoundStatement);
        assert_eq!(else_node.children[0].children.len(), 2);
    }

    #[test]
    fn test_if_without_else() {
        let stmts = main_body("if (x) { return x; }");
        assert_eq!(stmts[0].children.len(), 2);
        assert_eq!(stmts[0].children[1].kind, NodeKind::CompoundStatement);
    }

    #[test]
    fn test_for_loop_body_is_flattened() {
        let stmts = main_body("for (i : 0, 10) { x = i; f(i); }");

        match &stmts[0].kind {
            NodeKind::ForLoop {
                var_name,
                start,
                end,
            } => {
                assert_eq!(var_name, "i");
                assert!(matches!(start.kind, NodeKind::Literal { ref value } if value == "0"));
                assert!(matches!(end.kind, NodeKind::Literal { ref value } if value == "10"));
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
        assert_eq!(stmts[0].children.len(), 2);
    }

    #[test]
    fn test_for_loop_single_statement_body() {
        let stmts = main_body("for (i : 0, n) x = i;");
        assert_eq!(stmts[0].children.len(), 1);
        assert_eq!(stmts[0].children[0].kind, NodeKind::Assignment);
    }

    #[test]
    fn test_for_loop_requires_identifier() {
        let err = parse(tokenize("main() { for (1 : 0, 2) x = 1; }")).unwrap_err();
        assert!(err.expected().contains("identifier"));
    }

    #[test]
    fn test_return_with_and_without_value() {
        let stmts = main_body("return; return x + 1;");

        assert_eq!(stmts[0].kind, NodeKind::ReturnStatement { value: None });
        match &stmts[1].kind {
            NodeKind::ReturnStatement { value: Some(value) } => {
                assert_eq!(value.kind, NodeKind::Expression);
            }
            other => panic!("Expected return with value, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_compound_statement() {
        let stmts = main_body("{ { x = 1; } }");
        assert_eq!(stmts[0].kind, NodeKind::CompoundStatement);
        assert_eq!(stmts[0].children[0].kind, NodeKind::CompoundStatement);
    }

    #[test]
    fn test_unexpected_token_in_statement() {
        let err = parse(tokenize("main() { 1; }")).unwrap_err();
        assert_eq!(err.expected(), "a statement");
    }

    #[test]
    fn test_unterminated_main() {
        let err = parse(tokenize("main() { x = 1;")).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }
}
