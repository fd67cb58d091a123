//! Expression parsing implementation
//!
//! ```text
//! expression ::= operand (operator expression)?
//! operand    ::= "(" expression ")"
//!              | IDENT "(" arg_list? ")"
//!              | IDENT ("[" expression "]")?
//!              | INT | FLOAT | STRING
//! arg_list   ::= expression ("," expression)*
//! operator   ::= "+" | "-" | "*" | "/" | ">" | "<" | ">=" | "<=" | "=="
//! ```
//!
//! There is no precedence table. The right operand of every operator is a
//! whole expression, so `a - b - c` groups as `a - (b - c)` and
//! `a * b + c` as `a * (b + c)`.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse an expression
    ///
    /// Operands and operators are collected in one pass and folded from the
    /// right, giving the same `a OP (b OP c)` shape as a recursive right
    /// operand without one stack frame per operator.
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        let mut operands = vec![self.parse_operand()?];
        let mut operators = Vec::new();

        while self.peek_kind().is_some_and(TokenKind::is_operator) {
            operators.push(self.parse_operator()?);
            operands.push(self.parse_operand()?);
        }

        let mut node = operands.pop().ok_or_else(|| self.error_expected("an expression"))?;
        while let (Some(op), Some(left)) = (operators.pop(), operands.pop()) {
            let loc = left.location;
            node = AstNode::with_children(NodeKind::Expression, vec![left, op, node], loc);
        }

        Ok(node)
    }

    fn parse_operand(&mut self) -> Result<AstNode, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::LeftParen) => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect_token(TokenKind::RightParen, "to close parenthesized expression")?;
                Ok(inner)
            }
            Some(TokenKind::Identifier) => {
                if self.peek_ahead(1).map(|t| t.kind) == Some(TokenKind::LeftParen) {
                    return self.parse_function_call();
                }

                let ident = self.expect_identifier("in expression")?;
                if self.match_token(TokenKind::LeftBracket) {
                    let loc = ident.location;
                    let index = self.parse_expression()?;
                    self.expect_token(TokenKind::RightBracket, "after index")?;
                    Ok(AstNode::with_children(
                        NodeKind::ArrayAccess,
                        vec![ident, index],
                        loc,
                    ))
                } else {
                    Ok(ident)
                }
            }
            _ => self.parse_literal(),
        }
    }

    /// Parse `name(args)`
    pub(crate) fn parse_function_call(&mut self) -> Result<AstNode, ParseError> {
        let callee = self.expect_identifier("as function name")?;
        let loc = callee.location;
        let mut call = AstNode::with_children(NodeKind::FunctionCall, vec![callee], loc);

        self.expect_token(TokenKind::LeftParen, "after function name")?;
        if !self.check(TokenKind::RightParen) {
            call.add_child(self.parse_arg_list()?);
        }
        self.expect_token(TokenKind::RightParen, "after arguments")?;

        Ok(call)
    }

    fn parse_arg_list(&mut self) -> Result<AstNode, ParseError> {
        let mut args = AstNode::new(NodeKind::ArgumentList, self.current_location());

        loop {
            args.add_child(self.parse_expression()?);

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    fn parse_literal(&mut self) -> Result<AstNode, ParseError> {
        match self.peek() {
            Some(token) if token.kind.is_literal() => {
                let node = AstNode::new(
                    NodeKind::Literal {
                        value: token.text.clone(),
                    },
                    token.location,
                );
                self.advance();
                Ok(node)
            }
            _ => Err(self.error_expected("an expression")),
        }
    }

    fn parse_operator(&mut self) -> Result<AstNode, ParseError> {
        match self.peek() {
            Some(token) if token.kind.is_operator() => {
                let node = AstNode::new(
                    NodeKind::Operator {
                        op: token.text.clone(),
                    },
                    token.location,
                );
                self.advance();
                Ok(node)
            }
            _ => Err(self.error_expected("an operator")),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{parse, ParseError};

    /// Parse `x = <expr>;` and return the value expression
    fn expr(source: &str) -> AstNode {
        let program = parse(tokenize(&format!("x = {source};"))).unwrap();
        let mut decl = program.into_children().into_iter().next().unwrap();
        decl.children.remove(0)
    }

    fn op_of(node: &AstNode) -> &str {
        match &node.children[1].kind {
            NodeKind::Operator { op } => op,
            other => panic!("Expected operator, got {:?}", other),
        }
    }

    #[test]
    fn test_right_nesting() {
        let node = expr("a - b - c");

        assert_eq!(node.kind, NodeKind::Expression);
        assert_eq!(node.children[0].identifier_name(), Some("a"));
        assert_eq!(op_of(&node), "-");

        let right = &node.children[2];
        assert_eq!(right.kind, NodeKind::Expression);
        assert_eq!(right.children[0].identifier_name(), Some("b"));
        assert_eq!(right.children[2].identifier_name(), Some("c"));
    }

    #[test]
    fn test_long_chain_keeps_right_nesting() {
        let terms = 10_000;
        let source = (0..terms).map(|i| format!("v{i}")).collect::<Vec<_>>().join(" - ");
        let node = expr(&source);

        let mut current = &node;
        let mut depth = 0;
        while current.kind == NodeKind::Expression {
            assert_eq!(current.children[0].identifier_name(), Some(format!("v{depth}").as_str()));
            assert_eq!(op_of(current), "-");
            current = &current.children[2];
            depth += 1;
        }
        assert_eq!(depth, terms - 1);
        assert_eq!(current.identifier_name(), Some(format!("v{}", terms - 1).as_str()));
    }

    #[test]
    fn test_no_precedence() {
        // `*` does not bind tighter than `+`
        let node = expr("a * b + c");
        assert_eq!(op_of(&node), "*");
        assert_eq!(op_of(&node.children[2]), "+");
    }

    #[test]
    fn test_parentheses_group_left_operand() {
        let node = expr("(a - b) - c");
        assert_eq!(node.children[0].kind, NodeKind::Expression);
        assert_eq!(node.children[2].identifier_name(), Some("c"));
    }

    #[test]
    fn test_relational_operators() {
        for op in [">", "<", ">=", "<=", "=="] {
            let node = expr(&format!("a {op} 1"));
            assert_eq!(op_of(&node), op);
        }
    }

    #[test]
    fn test_literals() {
        assert!(matches!(expr("42").kind, NodeKind::Literal { ref value } if value == "42"));
        assert!(matches!(expr("4.2").kind, NodeKind::Literal { ref value } if value == "4.2"));
        assert!(matches!(expr("\"hi\"").kind, NodeKind::Literal { ref value } if value == "hi"));
    }

    #[test]
    fn test_call_in_expression() {
        let node = expr("f(1, g(2)) + 3");
        let call = &node.children[0];

        assert_eq!(call.kind, NodeKind::FunctionCall);
        assert_eq!(call.children[1].kind, NodeKind::ArgumentList);
        assert_eq!(call.children[1].children.len(), 2);
        assert_eq!(call.children[1].children[1].kind, NodeKind::FunctionCall);
    }

    #[test]
    fn test_call_without_arguments() {
        let node = expr("f()");
        assert_eq!(node.kind, NodeKind::FunctionCall);
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn test_array_access() {
        let node = expr("a[i + 1]");
        assert_eq!(node.kind, NodeKind::ArrayAccess);
        assert_eq!(node.children[0].identifier_name(), Some("a"));
        assert_eq!(node.children[1].kind, NodeKind::Expression);
    }

    #[test]
    fn test_unclosed_parenthesis() {
        let err = parse(tokenize("x = (a + b;")).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "';'"));
    }

    #[test]
    fn test_dangling_operator() {
        let err = parse(tokenize("x = a +")).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }
}
