//! Declaration parsing implementation
//!
//! Handles everything that can appear at program level plus the aggregate
//! literals shared with expression lists:
//!
//! ```text
//! main           ::= "main" "(" ")" "{" statement* "}"
//! function       ::= "function" IDENT "(" param_list ")" "{" statement* "}"
//! param_list     ::= (IDENT ("," IDENT)*)?
//! var_decl       ::= IDENT "=" expression ";"
//! array_decl     ::= IDENT "=" "[" expression_list "]" ";"
//! key_value_decl ::= IDENT "=" "{" (pair ("," pair)*)? "}" ";"
//! expression_list::= item ("," item)*
//! item           ::= "[" expression_list "]" | "{" pairs "}" | expression
//! pair           ::= expression ":" (aggregate | expression)
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse `main() { ... }`
    pub(crate) fn parse_main(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.expect_token(TokenKind::Main, "at start of main")?.location;
        self.expect_token(TokenKind::LeftParen, "after 'main'")?;
        self.expect_token(TokenKind::RightParen, "after 'main('")?;
        self.expect_token(TokenKind::LeftBrace, "before main body")?;

        let body = self.parse_block_statements()?;
        self.expect_token(TokenKind::RightBrace, "after main body")?;

        Ok(AstNode::with_children(NodeKind::Main, body, loc))
    }

    /// Parse `function name(params) { ... }`
    pub(crate) fn parse_function(&mut self) -> Result<AstNode, ParseError> {
        let loc = self
            .expect_token(TokenKind::Function, "at start of function")?
            .location;
        let name = self
            .expect_token(TokenKind::Identifier, "as function name")?
            .text;

        self.expect_token(TokenKind::LeftParen, "after function name")?;
        let params = self.parse_param_list()?;
        self.expect_token(TokenKind::RightParen, "after parameters")?;
        self.expect_token(TokenKind::LeftBrace, "before function body")?;

        let body = self.parse_block_statements()?;
        self.expect_token(TokenKind::RightBrace, "after function body")?;

        Ok(AstNode::with_children(
            NodeKind::Function {
                name,
                params: Box::new(params),
            },
            body,
            loc,
        ))
    }

    /// Parse the identifiers between a function's parentheses
    fn parse_param_list(&mut self) -> Result<AstNode, ParseError> {
        let mut list = AstNode::new(NodeKind::ParamList, self.current_location());

        if self.check(TokenKind::RightParen) {
            return Ok(list);
        }

        loop {
            list.add_child(self.expect_identifier("in parameter list")?);

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(list)
    }

    /// Parse `name = expression;`
    pub(crate) fn parse_var_decl(&mut self) -> Result<AstNode, ParseError> {
        let name = self.expect_token(TokenKind::Identifier, "in declaration")?;
        self.expect_token(TokenKind::Equals, "after variable name")?;

        let value = self.parse_expression()?;
        self.expect_token(TokenKind::Semicolon, "after variable declaration")?;

        Ok(AstNode::with_children(
            NodeKind::VarDecl { name: name.text },
            vec![value],
            name.location,
        ))
    }

    /// Parse `name = [ ... ];`
    pub(crate) fn parse_array_decl(&mut self) -> Result<AstNode, ParseError> {
        let name = self.expect_token(TokenKind::Identifier, "in array declaration")?;
        self.expect_token(TokenKind::Equals, "after array name")?;

        let mut array = self.parse_array_literal()?;
        self.expect_token(TokenKind::Semicolon, "after array declaration")?;

        array.kind = NodeKind::ArrayDecl {
            name: Some(name.text),
        };
        array.location = name.location;
        Ok(array)
    }

    /// Parse `name = { key: value, ... };`
    pub(crate) fn parse_key_value_decl(&mut self) -> Result<AstNode, ParseError> {
        let name = self.expect_token(TokenKind::Identifier, "in key/value declaration")?;
        self.expect_token(TokenKind::Equals, "after key/value name")?;

        let mut map = self.parse_key_value_literal()?;
        self.expect_token(TokenKind::Semicolon, "after key/value declaration")?;

        map.kind = NodeKind::KeyValueDecl {
            name: Some(name.text),
        };
        map.location = name.location;
        Ok(map)
    }

    /// Parse `[ expression_list ]` into an anonymous array aggregate
    fn parse_array_literal(&mut self) -> Result<AstNode, ParseError> {
        let loc = self
            .expect_token(TokenKind::LeftBracket, "to open array")?
            .location;
        let items = self.parse_expression_list()?;
        self.expect_token(TokenKind::RightBracket, "to close array")?;

        Ok(AstNode::with_children(
            NodeKind::ArrayDecl { name: None },
            vec![items],
            loc,
        ))
    }

    /// Parse `{ pair, ... }` into an anonymous key/value aggregate
    fn parse_key_value_literal(&mut self) -> Result<AstNode, ParseError> {
        let loc = self
            .expect_token(TokenKind::LeftBrace, "to open key/value block")?
            .location;
        let mut map = AstNode::new(NodeKind::KeyValueDecl { name: None }, loc);

        if !self.check(TokenKind::RightBrace) {
            loop {
                map.add_child(self.parse_key_value_pair()?);

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect_token(TokenKind::RightBrace, "to close key/value block")?;
        Ok(map)
    }

    /// Parse comma-separated expressions and nested aggregates
    fn parse_expression_list(&mut self) -> Result<AstNode, ParseError> {
        let mut list = AstNode::new(NodeKind::ExpressionList, self.current_location());

        loop {
            list.add_child(self.parse_expression_or_aggregate()?);

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(list)
    }

    fn parse_expression_or_aggregate(&mut self) -> Result<AstNode, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::LeftBracket) => self.parse_array_literal(),
            Some(TokenKind::LeftBrace) => self.parse_key_value_literal(),
            _ => self.parse_expression(),
        }
    }

    /// Parse `key : value`
    fn parse_key_value_pair(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        let key = self.parse_expression()?;
        self.expect_token(TokenKind::Colon, "between key and value")?;
        let value = self.parse_expression_or_aggregate()?;

        Ok(AstNode::with_children(
            NodeKind::KeyValuePair,
            vec![key, value],
            loc,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{parse, ParseError};

    fn first_decl(source: &str) -> AstNode {
        let program = parse(tokenize(source)).unwrap();
        program.into_children().into_iter().next().expect("no declaration")
    }

    #[test]
    fn test_function_with_params() {
        let func = first_decl("function add(a, b) { return a + b; }");

        match &func.kind {
            NodeKind::Function { name, params } => {
                assert_eq!(name, "add");
                assert_eq!(params.kind, NodeKind::ParamList);
                let names: Vec<&str> = params
                    .children
                    .iter()
                    .filter_map(|p| p.identifier_name())
                    .collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("Expected function, got {:?}", other),
        }
        assert_eq!(func.children.len(), 1);
    }

    #[test]
    fn test_function_without_params() {
        let func = first_decl("function f() { }");
        match &func.kind {
            NodeKind::Function { params, .. } => assert!(params.children.is_empty()),
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_param_list_rejects_literals() {
        let err = parse(tokenize("function f(1) { }")).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_var_decl() {
        let decl = first_decl("count = 3;");
        assert_eq!(
            decl.kind,
            NodeKind::VarDecl {
                name: "count".to_string()
            }
        );
        assert!(matches!(decl.children[0].kind, NodeKind::Literal { ref value } if value == "3"));
    }

    #[test]
    fn test_nested_array_decl() {
        let decl = first_decl("grid = [[1, 2], {\"a\": 1}, 3];");

        assert_eq!(
            decl.kind,
            NodeKind::ArrayDecl {
                name: Some("grid".to_string())
            }
        );
        let items = &decl.children[0];
        assert_eq!(items.kind, NodeKind::ExpressionList);
        assert_eq!(items.children.len(), 3);
        assert_eq!(items.children[0].kind, NodeKind::ArrayDecl { name: None });
        assert_eq!(items.children[1].kind, NodeKind::KeyValueDecl { name: None });
        assert!(matches!(items.children[2].kind, NodeKind::Literal { .. }));
    }

    #[test]
    fn test_key_value_decl_children_are_pairs() {
        let decl = first_decl("m = {\"a\": 1, \"b\": [2, 3], \"c\": {\"d\": x}};");

        assert_eq!(decl.children.len(), 3);
        for pair in &decl.children {
            assert_eq!(pair.kind, NodeKind::KeyValuePair);
            assert_eq!(pair.children.len(), 2);
        }
        assert_eq!(
            decl.children[1].children[1].kind,
            NodeKind::ArrayDecl { name: None }
        );
        assert_eq!(
            decl.children[2].children[1].kind,
            NodeKind::KeyValueDecl { name: None }
        );
    }

    #[test]
    fn test_empty_key_value_decl() {
        let decl = first_decl("m = {};");
        assert!(decl.children.is_empty());
    }

    #[test]
    fn test_missing_semicolon_after_array() {
        let err = parse(tokenize("a = [1, 2]")).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }
}
