//! Lexer (tokenizer) for script source code
//!
//! Converts raw source text into a flat [`Token`] sequence consumed by the
//! parser. Lexing never fails: characters that start no token are reported
//! as [`LexError`] diagnostics and skipped, and scanning carries on.
//! No end-of-input token is appended; the parser treats running off the end
//! of the sequence as end of input.

use super::ast::SourceLocation;
use log::warn;
use std::fmt;

/// Token categories produced by the lexer.
///
/// There is no end-of-input or unrecognized kind: the sequence simply ends,
/// and unknown characters become diagnostics instead of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Int,
    Float,
    String,

    Identifier,

    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    // Relational
    Greater,      // >
    Less,         // <
    GreaterEqual, // >=
    LessEqual,    // <=
    Equal,        // ==

    // Assignment
    Equals, // =

    // Punctuation
    Colon,        // :
    Semicolon,    // ;
    Comma,        // ,
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }

    // Keywords
    Main,
    Function,
    For,
    If,
    Else,
    Return,
}

impl TokenKind {
    /// Binary operators accepted between expression operands
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Greater
                | TokenKind::Less
                | TokenKind::GreaterEqual
                | TokenKind::LessEqual
                | TokenKind::Equal
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Main
                | TokenKind::Function
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Return
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Float | TokenKind::String)
    }

    /// Upper-case listing tag, e.g. `TOKEN_LEFT_PAREN`
    pub fn tag(self) -> &'static str {
        match self {
            TokenKind::Int => "TOKEN_INT",
            TokenKind::Float => "TOKEN_FLOAT",
            TokenKind::String => "TOKEN_STRING",
            TokenKind::Identifier => "TOKEN_IDENTIFIER",
            TokenKind::Plus => "TOKEN_PLUS",
            TokenKind::Minus => "TOKEN_MINUS",
            TokenKind::Star => "TOKEN_STAR",
            TokenKind::Slash => "TOKEN_SLASH",
            TokenKind::Greater => "TOKEN_GREATER",
            TokenKind::Less => "TOKEN_LESS",
            TokenKind::GreaterEqual => "TOKEN_GREATER_EQUAL",
            TokenKind::LessEqual => "TOKEN_LESS_EQUAL",
            TokenKind::Equal => "TOKEN_EQUAL",
            TokenKind::Equals => "TOKEN_EQUALS",
            TokenKind::Colon => "TOKEN_COLON",
            TokenKind::Semicolon => "TOKEN_SEMICOLON",
            TokenKind::Comma => "TOKEN_COMMA",
            TokenKind::LeftParen => "TOKEN_LEFT_PAREN",
            TokenKind::RightParen => "TOKEN_RIGHT_PAREN",
            TokenKind::LeftBracket => "TOKEN_LEFT_SQUARE_BRACKET",
            TokenKind::RightBracket => "TOKEN_RIGHT_SQUARE_BRACKET",
            TokenKind::LeftBrace => "TOKEN_LEFT_CURLY_BRACE",
            TokenKind::RightBrace => "TOKEN_RIGHT_CURLY_BRACE",
            TokenKind::Main => "TOKEN_MAIN",
            TokenKind::Function => "TOKEN_FUNCTION",
            TokenKind::For => "TOKEN_FOR",
            TokenKind::If => "TOKEN_IF",
            TokenKind::Else => "TOKEN_ELSE",
            TokenKind::Return => "TOKEN_RETURN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int => write!(f, "integer literal"),
            TokenKind::Float => write!(f, "float literal"),
            TokenKind::String => write!(f, "string literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Greater => write!(f, "'>'"),
            TokenKind::Less => write!(f, "'<'"),
            TokenKind::GreaterEqual => write!(f, "'>='"),
            TokenKind::LessEqual => write!(f, "'<='"),
            TokenKind::Equal => write!(f, "'=='"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::LeftBracket => write!(f, "'['"),
            TokenKind::RightBracket => write!(f, "']'"),
            TokenKind::LeftBrace => write!(f, "'{{'"),
            TokenKind::RightBrace => write!(f, "'}}'"),
            TokenKind::Main => write!(f, "'main'"),
            TokenKind::Function => write!(f, "'function'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::Return => write!(f, "'return'"),
        }
    }
}

/// A lexed token. String literals hold their body without the quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Int | TokenKind::Float => write!(f, "{} {}", self.kind, self.text),
            TokenKind::String => write!(f, "string literal \"{}\"", self.text),
            kind => fmt::Display::fmt(&kind, f),
        }
    }
}

/// Lexical diagnostic. Never fatal: the offending input is skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer warning at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Tokenize `source`, discarding diagnostics (they are still logged).
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Lexer for script source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    diagnostics: Vec<LexError>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                break;
            }

            if let Some(token) = self.next_token() {
                tokens.push(token);
            }
        }

        tokens
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[LexError] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<LexError> {
        self.diagnostics
    }

    /// Scan one token. Returns `None` when the character was skipped.
    fn next_token(&mut self) -> Option<Token> {
        let loc = self.current_location();
        let ch = self.advance()?;

        let kind = match ch {
            '"' => return Some(self.string_literal(loc)),
            '0'..='9' => return Some(self.number_literal(ch, loc)),
            'a'..='z' | 'A'..='Z' | '_' => return Some(self.identifier_or_keyword(ch, loc)),

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,

            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    return Some(Token::new(TokenKind::Equal, "==", loc));
                }
                TokenKind::Equals
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    return Some(Token::new(TokenKind::GreaterEqual, ">=", loc));
                }
                TokenKind::Greater
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    return Some(Token::new(TokenKind::LessEqual, "<=", loc));
                }
                TokenKind::Less
            }

            _ => {
                self.report(format!("Unrecognized token starting at '{}'", ch), loc);
                return None;
            }
        };

        Some(Token::new(kind, ch.to_string(), loc))
    }

    /// Parse string literal. The opening quote is already consumed.
    ///
    /// A backslash keeps the following character in the value verbatim; no
    /// escape is translated.
    fn string_literal(&mut self, loc: SourceLocation) -> Token {
        let mut body = String::new();

        while let Some(ch) = self.peek() {
            if ch == '"' {
                self.advance(); // closing quote
                return Token::new(TokenKind::String, body, loc);
            }

            self.advance();
            body.push(ch);

            if ch == '\\' {
                if let Some(escaped) = self.advance() {
                    body.push(escaped);
                }
            }
        }

        self.report("Unterminated string literal".to_string(), loc);
        Token::new(TokenKind::String, body, loc)
    }

    /// Parse numeric literal: digits, optionally `.` and more digits
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut num_str = String::new();
        num_str.push(first_digit);
        self.take_digits(&mut num_str);

        let is_float = self.peek() == Some('.')
            && self.peek_ahead(1).is_some_and(|ch| ch.is_ascii_digit());

        if is_float {
            num_str.push('.');
            self.advance();
            self.take_digits(&mut num_str);
            Token::new(TokenKind::Float, num_str, loc)
        } else {
            Token::new(TokenKind::Int, num_str, loc)
        }
    }

    fn take_digits(&mut self, buf: &mut String) {
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            buf.push(ch);
            self.advance();
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match ident.as_str() {
            "main" => TokenKind::Main,
            "function" => TokenKind::Function,
            "for" => TokenKind::For,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            _ => TokenKind::Identifier,
        };

        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and `#` line comments
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C' => {
                    self.advance();
                }
                '#' => self.skip_line_comment(),
                _ => break,
            }
        }
    }

    /// Skip to the end of the line, leaving the newline in place
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn report(&mut self, message: String, location: SourceLocation) {
        let diagnostic = LexError { message, location };
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("main() { return 0; }");

        assert_eq!(tokens[0].kind, TokenKind::Main);
        assert_eq!(tokens[1].kind, TokenKind::LeftParen);
        assert_eq!(tokens[2].kind, TokenKind::RightParen);
        assert_eq!(tokens[3].kind, TokenKind::LeftBrace);
        assert_eq!(tokens[4].kind, TokenKind::Return);
        assert_eq!(tokens[5].kind, TokenKind::Int);
        assert_eq!(tokens[5].text, "0");
        assert_eq!(tokens[6].kind, TokenKind::Semicolon);
        assert_eq!(tokens[7].kind, TokenKind::RightBrace);
        assert_eq!(tokens.len(), 8);
    }

    #[test]
    fn test_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("+ - * / > < >= <= == ="),
            vec![Plus, Minus, Star, Slash, Greater, Less, GreaterEqual, LessEqual, Equal, Equals]
        );
        assert_eq!(kinds("a==b"), vec![Identifier, Equal, Identifier]);
        assert_eq!(kinds("a=b"), vec![Identifier, Equals, Identifier]);
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("123 1.5");
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].text, "123");
        assert_eq!(tokens[1].kind, TokenKind::Float);
        assert_eq!(tokens[1].text, "1.5");
    }

    #[test]
    fn test_trailing_dot_is_not_a_float() {
        let mut lexer = Lexer::new("1.");
        let tokens = lexer.tokenize();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].text, "1");
        assert_eq!(lexer.diagnostics().len(), 1);
        assert_eq!(lexer.diagnostics()[0].location, SourceLocation::new(1, 2));
    }

    #[test]
    fn test_string_escape_kept_verbatim() {
        let tokens = tokenize(r#""a\"b""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, r#"a\"b"#);
    }

    #[test]
    fn test_unterminated_string_takes_rest_of_input() {
        let mut lexer = Lexer::new("\"abc");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].text, "abc");
        assert_eq!(lexer.diagnostics().len(), 1);
    }

    #[test]
    fn test_keywords_match_exactly() {
        use TokenKind::*;
        assert_eq!(
            kinds("main function for if else return"),
            vec![Main, Function, For, If, Else, Return]
        );
        assert_eq!(kinds("iffy"), vec![Identifier]);
        assert_eq!(kinds("_main2"), vec![Identifier]);
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("x = 1; # trailing comment\ny = 2;");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "=", "1", ";", "y", "=", "2", ";"]);
        assert_eq!(tokens[4].location, SourceLocation::new(2, 1));
    }

    #[test]
    fn test_unrecognized_characters_are_skipped() {
        let mut lexer = Lexer::new("a @ b $");
        let tokens = lexer.tokenize();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "b");
        let diagnostics = lexer.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains('@'));
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize(" \t\r\n\x0B\x0C").is_empty());
        assert!(tokenize("# only a comment").is_empty());
    }
}
