//! Token model shared by the scanner and the parser

use std::fmt;

/// Lexeme classes produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// In-progress marker used while a lexeme is being scanned
    Start,
    Identifier,
    Constant,
    Keyword,
    ArithmeticOp,
    RelationalOp,
    Separator,
    Assignment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Start => "start",
            TokenKind::Identifier => "identifier",
            TokenKind::Constant => "constant",
            TokenKind::Keyword => "keyword",
            TokenKind::ArithmeticOp => "arithmetic operator",
            TokenKind::RelationalOp => "relational operator",
            TokenKind::Separator => "separator",
            TokenKind::Assignment => "assignment",
        };
        f.write_str(name)
    }
}

/// Reserved words of the language.
pub const KEYWORDS: &[&str] = &[
    "else", "if", "switch", "case", "default", "int", "void", "struct", "return", "break", "goto",
    "while", "for",
];

/// Keywords accepted as type specifiers.
pub const TYPE_KEYWORDS: &[&str] = &["int", "void"];

/// A classified lexeme.
///
/// Equality ignores `line`: two tokens are the same when kind and text match.
#[derive(Debug, Clone, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Whether this token has the given kind and text.
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_separator(&self, text: &str) -> bool {
        self.is(TokenKind::Separator, text)
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.is(TokenKind::Keyword, text)
    }

    /// `int` or `void`.
    pub fn is_type_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(&self.text.as_str())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_line() {
        let a = Token::new(TokenKind::Identifier, "x", 1);
        let b = Token::new(TokenKind::Identifier, "x", 7);
        let c = Token::new(TokenKind::Keyword, "x", 1);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        let token = Token::new(TokenKind::Separator, ";", 3);
        assert_eq!(token.to_string(), "separator ';'");
    }
}
