//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, the token-matching primitives, and the program
//! entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: variable/function declarations and parameter lists
//! - `statements`: statements (if, while, for, jumps, labels, blocks)
//! - `expressions`: expressions with precedence climbing
//!
//! # Implementation
//!
//! The parser pulls tokens lazily from its [`Scanner`] and keeps exactly one
//! token of lookahead in `current` (`None` once input is exhausted). Every
//! grammar production is a public method, so any production can be parsed
//! on its own.

use crate::parser::ast::*;
use crate::parser::scanner::{ScanError, Scanner};
use crate::parser::source::DEFAULT_CONTEXT_RADIUS;
use crate::parser::token::{Token, TokenKind};
use tracing::debug;

/// A required token did not match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Expecting {expected}, instead of {found}, [line {line}]\n{snippet}")]
pub struct SyntaxError {
    pub expected: String,
    pub found: String,
    pub line: usize,
    /// Offending source line with context, as rendered by the scanner
    pub snippet: String,
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Scan(err) => err.line(),
            ParseError::Syntax(err) => err.line,
        }
    }
}

/// Recursive descent parser for mini-C
pub struct Parser {
    scanner: Scanner,
    current: Option<Token>,
    /// Line of the most recently consumed token, used once input runs out
    last_line: usize,
}

impl Parser {
    /// Create a parser and load the first lookahead token.
    pub fn new(scanner: Scanner) -> Result<Self, ParseError> {
        let mut parser = Self {
            scanner,
            current: None,
            last_line: 1,
        };
        parser.current = parser.scanner.next_token()?;
        Ok(parser)
    }

    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        Self::new(Scanner::from_text(text))
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new(self.current_line());

        while !self.is_at_end() {
            let decl = self.parse_declaration()?;
            program.declarations.push(decl);
        }

        debug!(declarations = program.declarations.len(), "parsed program");
        Ok(program)
    }

    // ===== Helper methods =====

    /// The lookahead token, `None` at end of input.
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn is_at_end(&self) -> bool {
        self.current.is_none()
    }

    pub(crate) fn current_line(&self) -> usize {
        self.current.as_ref().map_or(self.last_line, |t| t.line)
    }

    /// Consume the lookahead token and pull the next one from the scanner.
    pub(crate) fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        let next = self.scanner.next_token()?;
        let consumed = std::mem::replace(&mut self.current, next);
        if let Some(token) = &consumed {
            self.last_line = token.line;
        }
        Ok(consumed)
    }

    pub(crate) fn check_kind(&self, kind: TokenKind) -> bool {
        self.current.as_ref().is_some_and(|t| t.kind == kind)
    }

    pub(crate) fn check_separator(&self, text: &str) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_separator(text))
    }

    pub(crate) fn check_keyword(&self, text: &str) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_keyword(text))
    }

    /// The match primitive: verify the lookahead's kind (and, for separators
    /// and keywords, its exact text), then consume it.
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        text: Option<&str>,
    ) -> Result<Token, ParseError> {
        let matches = match &self.current {
            Some(t) => t.kind == kind && text.map_or(true, |text| t.text == text),
            None => false,
        };

        if !matches {
            let expected = match text {
                Some(text) => format!("{} '{}'", kind, text),
                None => kind.to_string(),
            };
            return Err(self.error(expected));
        }

        match self.advance()? {
            Some(token) => Ok(token),
            None => Err(self.error(kind.to_string())),
        }
    }

    pub(crate) fn expect_separator(&mut self, text: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::Separator, Some(text))
    }

    pub(crate) fn expect_keyword(&mut self, text: &str) -> Result<Token, ParseError> {
        self.expect(TokenKind::Keyword, Some(text))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        Ok(self.expect(TokenKind::Identifier, None)?.text)
    }

    /// Match a numeric constant and return its value.
    pub(crate) fn expect_constant(&mut self) -> Result<i64, ParseError> {
        let line = self.current_line();
        let token = self.expect(TokenKind::Constant, None)?;
        token.text.parse::<i64>().map_err(|_| {
            ParseError::Syntax(SyntaxError {
                expected: "integer constant in range".to_string(),
                found: token.to_string(),
                line,
                snippet: self.scanner.render_line(line, DEFAULT_CONTEXT_RADIUS),
            })
        })
    }

    /// Build a syntax error against the current lookahead.
    pub(crate) fn error(&self, expected: impl Into<String>) -> ParseError {
        let line = self.current_line();
        let found = match &self.current {
            Some(token) => token.to_string(),
            None => "end of input".to_string(),
        };

        ParseError::Syntax(SyntaxError {
            expected: expected.into(),
            found,
            line,
            snippet: self.scanner.render_line(line, DEFAULT_CONTEXT_RADIUS),
        })
    }
}
