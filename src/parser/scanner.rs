//! Scanner (tokenizer) for mini-C source
//!
//! A pull-based, single-pass state machine over a [`Source`]. The parser asks
//! for one token at a time through [`Scanner::next_token`]; nothing is
//! pre-tokenized. The kind of the token being built doubles as the scanner
//! state:
//!
//! - [`TokenKind::Start`]: skipping whitespace, nothing consumed yet
//! - [`TokenKind::Identifier`]: inside an identifier or keyword
//! - [`TokenKind::Constant`]: inside a numeric literal
//! - [`TokenKind::RelationalOp`]: inside a symbolic run (`<`, `>`, `=`, `!`),
//!   resolved to a relational operator or an assignment when it ends
//!
//! Arithmetic operators and separators are always one character long and are
//! returned as soon as they are read. A lexeme ends at the first character
//! that cannot extend it; that character is pushed back unless it is
//! whitespace.

use super::source::Source;
use super::token::{Token, TokenKind, KEYWORDS};
use tracing::trace;

const ARITHMETIC_OPERATORS: &[char] = &['+', '-', '*', '/'];
const RELATIONAL_OPERATORS: &[&str] = &["<", "<=", ">", ">=", "==", "!="];
const SYMBOLIC_START: &[char] = &['<', '>', '=', '!'];
const SEPARATORS: &[char] = &['(', ')', '{', '}', ';', ':', ',', '[', ']', '.'];

/// Malformed lexeme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Unexpected character '{ch}' at line {line}")]
    UnexpectedCharacter { ch: char, line: usize },

    #[error("Constant cannot contain alphabet: {lexeme} + '{ch}' at line {line}")]
    LetterInConstant {
        lexeme: String,
        ch: char,
        line: usize,
    },

    #[error("ID cannot contain numbers: {lexeme} at line {line}")]
    DigitInIdentifier { lexeme: String, line: usize },

    #[error("Unknown operator '{lexeme}' at line {line}")]
    UnknownOperator { lexeme: String, line: usize },
}

impl ScanError {
    pub fn line(&self) -> usize {
        match self {
            ScanError::UnexpectedCharacter { line, .. }
            | ScanError::LetterInConstant { line, .. }
            | ScanError::DigitInIdentifier { line, .. }
            | ScanError::UnknownOperator { line, .. } => *line,
        }
    }
}

/// Pull-based tokenizer over a [`Source`].
#[derive(Debug, Clone)]
pub struct Scanner {
    source: Source,
}

impl Scanner {
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(Source::from_text(text))
    }

    /// Whether unread characters remain (possibly only whitespace).
    pub fn has_more(&self) -> bool {
        self.source.has_more()
    }

    /// Render line `number` with surrounding context for diagnostics.
    pub fn render_line(&self, number: usize, radius: usize) -> String {
        self.source.render_line(number, radius)
    }

    /// Scan the next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        let mut token = Token::new(TokenKind::Start, String::new(), self.source.line_number());

        loop {
            let line = self.source.line_number();
            let Some(ch) = self.source.next_char() else {
                break;
            };

            match token.kind {
                TokenKind::Start => {
                    if ch.is_whitespace() {
                        continue;
                    }

                    token.line = line;
                    token.text.push(ch);

                    if ch.is_ascii_alphabetic() {
                        token.kind = TokenKind::Identifier;
                    } else if ch.is_ascii_digit() {
                        token.kind = TokenKind::Constant;
                    } else if SYMBOLIC_START.contains(&ch) {
                        token.kind = TokenKind::RelationalOp;
                    } else if ARITHMETIC_OPERATORS.contains(&ch) {
                        token.kind = TokenKind::ArithmeticOp;
                        return Ok(Some(emit(token)));
                    } else if SEPARATORS.contains(&ch) {
                        token.kind = TokenKind::Separator;
                        return Ok(Some(emit(token)));
                    } else {
                        return Err(ScanError::UnexpectedCharacter { ch, line });
                    }
                }

                TokenKind::Identifier | TokenKind::Constant => {
                    if ch.is_ascii_alphanumeric() {
                        if token.kind == TokenKind::Constant && ch.is_ascii_alphabetic() {
                            return Err(ScanError::LetterInConstant {
                                lexeme: token.text,
                                ch,
                                line: token.line,
                            });
                        }
                        token.text.push(ch);
                        continue;
                    }

                    if !ch.is_whitespace() {
                        self.source.back();
                    }
                    return finish_word(token).map(Some);
                }

                TokenKind::RelationalOp => {
                    if SYMBOLIC_START.contains(&ch) {
                        token.text.push(ch);
                        continue;
                    }

                    if !ch.is_whitespace() {
                        self.source.back();
                    }
                    return finish_symbol(token).map(Some);
                }

                // Never used as scanning states
                TokenKind::Keyword
                | TokenKind::ArithmeticOp
                | TokenKind::Separator
                | TokenKind::Assignment => return Ok(Some(emit(token))),
            }
        }

        // End of input terminates whatever lexeme is in progress
        match token.kind {
            TokenKind::Start => Ok(None),
            TokenKind::Identifier | TokenKind::Constant => finish_word(token).map(Some),
            TokenKind::RelationalOp => finish_symbol(token).map(Some),
            _ => Ok(Some(emit(token))),
        }
    }
}

impl Iterator for Scanner {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn finish_word(mut token: Token) -> Result<Token, ScanError> {
    if token.kind == TokenKind::Identifier {
        if !token.text.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(ScanError::DigitInIdentifier {
                lexeme: token.text,
                line: token.line,
            });
        }
        if KEYWORDS.contains(&token.text.as_str()) {
            token.kind = TokenKind::Keyword;
        }
    }
    Ok(emit(token))
}

fn finish_symbol(mut token: Token) -> Result<Token, ScanError> {
    if token.text == "=" {
        token.kind = TokenKind::Assignment;
    } else if !RELATIONAL_OPERATORS.contains(&token.text.as_str()) {
        return Err(ScanError::UnknownOperator {
            lexeme: token.text,
            line: token.line,
        });
    }
    Ok(emit(token))
}

fn emit(token: Token) -> Token {
    trace!(kind = %token.kind, text = %token.text, line = token.line, "scanned token");
    token
}
