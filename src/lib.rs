//! # Introduction
//!
//! `minic` is a front end for mini-C, a small teaching subset of C. It scans
//! and parses a translation unit into an abstract syntax tree and then checks
//! that tree for declaration and use errors against a chain of nested scopes.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Scanner → Parser → AST → Analyzer
//! ```
//!
//! 1. [`parser`]: the character [`Source`], the pull-based [`Scanner`], the
//!    recursive descent [`Parser`] and the [`parser::ast`] it builds, plus
//!    [`parser::render`] for turning a tree back into source text.
//! 2. [`semantic`]: the [`Analyzer`] visitor, its [`semantic::symbols`]
//!    scope chain and [`SemanticError`].
//! 3. [`error`]: [`FrontendError`], the union of everything above plus I/O.
//!
//! Parsing and checking are fail-fast: the first error ends the run.
//!
//! ## Example
//!
//! ```
//! let program = minic::check_source("int x;\nint main(void) { x = 1; return x; }").unwrap();
//! assert_eq!(program.declarations.len(), 2);
//!
//! let err = minic::check_source("int main(void) { y = 1; }").unwrap_err();
//! assert_eq!(err.to_string(), "Variable 'y' has not been declared, [1:main]");
//! ```

pub mod error;
pub mod parser;
pub mod semantic;

use std::path::Path;

pub use error::FrontendError;
pub use parser::ast::Program;
pub use parser::parse::{ParseError, Parser, SyntaxError};
pub use parser::scanner::{ScanError, Scanner};
pub use parser::source::Source;
pub use semantic::{Analyzer, SemanticError};

/// Parse mini-C source text into a [`Program`].
pub fn parse_source(text: &str) -> Result<Program, ParseError> {
    Parser::from_text(text)?.parse_program()
}

/// Parse and semantically check mini-C source text.
pub fn check_source(text: &str) -> Result<Program, FrontendError> {
    let program = parse_source(text)?;
    Analyzer::new().analyze(&program)?;
    Ok(program)
}

/// Read, parse and semantically check a mini-C file.
pub fn check_file(path: &Path) -> Result<Program, FrontendError> {
    let source = Source::from_path(path).map_err(|source| FrontendError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let program = Parser::new(Scanner::new(source))?.parse_program()?;
    Analyzer::new().analyze(&program)?;
    Ok(program)
}
