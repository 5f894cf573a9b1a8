//! Semantic error types
//!
//! This module defines [`SemanticError`], raised by the
//! [`Analyzer`](super::Analyzer) when a well-formed program misuses a name.
//! Each error records the AST node it was raised on, the line, and the scope
//! that was active, and renders as `<message>, [<line>:<scope>]`.
//!
//! All semantic errors are fatal: analysis stops at the first one.

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticErrorKind {
    /// Name declared twice in the same scope
    #[error("Symbol(identifier) '{name}' is already declared")]
    AlreadyDeclared { name: String },

    /// Type name that does not resolve to a type symbol
    #[error("Type '{name}' is not declared")]
    UnknownType { name: String },

    /// Variable used without a visible declaration
    #[error("Variable '{name}' has not been declared")]
    UndeclaredVariable { name: String },

    /// Call target missing or not a function
    #[error("'{name}' is not a function")]
    NotAFunction { name: String },

    /// Argument count differs from the function's parameter count
    #[error("Parameter count at '{name}' method did not match: expected {expected}, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

impl SemanticErrorKind {
    /// The offending identifier
    pub fn symbol_name(&self) -> &str {
        match self {
            SemanticErrorKind::AlreadyDeclared { name }
            | SemanticErrorKind::UnknownType { name }
            | SemanticErrorKind::UndeclaredVariable { name }
            | SemanticErrorKind::NotAFunction { name }
            | SemanticErrorKind::ArityMismatch { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}, [{line}:{scope}]")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    /// AST node variant the error was raised on
    pub node: &'static str,
    pub line: usize,
    /// Name of the innermost open scope
    pub scope: String,
}

impl SemanticError {
    pub fn symbol_name(&self) -> &str {
        self.kind.symbol_name()
    }
}
