//! Semantic analysis
//!
//! Checks a parsed program for declaration/use errors:
//! - [`symbols`]: type, variable and function symbols and the scope chain
//! - [`analyzer`]: the visitor that resolves names and checks call arity
//! - [`errors`]: [`SemanticError`] and its kinds
//!
//! No type checking is performed beyond resolving type names.

pub mod analyzer;
pub mod errors;
pub mod symbols;

pub use analyzer::{analyze, Analyzer};
pub use errors::{SemanticError, SemanticErrorKind};
