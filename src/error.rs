//! Top-level error type for the front end

use crate::parser::parse::ParseError;
use crate::semantic::SemanticError;
use std::path::PathBuf;

/// Any failure while loading, parsing or checking a translation unit
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}
