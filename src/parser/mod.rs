//! mini-C source code parser
//!
//! This module transforms mini-C source text into an Abstract Syntax Tree (AST):
//! - [`source`]: line-buffered character input with one-step pushback
//! - [`scanner`]: tokenization (characters → tokens), pulled on demand
//! - [`parse`]: recursive descent parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//! - [`render`]: AST back to source text
//!
//! # Supported Language
//!
//! - Types: `int` and `void`
//! - Declarations: global and local variables, functions with parameters
//! - Statements: `if`/`else`, `while`, `for`, `switch` with `case`/`default`,
//!   `return`, `break`, `goto` with named labels, blocks
//! - Expressions: `+ - * /`, relational operators, right-associative
//!   assignment, calls, `a[constant]` subscripts and `a.field` access
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one token of lookahead.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod parse;
pub mod render;
pub mod scanner;
pub mod source;
mod statements;
pub mod token;
