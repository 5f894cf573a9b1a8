//! Declaration parsing implementation
//!
//! This module handles parsing of top-level declarations and parameters:
//!
//! - Variable declarations: `int x;`
//! - Function definitions: `type name(params) { ... }`
//! - Parameter lists, including the `(void)` marker
//!
//! # Grammar
//!
//! ```text
//! declaration    ::= var_decl | func_decl
//! var_decl       ::= type_decl ";"
//! func_decl      ::= type_decl "(" param_list ")" compound_stmt
//! type_decl      ::= type_specifier identifier
//! type_specifier ::= "int" | "void"
//! param_list     ::= "void" | param ("," param)*
//! param          ::= type_specifier identifier?
//! ```
//!
//! All parsing methods are implemented as public methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse a top-level declaration (variable or function)
    ///
    /// After the shared `type identifier` prefix, a `;` selects a variable
    /// declaration and anything else is parsed as a function definition.
    pub fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let prefix = self.parse_type_decl()?;

        if self.check_separator(";") {
            self.advance()?;
            let decl = VarDecl::new(prefix.line, prefix.type_name, prefix.name);
            return Ok(Declaration::Var(decl));
        }

        self.finish_func_decl(prefix).map(Declaration::Func)
    }

    /// Parse variable declaration: `type name;`
    pub fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let prefix = self.parse_type_decl()?;
        self.expect_separator(";")?;
        Ok(VarDecl::new(prefix.line, prefix.type_name, prefix.name))
    }

    /// Parse function definition: `type name(params) { body }`
    pub fn parse_func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        let prefix = self.parse_type_decl()?;
        self.finish_func_decl(prefix)
    }

    fn finish_func_decl(&mut self, prefix: TypeDecl) -> Result<FuncDecl, ParseError> {
        self.expect_separator("(")?;
        let params = self.parse_param_list()?;
        self.expect_separator(")")?;
        let body = self.parse_compound_stmt()?;

        Ok(FuncDecl {
            return_type: prefix.type_name,
            name: prefix.name,
            params,
            body,
            line: prefix.line,
        })
    }

    /// Parse the `type name` prefix shared by variables and functions
    pub fn parse_type_decl(&mut self) -> Result<TypeDecl, ParseError> {
        let line = self.current_line();
        let type_name = self.parse_type_specifier()?;
        let name = self.expect_identifier()?;

        Ok(TypeDecl {
            type_name,
            name,
            line,
        })
    }

    /// Parse `int` or `void`
    pub fn parse_type_specifier(&mut self) -> Result<String, ParseError> {
        if !self.current().is_some_and(|t| t.is_type_keyword()) {
            return Err(self.error("type specifier 'int' or 'void'"));
        }

        match self.advance()? {
            Some(token) => Ok(token.text),
            None => Err(self.error("type specifier")),
        }
    }

    /// Parse a parameter list
    ///
    /// A leading `void` parameter ends the list: `(void)` yields exactly one
    /// unnamed `void` parameter.
    pub fn parse_param_list(&mut self) -> Result<Vec<ParamDecl>, ParseError> {
        let first = self.parse_param()?;
        if first.is_void_marker() {
            return Ok(vec![first]);
        }

        let mut params = vec![first];
        while self.check_separator(",") {
            self.advance()?;
            params.push(self.parse_param()?);
        }

        Ok(params)
    }

    /// Parse one parameter: `type [name]`
    ///
    /// A `void` parameter never carries a name.
    pub fn parse_param(&mut self) -> Result<ParamDecl, ParseError> {
        let line = self.current_line();
        let type_name = self.parse_type_specifier()?;

        if type_name == "void" {
            return Ok(ParamDecl::new(line, type_name, None));
        }

        let name = if self.check_kind(TokenKind::Identifier) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        Ok(ParamDecl {
            type_name,
            name,
            line,
        })
    }
}
