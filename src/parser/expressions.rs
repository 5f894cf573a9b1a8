//! Expression parsing implementation
//!
//! This module handles parsing of mini-C expressions by recursive descent,
//! one method per precedence level.
//!
//! # Grammar
//!
//! ```text
//! expr            ::= assignment_exp | conditional_exp
//! assignment_exp  ::= variable "=" expr
//! conditional_exp ::= add_exp (relop add_exp)*
//! add_exp         ::= multi_exp (("+" | "-") multi_exp)*
//! multi_exp       ::= pri_exp (("*" | "/") pri_exp)*
//! pri_exp         ::= call | variable | constant | "(" add_exp ")"
//! variable        ::= identifier ("[" constant "]" | "." identifier)?
//! call            ::= identifier "(" argument_list ")"
//! argument_list   ::= (expr ("," expr)*)?
//! ```
//!
//! # Precedence
//!
//! From loosest to tightest: assignment (right-associative), relational,
//! additive, multiplicative. All binary levels are left-associative.
//!
//! An expression that starts with an identifier is ambiguous until the token
//! after the variable is seen: `=` makes it an assignment, `(` makes it a call
//! and anything else makes it an operand. The variable is parsed once and
//! then handed down the precedence chain as a seed, so no backtracking is
//! needed.

use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse expression (top-level entry point)
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if self.check_kind(TokenKind::Identifier) {
            let var = self.parse_variable()?;
            self.parse_expr_from(var)
        } else {
            self.parse_conditional_exp()
        }
    }

    /// Continue an expression whose leading variable is already parsed.
    pub(crate) fn parse_expr_from(&mut self, var: Var) -> Result<Expr, ParseError> {
        if self.check_kind(TokenKind::Assignment) {
            self.advance()?;
            let line = var.line;
            let value = self.parse_expr()?;
            return Ok(Expr::assign(line, var, value));
        }

        self.parse_conditional_from(Some(var))
    }

    /// Parse assignment: `variable = expr` (right-associative)
    pub fn parse_assignment_exp(&mut self) -> Result<Expr, ParseError> {
        let var = self.parse_variable()?;
        self.expect(TokenKind::Assignment, None)?;
        let value = self.parse_expr()?;
        Ok(Expr::assign(var.line, var, value))
    }

    /// Parse relational comparisons
    pub fn parse_conditional_exp(&mut self) -> Result<Expr, ParseError> {
        self.parse_conditional_from(None)
    }

    fn parse_conditional_from(&mut self, seed: Option<Var>) -> Result<Expr, ParseError> {
        let mut left = self.parse_add_from(seed)?;

        while let Some(operator) = self.relational_operator() {
            self.advance()?;
            let right = self.parse_add_exp()?;
            left = Expr::rel(left.line(), operator, left, right);
        }

        Ok(left)
    }

    /// Parse `+` and `-`
    pub fn parse_add_exp(&mut self) -> Result<Expr, ParseError> {
        self.parse_add_from(None)
    }

    fn parse_add_from(&mut self, seed: Option<Var>) -> Result<Expr, ParseError> {
        let mut left = self.parse_multi_from(seed)?;

        while let Some(operator) = self.arithmetic_operator(false) {
            self.advance()?;
            let right = self.parse_multi_exp()?;
            left = Expr::bin(left.line(), operator, left, right);
        }

        Ok(left)
    }

    /// Parse `*` and `/`
    pub fn parse_multi_exp(&mut self) -> Result<Expr, ParseError> {
        self.parse_multi_from(None)
    }

    fn parse_multi_from(&mut self, seed: Option<Var>) -> Result<Expr, ParseError> {
        let mut left = self.parse_pri_from(seed)?;

        while let Some(operator) = self.arithmetic_operator(true) {
            self.advance()?;
            let right = self.parse_pri_exp()?;
            left = Expr::bin(left.line(), operator, left, right);
        }

        Ok(left)
    }

    /// Parse primary expression: call, variable, constant or `( add_exp )`
    pub fn parse_pri_exp(&mut self) -> Result<Expr, ParseError> {
        self.parse_pri_from(None)
    }

    fn parse_pri_from(&mut self, seed: Option<Var>) -> Result<Expr, ParseError> {
        if let Some(var) = seed {
            return self.finish_primary(var);
        }

        let Some(token) = self.current() else {
            return Err(self.error("expression"));
        };
        let kind = token.kind;
        let line = token.line;
        let opens_group = token.is_separator("(");

        match kind {
            TokenKind::Identifier => {
                let var = self.parse_variable()?;
                self.finish_primary(var)
            }
            TokenKind::Constant => {
                let value = self.expect_constant()?;
                Ok(Expr::num(line, value))
            }
            TokenKind::Separator if opens_group => {
                self.advance()?;
                let inner = self.parse_add_exp()?;
                self.expect_separator(")")?;
                Ok(inner)
            }
            _ => Err(self.error("expression")),
        }
    }

    /// A plain variable followed by `(` is a call; a subscripted or field
    /// variable stays a variable.
    fn finish_primary(&mut self, var: Var) -> Result<Expr, ParseError> {
        if var.access.is_none() && self.check_separator("(") {
            return self.finish_call(var.name, var.line).map(Expr::Call);
        }
        Ok(Expr::Var(var))
    }

    /// Parse variable reference: `name`, `name[constant]` or `name.field`
    pub fn parse_variable(&mut self) -> Result<Var, ParseError> {
        let line = self.current_line();
        let name = self.expect_identifier()?;
        self.finish_variable(name, line)
    }

    /// Parse the optional suffix of a variable whose name is already consumed.
    pub(crate) fn finish_variable(&mut self, name: String, line: usize) -> Result<Var, ParseError> {
        if self.check_separator("[") {
            self.advance()?;
            let index = self.expect_constant()?;
            self.expect_separator("]")?;
            return Ok(Var::indexed(line, name, index));
        }

        if self.check_separator(".") {
            self.advance()?;
            let field = self.expect_identifier()?;
            return Ok(Var::field(line, name, field));
        }

        Ok(Var::new(line, name))
    }

    /// Parse function call: `name(args)`
    pub fn parse_call(&mut self) -> Result<CallFuncOp, ParseError> {
        let line = self.current_line();
        let name = self.expect_identifier()?;
        self.finish_call(name, line)
    }

    fn finish_call(&mut self, name: String, line: usize) -> Result<CallFuncOp, ParseError> {
        self.expect_separator("(")?;
        let args = self.parse_argument_list()?;
        self.expect_separator(")")?;
        Ok(CallFuncOp { name, args, line })
    }

    /// Parse call arguments up to (not including) the closing `)`.
    ///
    /// An empty list yields `None`.
    pub fn parse_argument_list(&mut self) -> Result<Option<Vec<Expr>>, ParseError> {
        if self.check_separator(")") {
            return Ok(None);
        }

        let mut args = vec![self.parse_expr()?];
        while self.check_separator(",") {
            self.advance()?;
            args.push(self.parse_expr()?);
        }

        Ok(Some(args))
    }

    fn relational_operator(&self) -> Option<RelOperator> {
        self.current()
            .filter(|t| t.kind == TokenKind::RelationalOp)
            .and_then(|t| RelOperator::from_symbol(&t.text))
    }

    fn arithmetic_operator(&self, multiplicative: bool) -> Option<ArithOp> {
        self.current()
            .filter(|t| t.kind == TokenKind::ArithmeticOp)
            .and_then(|t| ArithOp::from_symbol(&t.text))
            .filter(|op| op.is_multiplicative() == multiplicative)
    }
}
