//! Statement parsing implementation
//!
//! This module handles parsing of all mini-C statement types:
//!
//! - Local variable declarations: `int x;`
//! - Control flow: `if`/`else`, `while`, `for`, `switch`
//! - Jump statements: `return`, `break`, `goto`
//! - Labels: `name:`, `case expr:`, `default:`
//! - Compound statements: `{ ... }`
//! - Expression statements and the empty statement `;`
//!
//! # Grammar
//!
//! ```text
//! statement      ::= jump_stmt | var_decl | iteration_stmt | selection_stmt
//!                  | compound_stmt | labeled_stmt | expr_stmt
//! compound_stmt  ::= "{" statement* "}"
//! iteration_stmt ::= "while" "(" expr ")" statement
//!                  | "for" "(" expr? ";" expr? ";" expr? ")" statement
//! selection_stmt ::= "if" "(" expr ")" statement ("else" statement)?
//!                  | "switch" "(" expr ")" statement
//! jump_stmt      ::= "return" expr? ";" | "break" ";" | "goto" identifier ";"
//! labeled_stmt   ::= identifier ":" statement
//!                  | "case" conditional_exp ":" statement
//!                  | "default" ":" statement
//! expr_stmt      ::= expr? ";"
//! ```
//!
//! A statement parses to a `Vec<Stmt>`: a compound statement contributes its
//! statements directly to the enclosing list and `;` contributes nothing.

use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse a statement
    pub fn parse_statement(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let Some(token) = self.current() else {
            return Err(self.error("statement"));
        };
        let kind = token.kind;
        let text = token.text.clone();
        let line = token.line;

        match (kind, text.as_str()) {
            (TokenKind::Keyword, "return" | "break" | "goto") => {
                Ok(vec![self.parse_jump_stmt()?.into()])
            }
            (TokenKind::Keyword, "int" | "void") => Ok(vec![self.parse_var_decl()?.into()]),
            (TokenKind::Keyword, "while" | "for") => Ok(vec![self.parse_iteration_stmt()?]),
            (TokenKind::Keyword, "if" | "switch") => Ok(vec![self.parse_selection_stmt()?]),
            (TokenKind::Keyword, "case" | "default") => {
                Ok(vec![Stmt::Labeled(self.parse_labeled_stmt()?)])
            }
            (TokenKind::Separator, "{") => self.parse_compound_stmt(),
            (TokenKind::Separator, ";") => {
                self.advance()?;
                Ok(Vec::new())
            }
            (TokenKind::Identifier, _) => {
                // Either `name:` or an expression beginning with a variable
                self.advance()?;
                if self.check_separator(":") {
                    let labeled = self.finish_labeled_stmt(Label::Named(text), line)?;
                    return Ok(vec![Stmt::Labeled(labeled)]);
                }

                let var = self.finish_variable(text, line)?;
                let expr = self.parse_expr_from(var)?;
                self.expect_separator(";")?;
                Ok(vec![expr.into()])
            }
            _ => {
                let expr = self.parse_expr_stmt()?;
                Ok(expr.map(Stmt::from).into_iter().collect())
            }
        }
    }

    /// Parse compound statement: `{ statement* }`
    ///
    /// Returns the flattened statements of the block.
    pub fn parse_compound_stmt(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_separator("{")?;

        let mut statements = Vec::new();
        while !self.check_separator("}") {
            if self.is_at_end() {
                return Err(self.error("separator '}'"));
            }
            statements.extend(self.parse_statement()?);
        }

        self.expect_separator("}")?;
        Ok(statements)
    }

    /// Parse `while` or `for` loop
    pub fn parse_iteration_stmt(&mut self) -> Result<Stmt, ParseError> {
        let line = self.current_line();

        if self.check_keyword("while") {
            self.advance()?;
            self.expect_separator("(")?;
            let condition = self.parse_expr()?;
            self.expect_separator(")")?;
            let body = self.parse_statement()?;

            return Ok(Stmt::While(WhileLoop {
                condition,
                body,
                line,
            }));
        }

        self.expect_keyword("for")?;
        self.expect_separator("(")?;
        let init = self.parse_optional_expr(";")?;
        self.expect_separator(";")?;
        let condition = self.parse_optional_expr(";")?;
        self.expect_separator(";")?;
        let step = self.parse_optional_expr(")")?;
        self.expect_separator(")")?;
        let body = self.parse_statement()?;

        Ok(Stmt::For(ForLoop {
            header: ForHeader {
                init,
                condition,
                step,
                line,
            },
            body,
            line,
        }))
    }

    /// Parse `if`/`else` or `switch`
    pub fn parse_selection_stmt(&mut self) -> Result<Stmt, ParseError> {
        let line = self.current_line();

        if self.check_keyword("switch") {
            self.advance()?;
            self.expect_separator("(")?;
            let condition = self.parse_expr()?;
            self.expect_separator(")")?;
            let body = self.parse_statement()?;

            return Ok(Stmt::Switch(SwitchStmt {
                condition,
                body,
                line,
            }));
        }

        self.expect_keyword("if")?;
        self.expect_separator("(")?;
        let condition = self.parse_expr()?;
        self.expect_separator(")")?;
        let body = self.parse_statement()?;

        let else_body = if self.check_keyword("else") {
            self.advance()?;
            self.parse_statement()?
        } else {
            Vec::new()
        };

        Ok(Stmt::If(IfOp {
            condition,
            body,
            else_body,
            line,
        }))
    }

    /// Parse `return [expr];`, `break;` or `goto label;`
    pub fn parse_jump_stmt(&mut self) -> Result<JumpStmt, ParseError> {
        let line = self.current_line();

        let (keyword, value) = if self.check_keyword("return") {
            self.advance()?;
            let value = self.parse_optional_expr(";")?.map(JumpValue::Expr);
            (JumpKeyword::Return, value)
        } else if self.check_keyword("goto") {
            self.advance()?;
            let label = self.expect_identifier()?;
            (JumpKeyword::Goto, Some(JumpValue::Label(label)))
        } else {
            self.expect_keyword("break")?;
            (JumpKeyword::Break, None)
        };

        self.expect_separator(";")?;
        Ok(JumpStmt {
            keyword,
            value,
            line,
        })
    }

    /// Parse `name: stmt`, `case expr: stmt` or `default: stmt`
    pub fn parse_labeled_stmt(&mut self) -> Result<LabeledStmt, ParseError> {
        let line = self.current_line();

        let label = if self.check_keyword("case") {
            self.advance()?;
            Label::Case(self.parse_conditional_exp()?)
        } else if self.check_keyword("default") {
            self.advance()?;
            Label::Default
        } else if self.check_kind(TokenKind::Identifier) {
            Label::Named(self.expect_identifier()?)
        } else {
            return Err(self.error("label"));
        };

        self.finish_labeled_stmt(label, line)
    }

    fn finish_labeled_stmt(
        &mut self,
        label: Label,
        line: usize,
    ) -> Result<LabeledStmt, ParseError> {
        self.expect_separator(":")?;
        let body = self.parse_statement()?;
        Ok(LabeledStmt { label, body, line })
    }

    /// Parse expression statement: `[expr];`
    pub fn parse_expr_stmt(&mut self) -> Result<Option<Expr>, ParseError> {
        let expr = self.parse_optional_expr(";")?;
        self.expect_separator(";")?;
        Ok(expr)
    }

    /// Parse an expression unless the lookahead is the given separator.
    fn parse_optional_expr(&mut self, terminator: &str) -> Result<Option<Expr>, ParseError> {
        if self.check_separator(terminator) {
            Ok(None)
        } else {
            self.parse_expr().map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Vec<Stmt>, ParseError> {
        Parser::from_text(source)?.parse_statement()
    }

    fn statement(source: &str) -> Vec<Stmt> {
        parse(source).unwrap()
    }

    fn fails(source: &str) -> bool {
        parse(source).is_err()
    }

    #[test]
    fn test_empty_statement() {
        assert!(statement(";").is_empty());
    }

    #[test]
    fn test_compound_is_flattened() {
        let stmts = statement("{ int x; x = 1; { x = 2; } ; }");
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0], Stmt::VarDecl(VarDecl::new(1, "int", "x")));
        assert_eq!(stmts[2].node_name(), "AssignmentOp");
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse("{ x = 1;").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_return_forms() {
        assert_eq!(
            statement("return;"),
            vec![Stmt::Jump(JumpStmt {
                keyword: JumpKeyword::Return,
                value: None,
                line: 1,
            })]
        );

        match &statement("return x + 1;")[0] {
            Stmt::Jump(jump) => {
                assert_eq!(jump.keyword, JumpKeyword::Return);
                assert_eq!(jump.expr().map(Expr::node_name), Some("BinOp"));
            }
            other => panic!("Expected jump, got {:?}", other),
        }
    }

    #[test]
    fn test_goto_and_break() {
        assert_eq!(
            statement("goto done;"),
            vec![Stmt::Jump(JumpStmt {
                keyword: JumpKeyword::Goto,
                value: Some(JumpValue::Label("done".to_string())),
                line: 1,
            })]
        );
        assert!(fails("goto 3;"));
        assert!(fails("break 1;"));
    }

    #[test]
    fn test_if_else() {
        match &statement("if (x < 1) { x = 1; } else x = 2;")[0] {
            Stmt::If(node) => {
                assert_eq!(node.condition.node_name(), "RelOp");
                assert_eq!(node.body.len(), 1);
                assert_eq!(node.else_body.len(), 1);
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_empty_header() {
        assert_eq!(
            statement("for(; ; ){}"),
            vec![Stmt::For(ForLoop {
                header: ForHeader {
                    init: None,
                    condition: None,
                    step: None,
                    line: 1,
                },
                body: Vec::new(),
                line: 1,
            })]
        );
    }

    #[test]
    fn test_for_with_full_header() {
        match &statement("for (i = 0; i < 10; i = i + 1) x = x + i;")[0] {
            Stmt::For(node) => {
                assert!(node.header.init.is_some());
                assert!(node.header.condition.is_some());
                assert!(node.header.step.is_some());
                assert_eq!(node.body.len(), 1);
            }
            other => panic!("Expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_while() {
        match &statement("while (n != 0) { n = n - 1; }")[0] {
            Stmt::While(node) => assert_eq!(node.body.len(), 1),
            other => panic!("Expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_switch_with_cases() {
        match &statement("switch (x) { case 1: y = 1; default: y = 0; }")[0] {
            Stmt::Switch(node) => match &node.body[..] {
                [Stmt::Labeled(case), Stmt::Labeled(default)] => {
                    assert!(matches!(case.label, Label::Case(Expr::Num(_))));
                    assert_eq!(default.label, Label::Default);
                }
                other => panic!("Expected two labels, got {:?}", other),
            },
            other => panic!("Expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_named_label() {
        assert_eq!(
            statement("done: return;"),
            vec![Stmt::Labeled(LabeledStmt {
                label: Label::Named("done".to_string()),
                body: vec![Stmt::Jump(JumpStmt {
                    keyword: JumpKeyword::Return,
                    value: None,
                    line: 1,
                })],
                line: 1,
            })]
        );
    }

    #[test]
    fn test_identifier_statement_is_expression() {
        let assign = Expr::assign(1, Var::new(1, "x"), Expr::var(1, "y"));
        assert_eq!(statement("x = y;"), vec![Stmt::Expr(assign)]);

        let call = Expr::call(1, "f", Some(vec![Expr::num(1, 1)]));
        assert_eq!(statement("f(1);"), vec![Stmt::Expr(call)]);
    }

    #[test]
    fn test_expression_statement_requires_semicolon() {
        assert!(fails("x = 1"));
        assert!(fails("(1 + 2)"));
    }

    #[test]
    fn test_else_without_if() {
        assert!(fails("else x = 1;"));
    }
}
