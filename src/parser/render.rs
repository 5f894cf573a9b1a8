//! Render an AST back to mini-C source
//!
//! Output re-parses to the same tree (up to line numbers). Expressions are
//! printed with the fewest parentheses that preserve their shape; every
//! statement body is printed as a braced block.

use crate::parser::ast::*;
use std::fmt::{self, Write as _};

const INDENT: &str = "    ";

/// Binding strength of an arithmetic operator
fn precedence(operator: ArithOp) -> u8 {
    if operator.is_multiplicative() {
        2
    } else {
        1
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &Expr,
    parent: ArithOp,
    right: bool,
) -> fmt::Result {
    let needs_parens = match operand {
        Expr::BinOp(child) => {
            let (child, parent) = (precedence(child.operator), precedence(parent));
            child < parent || (right && child == parent)
        }
        _ => false,
    };

    if needs_parens {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

/// Text of an optional `for` header part; empty when absent
fn optional(expr: &Option<Expr>) -> String {
    expr.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.access {
            None => write!(f, "{}", self.name),
            Some(Access::Index(index)) => write!(f, "{}[{}]", self.name, index),
            Some(Access::Field(field)) => write!(f, "{}.{}", self.name, field),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(num) => write!(f, "{}", num.value),
            Expr::Var(var) => write!(f, "{}", var),
            Expr::BinOp(node) => {
                write_operand(f, &node.left, node.operator, false)?;
                write!(f, " {} ", node.operator)?;
                write_operand(f, &node.right, node.operator, true)
            }
            Expr::RelOp(node) => write!(f, "{} {} {}", node.left, node.operator, node.right),
            Expr::Assignment(node) => write!(f, "{} = {}", node.target, node.value),
            Expr::Call(node) => {
                write!(f, "{}(", node.name)?;
                for (i, arg) in node.args.iter().flatten().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for ParamDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {}", self.type_name, name),
            None => f.write_str(&self.type_name),
        }
    }
}

/// Indenting writer over a `String`
struct Renderer {
    out: String,
    depth: usize,
}

impl Renderer {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: impl fmt::Display) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        let _ = writeln!(self.out, "{}", text);
    }

    fn block(&mut self, body: &[Stmt]) {
        self.depth += 1;
        for stmt in body {
            self.stmt(stmt);
        }
        self.depth -= 1;
    }

    fn declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Var(var) => self.line(format_args!("{} {};", var.type_name, var.name)),
            Declaration::Func(func) => {
                let params: Vec<String> = func.params.iter().map(ToString::to_string).collect();
                self.line(format_args!(
                    "{} {}({}) {{",
                    func.return_type,
                    func.name,
                    params.join(", ")
                ));
                self.block(&func.body);
                self.line("}");
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(var) => self.line(format_args!("{} {};", var.type_name, var.name)),
            Stmt::Expr(expr) => self.line(format_args!("{};", expr)),
            Stmt::If(node) => {
                self.line(format_args!("if ({}) {{", node.condition));
                self.block(&node.body);
                if node.else_body.is_empty() {
                    self.line("}");
                } else {
                    self.line("} else {");
                    self.block(&node.else_body);
                    self.line("}");
                }
            }
            Stmt::While(node) => {
                self.line(format_args!("while ({}) {{", node.condition));
                self.block(&node.body);
                self.line("}");
            }
            Stmt::For(node) => {
                let header = &node.header;
                self.line(format_args!(
                    "for ({}; {}; {}) {{",
                    optional(&header.init),
                    optional(&header.condition),
                    optional(&header.step)
                ));
                self.block(&node.body);
                self.line("}");
            }
            Stmt::Switch(node) => {
                self.line(format_args!("switch ({}) {{", node.condition));
                self.block(&node.body);
                self.line("}");
            }
            Stmt::Jump(node) => match &node.value {
                None => self.line(format_args!("{};", node.keyword)),
                Some(JumpValue::Expr(expr)) => {
                    self.line(format_args!("{} {};", node.keyword, expr))
                }
                Some(JumpValue::Label(label)) => {
                    self.line(format_args!("{} {};", node.keyword, label))
                }
            },
            Stmt::Labeled(node) => {
                match &node.label {
                    Label::Named(name) => self.line(format_args!("{}: {{", name)),
                    Label::Case(expr) => self.line(format_args!("case {}: {{", expr)),
                    Label::Default => self.line("default: {"),
                }
                self.block(&node.body);
                self.line("}");
            }
        }
    }

    fn finish(mut self) -> String {
        self.out.truncate(self.out.trim_end_matches('\n').len());
        self.out
    }
}

/// Render a whole program, one declaration after another.
pub fn render_program(program: &Program) -> String {
    let mut renderer = Renderer::new();
    for decl in &program.declarations {
        renderer.declaration(decl);
    }
    renderer.out
}

/// Render a statement list at the outermost indentation level.
pub fn render_statements(stmts: &[Stmt]) -> String {
    let mut renderer = Renderer::new();
    for stmt in stmts {
        renderer.stmt(stmt);
    }
    renderer.out
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::new();
        renderer.stmt(self);
        f.write_str(&renderer.finish())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_program(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn reparse_expr(source: &str) -> String {
        let expr = Parser::from_text(source).unwrap().parse_expr().unwrap();
        expr.to_string()
    }

    #[test]
    fn test_minimal_parentheses() {
        assert_eq!(reparse_expr("(1+2)*3"), "(1 + 2) * 3");
        assert_eq!(reparse_expr("1+(2*3)"), "1 + 2 * 3");
        assert_eq!(reparse_expr("8-(4-2)"), "8 - (4 - 2)");
        assert_eq!(reparse_expr("(8-4)-2"), "8 - 4 - 2");
        assert_eq!(reparse_expr("a/(b*c)"), "a / (b * c)");
    }

    #[test]
    fn test_expression_forms() {
        assert_eq!(reparse_expr("x=y=10"), "x = y = 10");
        assert_eq!(reparse_expr("f(g(1),a[2],b.c)"), "f(g(1), a[2], b.c)");
        assert_eq!(reparse_expr("f()"), "f()");
        assert_eq!(reparse_expr("a+1>=b"), "a + 1 >= b");
    }

    #[test]
    fn test_render_function() {
        let source = "int f(int a, int) { if (a) { return a; } else return 0; }";
        let program = Parser::from_text(source).unwrap().parse_program().unwrap();

        let expected = [
            "int f(int a, int) {",
            "    if (a) {",
            "        return a;",
            "    } else {",
            "        return 0;",
            "    }",
            "}",
            "",
        ];
        assert_eq!(render_program(&program), expected.join("\n"));
    }

    #[test]
    fn test_stmt_display() {
        let stmts = Parser::from_text("for(;;) break;")
            .unwrap()
            .parse_statement()
            .unwrap();
        assert_eq!(stmts[0].to_string(), "for (; ; ) {\n    break;\n}");
    }
}
