// AST (Abstract Syntax Tree) definitions for mini-C
//
// Every node records the 1-based source line it started on. Children are
// owned by exactly one parent, and every statement-holding field is a
// `Vec<Stmt>` so a lone statement and a braced block share one shape.

use std::fmt;

/// Arithmetic operators (`BinOp`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, ArithOp::Mul | ArithOp::Div)
    }
}

/// Relational operators (`RelOp`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOperator {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl RelOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(RelOperator::Lt),
            ">" => Some(RelOperator::Gt),
            "<=" => Some(RelOperator::Le),
            ">=" => Some(RelOperator::Ge),
            "==" => Some(RelOperator::Eq),
            "!=" => Some(RelOperator::Ne),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            RelOperator::Lt => "<",
            RelOperator::Gt => ">",
            RelOperator::Le => "<=",
            RelOperator::Ge => ">=",
            RelOperator::Eq => "==",
            RelOperator::Ne => "!=",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for RelOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ===== Declarations =====

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub line: usize,
}

impl Program {
    pub fn new(line: usize) -> Self {
        Program {
            declarations: Vec::new(),
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Var(VarDecl),
    Func(FuncDecl),
}

impl Declaration {
    pub fn line(&self) -> usize {
        match self {
            Declaration::Var(decl) => decl.line,
            Declaration::Func(decl) => decl.line,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Var(decl) => &decl.name,
            Declaration::Func(decl) => &decl.name,
        }
    }
}

/// Variable declaration: `int x;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub type_name: String,
    pub name: String,
    pub line: usize,
}

impl VarDecl {
    pub fn new(line: usize, type_name: impl Into<String>, name: impl Into<String>) -> Self {
        VarDecl {
            type_name: type_name.into(),
            name: name.into(),
            line,
        }
    }
}

/// `type_specifier identifier` prefix shared by variables and functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub type_name: String,
    pub name: String,
    pub line: usize,
}

/// Function parameter. The name is absent only for a lone `void`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub type_name: String,
    pub name: Option<String>,
    pub line: usize,
}

impl ParamDecl {
    pub fn new(line: usize, type_name: impl Into<String>, name: Option<&str>) -> Self {
        ParamDecl {
            type_name: type_name.into(),
            name: name.map(str::to_string),
            line,
        }
    }

    /// The `void` in `f(void)`, meaning "no parameters".
    pub fn is_void_marker(&self) -> bool {
        self.type_name == "void" && self.name.is_none()
    }
}

/// Function definition: `int f(int a) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub return_type: String,
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub body: Vec<Stmt>,
    pub line: usize,
}

impl FuncDecl {
    /// Number of parameters, with `(void)` counting as zero.
    pub fn arity(&self) -> usize {
        match self.params.first() {
            Some(first) if first.is_void_marker() => 0,
            _ => self.params.len(),
        }
    }
}

// ===== Expressions =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Num {
    pub value: i64,
    pub line: usize,
}

/// Single subscript or single field suffix on a variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Index(i64),
    Field(String),
}

/// Display tag of a variable reference; does not affect evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Variable,
    Array,
    Object,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            VarKind::Variable => "variable",
            VarKind::Array => "array",
            VarKind::Object => "object",
        };
        f.write_str(tag)
    }
}

/// Variable reference: `x`, `x[2]` or `x.field`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: String,
    pub access: Option<Access>,
    pub line: usize,
}

impl Var {
    pub fn new(line: usize, name: impl Into<String>) -> Self {
        Var {
            name: name.into(),
            access: None,
            line,
        }
    }

    pub fn indexed(line: usize, name: impl Into<String>, index: i64) -> Self {
        Var {
            name: name.into(),
            access: Some(Access::Index(index)),
            line,
        }
    }

    pub fn field(line: usize, name: impl Into<String>, field: impl Into<String>) -> Self {
        Var {
            name: name.into(),
            access: Some(Access::Field(field.into())),
            line,
        }
    }

    pub fn kind(&self) -> VarKind {
        match self.access {
            None => VarKind::Variable,
            Some(Access::Index(_)) => VarKind::Array,
            Some(Access::Field(_)) => VarKind::Object,
        }
    }

    pub fn subscript(&self) -> Option<i64> {
        match self.access {
            Some(Access::Index(index)) => Some(index),
            _ => None,
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        match &self.access {
            Some(Access::Field(field)) => Some(field),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinOp {
    pub operator: ArithOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelOp {
    pub operator: RelOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub line: usize,
}

/// Assignment is an expression, so `a = b = 3` nests to the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentOp {
    pub target: Var,
    pub value: Box<Expr>,
    pub line: usize,
}

/// Function call. `args` is `None` for an empty argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFuncOp {
    pub name: String,
    pub args: Option<Vec<Expr>>,
    pub line: usize,
}

impl CallFuncOp {
    pub fn arg_count(&self) -> usize {
        self.args.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Num(Num),
    Var(Var),
    BinOp(BinOp),
    RelOp(RelOp),
    Assignment(AssignmentOp),
    Call(CallFuncOp),
}

impl Expr {
    pub fn num(line: usize, value: i64) -> Self {
        Expr::Num(Num { value, line })
    }

    pub fn var(line: usize, name: impl Into<String>) -> Self {
        Expr::Var(Var::new(line, name))
    }

    pub fn bin(line: usize, operator: ArithOp, left: Expr, right: Expr) -> Self {
        Expr::BinOp(BinOp {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            line,
        })
    }

    pub fn rel(line: usize, operator: RelOperator, left: Expr, right: Expr) -> Self {
        Expr::RelOp(RelOp {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            line,
        })
    }

    pub fn assign(line: usize, target: Var, value: Expr) -> Self {
        Expr::Assignment(AssignmentOp {
            target,
            value: Box::new(value),
            line,
        })
    }

    pub fn call(line: usize, name: impl Into<String>, args: Option<Vec<Expr>>) -> Self {
        Expr::Call(CallFuncOp {
            name: name.into(),
            args,
            line,
        })
    }

    pub fn line(&self) -> usize {
        match self {
            Expr::Num(node) => node.line,
            Expr::Var(node) => node.line,
            Expr::BinOp(node) => node.line,
            Expr::RelOp(node) => node.line,
            Expr::Assignment(node) => node.line,
            Expr::Call(node) => node.line,
        }
    }

    /// Variant name used in diagnostics.
    pub fn node_name(&self) -> &'static str {
        match self {
            Expr::Num(_) => "Num",
            Expr::Var(_) => "Var",
            Expr::BinOp(_) => "BinOp",
            Expr::RelOp(_) => "RelOp",
            Expr::Assignment(_) => "AssignmentOp",
            Expr::Call(_) => "CallFuncOp",
        }
    }
}

// ===== Statements =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfOp {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    /// Empty when there is no `else`
    pub else_body: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileLoop {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForHeader {
    pub init: Option<Expr>,
    pub condition: Option<Expr>,
    pub step: Option<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForLoop {
    pub header: ForHeader,
    pub body: Vec<Stmt>,
    pub line: usize,
}

/// `switch (expr) statement`, checked like an `if` without `else`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKeyword {
    Return,
    Break,
    Goto,
}

impl JumpKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            JumpKeyword::Return => "return",
            JumpKeyword::Break => "break",
            JumpKeyword::Goto => "goto",
        }
    }
}

impl fmt::Display for JumpKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpValue {
    Expr(Expr),
    Label(String),
}

/// `return [expr];`, `break;` or `goto label;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpStmt {
    pub keyword: JumpKeyword,
    pub value: Option<JumpValue>,
    pub line: usize,
}

impl JumpStmt {
    pub fn expr(&self) -> Option<&Expr> {
        match &self.value {
            Some(JumpValue::Expr(expr)) => Some(expr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Named(String),
    Case(Expr),
    Default,
}

/// `label: stmt`, `case expr: stmt` or `default: stmt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledStmt {
    pub label: Label,
    pub body: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    VarDecl(VarDecl),
    Expr(Expr),
    If(IfOp),
    While(WhileLoop),
    For(ForLoop),
    Switch(SwitchStmt),
    Jump(JumpStmt),
    Labeled(LabeledStmt),
}

impl Stmt {
    pub fn line(&self) -> usize {
        match self {
            Stmt::VarDecl(node) => node.line,
            Stmt::Expr(expr) => expr.line(),
            Stmt::If(node) => node.line,
            Stmt::While(node) => node.line,
            Stmt::For(node) => node.line,
            Stmt::Switch(node) => node.line,
            Stmt::Jump(node) => node.line,
            Stmt::Labeled(node) => node.line,
        }
    }

    /// Variant name used in diagnostics.
    pub fn node_name(&self) -> &'static str {
        match self {
            Stmt::VarDecl(_) => "VarDecl",
            Stmt::Expr(expr) => expr.node_name(),
            Stmt::If(_) => "IfOp",
            Stmt::While(_) => "WhileLoop",
            Stmt::For(_) => "ForLoop",
            Stmt::Switch(_) => "SwitchStmt",
            Stmt::Jump(_) => "JumpStmt",
            Stmt::Labeled(_) => "LabeledStmt",
        }
    }
}

impl From<Expr> for Stmt {
    fn from(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }
}

impl From<VarDecl> for Stmt {
    fn from(decl: VarDecl) -> Self {
        Stmt::VarDecl(decl)
    }
}

impl From<JumpStmt> for Stmt {
    fn from(jump: JumpStmt) -> Self {
        Stmt::Jump(jump)
    }
}
