//! Semantic visitor
//!
//! [`Analyzer`] walks a parsed [`Program`] once, maintaining a [`ScopeChain`]:
//! the global scope for the whole program and one child scope per function
//! body. It resolves every declaration and use against the chain and checks
//! call arity. Every scope it opens is closed again on both the success and
//! the error path.

use crate::parser::ast::*;
use crate::semantic::errors::{SemanticError, SemanticErrorKind};
use crate::semantic::symbols::{
    FunctionSymbol, ScopeChain, ScopeId, Symbol, TypeSymbol, VarSymbol,
};
use tracing::{debug, trace};

/// Declaration/use checker over a parsed program
#[derive(Debug, Default)]
pub struct Analyzer {
    scopes: ScopeChain,
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer {
            scopes: ScopeChain::new(),
        }
    }

    /// Currently open scopes; empty between runs.
    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    /// Check a whole program, stopping at the first error.
    pub fn analyze(&mut self, program: &Program) -> Result<(), SemanticError> {
        self.scopes.push_global();
        self.log_enter();

        let result = program
            .declarations
            .iter()
            .try_for_each(|decl| self.visit_declaration(decl));

        self.leave_scope();
        result
    }

    fn visit_declaration(&mut self, decl: &Declaration) -> Result<(), SemanticError> {
        match decl {
            Declaration::Var(var) => self.visit_var_decl(var),
            Declaration::Func(func) => self.visit_func_decl(func),
        }
    }

    /// Declare a variable in the current scope.
    pub fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<(), SemanticError> {
        if self.scopes.lookup_local(&decl.name).is_some() {
            return Err(self.error(
                SemanticErrorKind::AlreadyDeclared {
                    name: decl.name.clone(),
                },
                "VarDecl",
                decl.line,
            ));
        }

        let ty = self.resolve_type(&decl.type_name, "VarDecl", decl.line)?;
        self.declare(Symbol::Var(VarSymbol {
            name: decl.name.clone(),
            ty,
        }));
        Ok(())
    }

    /// Declare a function in the current scope and check its body in a new
    /// child scope.
    pub fn visit_func_decl(&mut self, func: &FuncDecl) -> Result<(), SemanticError> {
        let ty = self.resolve_type(&func.return_type, "FuncDecl", func.line)?;
        self.declare(Symbol::Function(FunctionSymbol {
            name: func.name.clone(),
            ty,
            params: Vec::new(),
        }));

        let parent = self.scopes.current_id();
        self.scopes.push(func.name.as_str());
        self.log_enter();

        let result = self.visit_function_scope(func, parent);

        self.leave_scope();
        result
    }

    fn visit_function_scope(
        &mut self,
        func: &FuncDecl,
        parent: Option<ScopeId>,
    ) -> Result<(), SemanticError> {
        let mut params = Vec::new();

        let takes_void = func.params.first().is_some_and(ParamDecl::is_void_marker);
        if !takes_void {
            for param in &func.params {
                let ty = self.resolve_type(&param.type_name, "ParamDecl", param.line)?;
                match &param.name {
                    Some(name) => {
                        self.visit_var_decl(&VarDecl::new(param.line, &param.type_name, name))?;
                        params.push(VarSymbol {
                            name: name.clone(),
                            ty,
                        });
                    }
                    // Unnamed parameters count toward arity but bind nothing
                    None => params.push(VarSymbol {
                        name: String::new(),
                        ty,
                    }),
                }
            }
        }

        // Attach before the body so recursive calls see the full signature
        if let Some(Symbol::Function(symbol)) = parent
            .and_then(|id| self.scopes.scope_mut(id))
            .and_then(|scope| scope.get_mut(&func.name))
        {
            symbol.params = params;
        }

        func.body.iter().try_for_each(|stmt| self.visit_stmt(stmt))
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), SemanticError> {
        match stmt {
            Stmt::VarDecl(decl) => self.visit_var_decl(decl),
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::If(node) => {
                self.visit_expr(&node.condition)?;
                // The else branch is not checked
                self.visit_body(&node.body)
            }
            Stmt::While(node) => {
                self.visit_expr(&node.condition)?;
                self.visit_body(&node.body)
            }
            Stmt::For(node) => {
                let header = &node.header;
                let parts = [&header.init, &header.condition, &header.step];
                for expr in parts.into_iter().flatten() {
                    self.visit_expr(expr)?;
                }
                self.visit_body(&node.body)
            }
            Stmt::Switch(node) => {
                self.visit_expr(&node.condition)?;
                self.visit_body(&node.body)
            }
            Stmt::Jump(node) => match node.expr() {
                Some(expr) => self.visit_expr(expr),
                None => Ok(()),
            },
            Stmt::Labeled(node) => {
                if let Label::Case(expr) = &node.label {
                    self.visit_expr(expr)?;
                }
                self.visit_body(&node.body)
            }
        }
    }

    fn visit_body(&mut self, body: &[Stmt]) -> Result<(), SemanticError> {
        body.iter().try_for_each(|stmt| self.visit_stmt(stmt))
    }

    pub fn visit_expr(&mut self, expr: &Expr) -> Result<(), SemanticError> {
        match expr {
            Expr::Num(_) => Ok(()),
            Expr::Var(var) => self.visit_var(var),
            Expr::BinOp(node) => {
                self.visit_expr(&node.left)?;
                self.visit_expr(&node.right)
            }
            Expr::RelOp(node) => {
                self.visit_expr(&node.left)?;
                self.visit_expr(&node.right)
            }
            Expr::Assignment(node) => {
                self.visit_var(&node.target)?;
                self.visit_expr(&node.value)
            }
            Expr::Call(call) => self.visit_call(call),
        }
    }

    fn visit_var(&mut self, var: &Var) -> Result<(), SemanticError> {
        if self.scopes.lookup(&var.name, true).is_none() {
            return Err(self.error(
                SemanticErrorKind::UndeclaredVariable {
                    name: var.name.clone(),
                },
                "Var",
                var.line,
            ));
        }
        Ok(())
    }

    fn visit_call(&mut self, call: &CallFuncOp) -> Result<(), SemanticError> {
        let expected = match self.scopes.lookup(&call.name, true) {
            Some(Symbol::Function(function)) => function.params.len(),
            _ => {
                return Err(self.error(
                    SemanticErrorKind::NotAFunction {
                        name: call.name.clone(),
                    },
                    "CallFuncOp",
                    call.line,
                ));
            }
        };

        let found = call.arg_count();
        if expected != found {
            return Err(self.error(
                SemanticErrorKind::ArityMismatch {
                    name: call.name.clone(),
                    expected,
                    found,
                },
                "CallFuncOp",
                call.line,
            ));
        }

        call.args
            .iter()
            .flatten()
            .try_for_each(|arg| self.visit_expr(arg))
    }

    // ===== Helper methods =====

    fn resolve_type(
        &self,
        name: &str,
        node: &'static str,
        line: usize,
    ) -> Result<TypeSymbol, SemanticError> {
        match self.scopes.lookup(name, true) {
            Some(Symbol::Type(ty)) => Ok(ty.clone()),
            _ => Err(self.error(
                SemanticErrorKind::UnknownType {
                    name: name.to_string(),
                },
                node,
                line,
            )),
        }
    }

    fn declare(&mut self, symbol: Symbol) {
        trace!(scope = self.scope_name(), symbol = %symbol, "insert symbol");
        self.scopes.insert(symbol);
    }

    fn scope_name(&self) -> &str {
        self.scopes.current().map_or("", |s| s.name.as_str())
    }

    fn error(&self, kind: SemanticErrorKind, node: &'static str, line: usize) -> SemanticError {
        SemanticError {
            kind,
            node,
            line,
            scope: self.scope_name().to_string(),
        }
    }

    fn log_enter(&self) {
        if let Some(scope) = self.scopes.current() {
            debug!(scope = %scope.name, level = scope.level, "ENTER scope");
        }
    }

    fn leave_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            debug!(
                scope = %scope.name,
                level = scope.level,
                symbols = scope.len(),
                "LEAVING scope\n{}",
                scope
            );
        }
    }
}

/// Check a program with a fresh [`Analyzer`].
pub fn analyze(program: &Program) -> Result<(), SemanticError> {
    Analyzer::new().analyze(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn check(source: &str) -> Result<(), SemanticError> {
        let program = Parser::from_text(source).unwrap().parse_program().unwrap();
        analyze(&program)
    }

    #[test_log::test]
    fn test_valid_program() {
        let source = r#"
            int x;
            int add(int a, int b) {
                return a + b;
            }
            int main(void) {
                x = add(1, 2);
                return x;
            }
        "#;
        assert_eq!(check(source), Ok(()));
    }

    #[test_log::test]
    fn test_shadowing_global() {
        assert_eq!(check("int x; int f(void){ int x; x = 1; }"), Ok(()));
    }

    #[test_log::test]
    fn test_redeclaration_in_same_scope() {
        let err = check("int x; int x;").unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::AlreadyDeclared {
                name: "x".to_string(),
            }
        );
        assert_eq!(err.node, "VarDecl");
        assert_eq!(err.scope, "<global>");
        assert_eq!(
            err.to_string(),
            "Symbol(identifier) 'x' is already declared, [1:<global>]"
        );
    }

    #[test_log::test]
    fn test_parameter_redeclared_in_body() {
        let err = check("int f(int a) { int a; }").unwrap_err();
        assert_eq!(err.symbol_name(), "a");
        assert_eq!(err.scope, "f");
    }

    #[test_log::test]
    fn test_undeclared_variable() {
        let err = check("int main(void) {\n  y = 1;\n}").unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::UndeclaredVariable {
                name: "y".to_string(),
            }
        );
        assert_eq!(err.node, "Var");
        assert_eq!(err.line, 2);
        assert_eq!(err.scope, "main");
    }

    #[test_log::test]
    fn test_zero_arity_call() {
        assert_eq!(check("int f(void){} int main(void){ f(); }"), Ok(()));

        let err = check("int f(void){} int main(void){ f(1); }").unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::ArityMismatch {
                name: "f".to_string(),
                expected: 0,
                found: 1,
            }
        );
    }

    #[test_log::test]
    fn test_unnamed_param_counts_toward_arity() {
        let source = "int f(int, int b){ return b; } int main(void){ f(1, 2); }";
        assert_eq!(check(source), Ok(()));

        let source = "int f(int, int b){ return b; } int main(void){ f(2); }";
        assert!(check(source).is_err());
    }

    #[test_log::test]
    fn test_recursive_call_sees_params() {
        assert_eq!(check("int f(int n){ return f(n - 1); }"), Ok(()));
    }

    #[test_log::test]
    fn test_call_to_variable() {
        let err = check("int g; int main(void){ g(); }").unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::NotAFunction {
                name: "g".to_string(),
            }
        );
        assert!(check("int main(void){ h(); }").is_err());
    }

    #[test_log::test]
    fn test_call_arguments_are_checked() {
        let err = check("int f(int a){} int main(void){ f(z); }").unwrap_err();
        assert_eq!(err.symbol_name(), "z");
    }

    #[test_log::test]
    fn test_else_branch_is_not_checked() {
        let source = "int main(void){ if (1) { return 0; } else { nope = 1; } }";
        assert_eq!(check(source), Ok(()));
        assert!(check("int main(void){ if (nope) { return 0; } }").is_err());
    }

    #[test_log::test]
    fn test_loops_switch_and_labels() {
        let source = r#"
            int main(void) {
                int i;
                for (i = 0; i < 3; i = i + 1) { }
                while (i > 0) i = i - 1;
                switch (i) { case 1: break; default: goto end; }
                end: return i;
            }
        "#;
        assert_eq!(check(source), Ok(()));

        assert!(check("int main(void){ for (; k < 1; ) { } }").is_err());

        let source = "int main(void){ switch (0) { case q: break; } }";
        assert!(check(source).is_err());
    }

    #[test_log::test]
    fn test_unknown_type_in_scope() {
        let mut analyzer = Analyzer::new();
        let decl = VarDecl::new(1, "float", "x");
        let err = analyzer.visit_var_decl(&decl).unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::UnknownType {
                name: "float".to_string(),
            }
        );
    }

    #[test_log::test]
    fn test_scopes_restored_after_error() {
        let program = Parser::from_text("int f(void){ missing = 1; }")
            .unwrap()
            .parse_program()
            .unwrap();

        let mut analyzer = Analyzer::new();
        assert!(analyzer.analyze(&program).is_err());
        assert!(analyzer.scopes().is_empty());

        // The same analyzer can be reused
        let program = Parser::from_text("int g(void){}")
            .unwrap()
            .parse_program()
            .unwrap();
        assert_eq!(analyzer.analyze(&program), Ok(()));
        assert!(analyzer.scopes().is_empty());
    }

    #[test_log::test]
    fn test_function_scope_closed_inside_global() {
        let mut analyzer = Analyzer::new();
        analyzer.scopes.push_global();

        let func = Parser::from_text("int f(int a){ b = a; }")
            .unwrap()
            .parse_func_decl()
            .unwrap();
        assert!(analyzer.visit_func_decl(&func).is_err());
        assert_eq!(analyzer.scopes().depth(), 1);
        assert!(matches!(
            analyzer.scopes().lookup_local("f"),
            Some(Symbol::Function(function)) if function.params.len() == 1
        ));
    }
}
