// Integration tests for the mini-C front end

use std::io::Write;

use minic::parser::ast::*;
use minic::parser::scanner::Scanner;
use minic::parser::token::TokenKind;
use minic::semantic::SemanticErrorKind;
use minic::{check_file, check_source, parse_source, FrontendError, ParseError, ScanError};

fn semantic_kind(source: &str) -> SemanticErrorKind {
    match check_source(source) {
        Err(FrontendError::Semantic(err)) => err.kind,
        other => panic!("Expected semantic error, got {:?}", other),
    }
}

fn temp_source(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write source");
    file
}

#[test]
fn test_end_to_end_success() {
    let source = "int x; int main(void){ int y; y = 10 * x; return y; }";
    let program = check_source(source).expect("Checking failed");

    let product = Expr::bin(1, ArithOp::Mul, Expr::num(1, 10), Expr::var(1, "x"));
    let expected = Program {
        declarations: vec![
            Declaration::Var(VarDecl::new(1, "int", "x")),
            Declaration::Func(FuncDecl {
                return_type: "int".to_string(),
                name: "main".to_string(),
                params: vec![ParamDecl::new(1, "void", None)],
                body: vec![
                    Stmt::VarDecl(VarDecl::new(1, "int", "y")),
                    Stmt::Expr(Expr::assign(1, Var::new(1, "y"), product)),
                    Stmt::Jump(JumpStmt {
                        keyword: JumpKeyword::Return,
                        value: Some(JumpValue::Expr(Expr::var(1, "y"))),
                        line: 1,
                    }),
                ],
                line: 1,
            }),
        ],
        line: 1,
    };
    assert_eq!(program, expected);
}

#[test]
fn test_declaration_lines() {
    let source = r#"
        int x;
        int main(void) {
            int y;
            y = 10 * x;
            return y;
        }
    "#;

    let program = check_source(source).expect("Checking failed");
    assert_eq!(program.declarations.len(), 2);
    assert_eq!(program.declarations[0].line(), 2);
    assert_eq!(program.declarations[1].name(), "main");
    assert_eq!(program.declarations[1].line(), 3);
}

#[test]
fn test_end_to_end_undeclared() {
    let source = r#"
        int x;
        int main(void) {
            y = x + 1;
            return y;
        }
    "#;

    match check_source(source) {
        Err(FrontendError::Semantic(err)) => {
            assert_eq!(err.symbol_name(), "y");
            assert_eq!(err.line, 4);
            assert_eq!(err.scope, "main");
            assert_eq!(
                err.to_string(),
                "Variable 'y' has not been declared, [4:main]"
            );
        }
        other => panic!("Expected semantic error, got {:?}", other),
    }
}

#[test]
fn test_shadowing_global_is_allowed() {
    let source = "int x; int f(void){ int x; return x; }";
    assert!(check_source(source).is_ok());
}

#[test]
fn test_redeclaration_names_symbol() {
    assert_eq!(
        semantic_kind("int f(void){ int x; int x; }"),
        SemanticErrorKind::AlreadyDeclared {
            name: "x".to_string(),
        }
    );
}

#[test]
fn test_arity() {
    let source = "int f(void){} int main(void){ f(); }";
    assert!(check_source(source).is_ok());

    let source = "int f(int a, int b){} int main(void){ return f(1, f(2, 3)); }";
    assert!(check_source(source).is_ok());

    assert_eq!(
        semantic_kind("int f(void){} int main(void){ f(1); }"),
        SemanticErrorKind::ArityMismatch {
            name: "f".to_string(),
            expected: 0,
            found: 1,
        }
    );
}

#[test]
fn test_functions_must_be_declared_before_use() {
    assert_eq!(
        semantic_kind("int main(void){ return later(); } int later(void){}"),
        SemanticErrorKind::NotAFunction {
            name: "later".to_string(),
        }
    );
}

#[test]
fn test_syntax_error_surfaces() {
    let err = check_source("int main(void) {\n  return 1\n}\n").unwrap_err();
    match err {
        FrontendError::Parse(ParseError::Syntax(err)) => {
            let expected = "Expecting separator ';', instead of separator '}'";
            assert_eq!(err.line, 3);
            assert!(err.to_string().starts_with(expected));
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_scan_error_surfaces() {
    let err = parse_source("int main(void) { return 1 $ 2; }").unwrap_err();
    let expected = ScanError::UnexpectedCharacter { ch: '$', line: 1 };
    assert_eq!(err, ParseError::Scan(expected));
}

#[test]
fn test_token_stream() {
    let tokens: Vec<_> = Scanner::from_text("x=-1;")
        .collect::<Result<Vec<_>, _>>()
        .expect("Scanning failed")
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect();

    assert_eq!(
        tokens,
        vec![
            (TokenKind::Identifier, "x".to_string()),
            (TokenKind::Assignment, "=".to_string()),
            (TokenKind::ArithmeticOp, "-".to_string()),
            (TokenKind::Constant, "1".to_string()),
            (TokenKind::Separator, ";".to_string()),
        ]
    );
}

#[test]
fn test_check_file() {
    let file = temp_source(
        "int total;
int add(int a, int b) { return a + b; }
int main(void) { total = add(1, 2); return total; }
",
    );

    let program = check_file(file.path()).expect("Checking failed");
    assert_eq!(program.declarations.len(), 3);
}

#[test]
fn test_check_file_reports_error_line() {
    let file = temp_source("int main(void) {\n  return missing;\n}\n");

    match check_file(file.path()) {
        Err(FrontendError::Semantic(err)) => assert_eq!(err.line, 2),
        other => panic!("Expected semantic error, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.c");

    match check_file(&path) {
        Err(err @ FrontendError::Io { .. }) => assert!(err.to_string().contains("absent.c")),
        other => panic!("Expected I/O error, got {:?}", other),
    }
}
