use pretty_assertions::assert_eq;

use pytoasm::ast::NodeKind;
use pytoasm::compile_text;
use pytoasm::diagnostic::{Category, CompileError};
use pytoasm::lexer::{TokenKind, Tokens, lex, tokenize};
use pytoasm::limits::CompilerLimits;
use pytoasm::Compilation;

fn compile(text: &str) -> Result<Compilation, CompileError> {
    compile_text(text, "test.py", &CompilerLimits::default())
}

fn failure(text: &str) -> (Category, String, usize, usize) {
    let error = compile(text).unwrap_err();
    let diagnostic = error.primary().unwrap();
    (
        diagnostic.category,
        diagnostic.message.clone(),
        diagnostic.line,
        diagnostic.column,
    )
}

fn kinds_and_texts(tokens: &Tokens) -> Vec<(TokenKind, String)> {
    tokens.iter().map(|t| (t.kind, t.text.clone())).collect()
}

const SAMPLES: &[&str] = &[
    "x = 5",
    "s = 'it\\'s'\nt = \"tab\\there\"",
    "def add(a: i32, b: u16) -> i64:\n    total = 0x1f\nend",
    "a, b = True # trailing comment\nc = False",
    "'''\nblock comment\n'''\nz = \"\"",
    "x += 1\ny == z\n{ }",
];

// Scenario tests

#[test]
fn test_single_declaration() {
    let unit = compile("x = 5").unwrap();

    assert_eq!(
        kinds_and_texts(&unit.tokens),
        vec![
            (TokenKind::Identifier, "x".to_string()),
            (TokenKind::Equals, "=".to_string()),
            (TokenKind::Numeric, "5".to_string()),
        ]
    );

    let expected = "\
Unknown
  VarDeclStatement 'x'
    EqualsExpression
      NumberLiteral '5'
";
    assert_eq!(unit.ast.outline(), expected);
}

#[test]
fn test_second_assignment_reassigns() {
    let unit = compile("x = 5\nx = 6").unwrap();
    let root = unit.ast.root();
    let kinds: Vec<NodeKind> = unit
        .ast
        .children(root)
        .iter()
        .map(|&id| unit.ast.kind(id))
        .collect();
    assert_eq!(
        kinds,
        vec![NodeKind::VarDeclStatement, NodeKind::VarReassignStatement]
    );
}

#[test]
fn test_function_definition() {
    let unit = compile("def foo(a: i32) -> i32:").unwrap();
    let ast = &unit.ast;

    let def = ast.find_path(&[0]).unwrap();
    assert_eq!(ast.kind(def), NodeKind::FunctionDefStatement);
    assert_eq!(ast.text(def), "foo");

    let argument = ast.find_path(&[0, 0, 0]).unwrap();
    assert_eq!(ast.kind(argument), NodeKind::ExplicitArgumentExpression);
    assert_eq!(ast.text(argument), "a");

    let argument_type = ast.find_path(&[0, 0, 0, 0]).unwrap();
    assert_eq!(ast.kind(argument_type), NodeKind::TypeResolveExpression);
    assert_eq!(ast.text(argument_type), "i32");

    let return_type = ast.find_path(&[0, 1]).unwrap();
    assert_eq!(ast.kind(return_type), NodeKind::TypeResolveExpression);
    assert_eq!(ast.text(return_type), "i32");
    assert_eq!(ast.parent(return_type), Some(def));
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        failure("\"abc"),
        (Category::Syntax, "Unclosed string literal.".to_string(), 1, 1)
    );
}

#[test]
fn test_malformed_hex() {
    assert_eq!(
        failure("0x1G"),
        (Category::Syntax, "Malformed number.".to_string(), 1, 4)
    );
}

#[test]
fn test_dangling_equals() {
    assert_eq!(
        failure("x = "),
        (Category::Parse, "Incomplete expression.".to_string(), 1, 3)
    );
}

// Property tests

#[test]
fn test_quotes_come_in_pairs() {
    let limits = CompilerLimits::default();
    for sample in SAMPLES {
        let tokens = lex(sample, &limits).unwrap();
        let list: Vec<_> = tokens.iter().collect();

        let quotes = list.iter().filter(|t| t.kind == TokenKind::Quote).count();
        assert_eq!(quotes % 2, 0, "{sample}");

        for (i, token) in list.iter().enumerate() {
            if token.kind == TokenKind::String {
                let open = list[i - 1];
                let close = list[i + 1];
                assert_eq!(open.kind, TokenKind::Quote, "{sample}");
                assert_eq!(close.kind, TokenKind::Quote, "{sample}");
                assert_eq!(open.text, close.text, "{sample}");
            }
        }
    }
}

#[test]
fn test_balance_error_is_exact() {
    let limits = CompilerLimits::default();
    let cases = [
        ("(", false),
        ("()", true),
        ("(()", false),
        ("())", false),
        ("def f(a: i32) -> None:", true),
        ("x = 1", true),
    ];

    for (source, balanced) in cases {
        let result = lex(source, &limits);
        match result {
            Ok(_) => assert!(balanced, "{source}"),
            Err(diagnostic) => {
                assert!(!balanced, "{source}");
                assert_eq!(diagnostic.message, "Unclosed scope.");
            }
        }
    }
}

#[test]
fn test_round_trip_through_source() {
    let limits = CompilerLimits::default();
    for sample in SAMPLES {
        let tokens = tokenize(sample, &limits).unwrap();
        let respelled = tokens.to_source();
        let again = tokenize(&respelled, &limits).unwrap();
        assert_eq!(kinds_and_texts(&again), kinds_and_texts(&tokens), "{respelled}");
    }
}

#[test]
fn test_redeclaration_in_open_scope() {
    let (category, message, line, _) = failure("def f(a: i32, a: i32) -> None:");
    assert_eq!(category, Category::Parse);
    assert_eq!(message, "Variable defined twice.");
    assert_eq!(line, 1);

    // Once the clause closes the parameter name is free again
    assert!(compile("def f(a: i32) -> None:\nend\ndef g(a: i32) -> None:\nend").is_ok());
}

#[test]
fn test_warnings_do_not_fail() {
    let unit = compile("x = 1\nreturn\ny = 2").unwrap();
    assert_eq!(unit.warnings.len(), 1);
    assert_eq!(unit.warnings[0].line, 2);
    assert_eq!(unit.ast.children(unit.ast.root()).len(), 2);
}

#[test]
fn test_header_cannot_hold_statements() {
    for source in ["def f x = 1", "def f() x = 1"] {
        let (category, message, line, _) = failure(source);
        assert_eq!(category, Category::Parse, "{source}");
        assert_eq!(message, "Incomplete function definition.", "{source}");
        assert_eq!(line, 1, "{source}");
    }
}
