use bumpalo::Bump;

use super::parser::parse;
use crate::ast::TermBuilder;

// We test precedence by comparing whether two programs parenthesized in
// different ways print the same way. The printer only emits parentheses that
// are required, so equal output means equal trees.
fn ast(arena: &Bump, source: &str) -> String {
    let parsed = parse(TermBuilder::new(arena), source)
        .unwrap_or_else(|e| panic!("Parsing failed: {}\n{}", source, e));
    parsed.to_string()
}

#[test]
fn test_addition_vs_subtraction() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a + b - c;"), ast(&arena, "(a + b) - c;"));
    assert_eq!(ast(&arena, "a - b + c;"), ast(&arena, "(a - b) + c;"));
    assert_eq!(
        ast(&arena, "a + b - c + d - e + f;"),
        ast(&arena, "((((a + b) - c) + d) - e) + f;")
    );
}

#[test]
fn test_multiplicative_operators() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a * b / c % d;"), ast(&arena, "((a * b) / c) % d;"));
    assert_eq!(ast(&arena, "a + b * c;"), ast(&arena, "a + (b * c);"));
    assert_eq!(ast(&arena, "a * b + c;"), ast(&arena, "(a * b) + c;"));
}

#[test]
fn test_non_associative_parens_survive() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a - (b - c);"), "a - (b - c);");
    assert_eq!(ast(&arena, "(a + b) * c;"), "(a + b) * c;");
}

#[test]
fn test_and_vs_or() {
    let arena = Bump::new();
    assert_eq!(
        ast(&arena, "true && false || true;"),
        ast(&arena, "(true && false) || true;")
    );
    assert_eq!(
        ast(&arena, "true || false && true;"),
        ast(&arena, "true || (false && true);")
    );
}

#[test]
fn test_comparison_vs_logical() {
    let arena = Bump::new();
    assert_eq!(
        ast(&arena, "a < b && c === d;"),
        ast(&arena, "(a < b) && (c === d);")
    );
    assert_eq!(
        ast(&arena, "a + 1 >= b !== c;"),
        ast(&arena, "((a + 1) >= b) !== c;")
    );
}

#[test]
fn test_unary_vs_binary() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "-a * b;"), ast(&arena, "(-a) * b;"));
    assert_eq!(ast(&arena, "!a && b;"), ast(&arena, "(!a) && b;"));
    assert_eq!(ast(&arena, "-(a * b);"), "-(a * b);");
    assert_eq!(ast(&arena, "a - -b;"), "a - -b;");
}

#[test]
fn test_call_binds_tighter_than_unary() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "-f(x);"), ast(&arena, "-(f(x));"));
    assert_eq!(ast(&arena, "f(x)(y);"), ast(&arena, "(f(x))(y);"));
}

#[test]
fn test_conditional_is_right_associative() {
    let arena = Bump::new();
    assert_eq!(
        ast(&arena, "a ? b : c ? d : e;"),
        ast(&arena, "a ? b : (c ? d : e);")
    );
    assert_eq!(
        ast(&arena, "a || b ? c : d;"),
        ast(&arena, "(a || b) ? c : d;")
    );
}

#[test]
fn test_arrow_body_extends_right() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "x => x + 1;"), "x => x + 1;");
    assert_eq!(ast(&arena, "(x => x)(1);"), "(x => x)(1);");
    assert_eq!(
        ast(&arena, "f(x => y => x + y, 1);"),
        "f(x => y => x + y, 1);"
    );
}
