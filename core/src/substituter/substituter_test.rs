use bumpalo::Bump;
use pretty_assertions::assert_eq;

use super::substitute;
use crate::ast::{BinaryOp, Term, TermBuilder, TermKind};
use crate::errors::StepErrorKind;
use crate::parser::parse;

fn program<'a>(b: TermBuilder<'a>, source: &str) -> &'a Term<'a> {
    parse(b, source).unwrap_or_else(|e| panic!("Parsing failed: {}\n{}", source, e))
}

/// The expression of the first statement of a parsed program.
fn expression<'a>(b: TermBuilder<'a>, source: &str) -> &'a Term<'a> {
    match program(b, source).statements().unwrap()[0].kind {
        TermKind::ExpressionStatement(expr) => expr,
        ref other => panic!("expected an expression statement, got {:?}", other),
    }
}

fn substituted(source: &str, name: &str, replacement: &str) -> String {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let target = program(b, source);
    let replacement = expression(b, replacement);
    substitute(b, name, replacement, target)
        .unwrap()
        .to_string()
}

#[test]
fn test_literal_replaces_free_occurrences() {
    assert_eq!(substituted("x + y * x;", "x", "2;"), "2 + y * 2;");
}

#[test]
fn test_literal_gets_the_span_of_the_identifier() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let target = expression(b, "y + x;");
    let result = substitute(b, "x", b.number(1.0, None), target).unwrap();
    let TermKind::Binary { right, .. } = &result.kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(right.span.unwrap().start.column, 5);
}

#[test]
fn test_parameter_shadows_substitution() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let target = expression(b, "(x) => x;");
    let result = substitute(b, "x", b.number(1.0, None), target).unwrap();
    let original = target.as_closure().unwrap();
    let copy = result.as_closure().unwrap();
    assert!(core::ptr::eq(original.body(), copy.body()));
    assert_eq!(result.to_string(), "x => x");
}

#[test]
fn test_function_declaration_parameters_shadow() {
    assert_eq!(
        substituted("function f(x) { return x; } x;", "x", "1;"),
        "function f(x) { return x; }\n1;"
    );
}

#[test]
fn test_literal_is_not_substituted_into_callee() {
    assert_eq!(substituted("f(f);", "f", "1;"), "f(1);");
}

#[test]
fn test_closure_is_substituted_into_callee() {
    assert_eq!(substituted("f(2);", "f", "x => x + 1;"), "(x => x + 1)(2);");
}

#[test]
fn test_self_substitution_ties_the_knot() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let closure = expression(b, "(function f(n) { return f(n); });");
    let result = substitute(b, "f", closure, closure).unwrap();

    let body = result.as_closure().unwrap().body();
    let TermKind::Block(statements) = body.kind else {
        panic!("expected a block body");
    };
    let TermKind::Return(call) = statements[0].kind else {
        panic!("expected a return statement");
    };
    let TermKind::Call { callee, .. } = call.kind else {
        panic!("expected a call");
    };
    assert!(core::ptr::eq(callee, result));
    assert_eq!(result.to_string(), "function f(n) { return f(n); }");
}

#[test]
fn test_shared_subterms_stay_shared() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let mut term = b.identifier("x", None);
    for _ in 0..40 {
        term = b.binary(BinaryOp::Add, term, term, None);
    }
    // Without the memo this would visit 2^40 nodes.
    let result = substitute(b, "x", b.number(1.0, None), term).unwrap();
    let TermKind::Binary { left, right, .. } = result.kind else {
        panic!("expected a binary expression");
    };
    assert!(core::ptr::eq(left, right));
}

#[test]
fn test_declarations_shadow_later_statements() {
    assert_eq!(
        substituted("f(x); const x = x; x;", "x", "1;"),
        "f(1);\nconst x = x;\nx;"
    );
    assert_eq!(
        substituted("const y = x; x;", "x", "1;"),
        "const y = 1;\n1;"
    );
}

#[test]
fn test_function_declaration_of_the_name_shadows_the_whole_list() {
    assert_eq!(
        substituted("f(1); function f() { return 2; }", "f", "x => x;"),
        "f(1);\nfunction f() { return 2; }"
    );
}

#[test]
fn test_undefined_cannot_be_substituted() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let target = program(b, "x;");
    let err = substitute(b, "x", b.undefined(None), target).unwrap_err();
    assert_eq!(
        err.kind,
        StepErrorKind::type_mismatch(
            "string, boolean or number",
            "undefined",
            None,
            "substitution"
        )
    );
}
