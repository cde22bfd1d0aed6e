use bumpalo::Bump;

use super::*;
use crate::ast::TermBuilder;

#[test]
fn test_unary_minus_is_an_overload_of_minus() {
    let registry = BuiltinRegistry::standard();
    let overload = registry.check("-", &[Type::Number]).unwrap().unwrap();
    assert_eq!(overload.result, Type::Number);
    assert!(registry.check("-", &[Type::Number, Type::Number]).is_ok());
}

#[test]
fn test_negating_a_boolean_names_the_first_argument() {
    let registry = BuiltinRegistry::standard();
    let mismatch = registry.check("-", &[Type::Boolean]).unwrap_err();
    assert_eq!(
        mismatch.into_error("-").to_string(),
        "The function expects argument #1 to be a number but got a boolean instead"
    );
}

#[test]
fn test_plus_lists_every_admissible_kind() {
    let registry = BuiltinRegistry::standard();
    let mismatch = registry
        .check("+", &[Type::Boolean, Type::Number])
        .unwrap_err();
    assert_eq!(
        mismatch,
        Mismatch::Argument {
            position: 1,
            expected: vec![Type::Number, Type::String],
            actual: Type::Boolean,
        }
    );
}

#[test]
fn test_overloads_narrow_left_to_right() {
    let registry = BuiltinRegistry::standard();
    let mismatch = registry
        .check("+", &[Type::Number, Type::String])
        .unwrap_err();
    assert_eq!(
        mismatch,
        Mismatch::Argument {
            position: 2,
            expected: vec![Type::Number],
            actual: Type::String,
        }
    );
    let overload = registry
        .check("<", &[Type::String, Type::String])
        .unwrap()
        .unwrap();
    assert_eq!(overload.result, Type::Boolean);
}

#[test]
fn test_strict_equality_accepts_booleans() {
    let registry = BuiltinRegistry::standard();
    assert!(registry.check("===", &[Type::Boolean, Type::Boolean]).is_ok());
    assert!(registry.check("!==", &[Type::Boolean, Type::Number]).is_err());
}

#[test]
fn test_any_is_a_wildcard() {
    let registry = BuiltinRegistry::standard();
    assert!(registry.check("&&", &[Type::Boolean, Type::Any]).is_ok());
    assert!(registry.check("&&", &[Type::Number, Type::Any]).is_err());
}

#[test]
fn test_arity_mismatch() {
    let registry = BuiltinRegistry::standard();
    let mismatch = registry.check("math_pow", &[Type::Number]).unwrap_err();
    assert_eq!(
        mismatch,
        Mismatch::Arity {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn test_unknown_names_are_unconstrained() {
    let registry = BuiltinRegistry::new();
    assert_eq!(registry.check("anything", &[Type::Number]), Ok(None));
}

#[test]
fn test_kind_of_terms() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    assert_eq!(Type::of(b.string("s", None)), Type::String);
    assert_eq!(Type::of(b.undefined(None)), Type::Undefined);
    let closure = b.arrow_function(&["x"], b.identifier("x", None), None);
    assert_eq!(Type::of(closure), Type::Function);
    let sum = b.binary(
        crate::ast::BinaryOp::Add,
        b.number(1.0, None),
        b.number(2.0, None),
        None,
    );
    assert_eq!(Type::of(sum), Type::Any);
}
