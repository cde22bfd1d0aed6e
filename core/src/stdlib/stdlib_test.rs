use bumpalo::Bump;

use crate::ast::{Literal, Term, TermBuilder};
use crate::builtins::BuiltinRegistry;
use crate::context::{Context, Global, NativeCall};
use crate::errors::StepErrorKind;

fn call_native<'a>(
    context: &mut Context<'a>,
    builder: TermBuilder<'a>,
    name: &str,
    args: &[&'a Term<'a>],
) -> Result<&'a Term<'a>, StepErrorKind> {
    let Some(Global::Native(native)) = context.lookup(name) else {
        panic!("{} is not a native", name);
    };
    native(NativeCall {
        name,
        builder,
        args,
        span: None,
        output: &mut context.output,
    })
}

#[test]
fn test_every_native_has_a_signature() {
    let arena = Bump::new();
    let context = Context::standard(TermBuilder::new(&arena));
    let registry = BuiltinRegistry::standard();
    for name in context.names() {
        if let Some(Global::Native(_)) = context.lookup(name) {
            assert!(registry.contains(name), "{} has no signature", name);
        }
    }
}

#[test]
fn test_display_logs_and_returns_its_argument() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let mut context = Context::standard(b);
    let value = b.string("hi", None);
    let result = call_native(&mut context, b, "display", &[value]).unwrap();
    assert!(core::ptr::eq(result, value));
    assert_eq!(context.output, vec!["\"hi\"".to_string()]);
}

#[test]
fn test_math_functions() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let mut context = Context::standard(b);

    let result = call_native(&mut context, b, "math_sqrt", &[b.number(16.0, None)]).unwrap();
    assert_eq!(result.as_literal(), Some(Literal::Number(4.0)));

    let result = call_native(
        &mut context,
        b,
        "math_pow",
        &[b.number(2.0, None), b.number(10.0, None)],
    )
    .unwrap();
    assert_eq!(result.as_literal(), Some(Literal::Number(1024.0)));

    let result = call_native(&mut context, b, "math_round", &[b.number(-2.5, None)]).unwrap();
    assert_eq!(result.as_literal(), Some(Literal::Number(-2.0)));

    let result = call_native(&mut context, b, "math_clz32", &[b.number(1.0, None)]).unwrap();
    assert_eq!(result.as_literal(), Some(Literal::Number(31.0)));
}

#[test]
fn test_predicates() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let mut context = Context::standard(b);
    let closure = b.arrow_function(&[], b.number(1.0, None), None);

    let result = call_native(&mut context, b, "is_function", &[closure]).unwrap();
    assert_eq!(result.as_literal(), Some(Literal::Boolean(true)));
    let result = call_native(&mut context, b, "is_number", &[b.string("1", None)]).unwrap();
    assert_eq!(result.as_literal(), Some(Literal::Boolean(false)));
}

#[test]
fn test_stringify_and_parse_int() {
    let arena = Bump::new();
    let b = TermBuilder::new(&arena);
    let mut context = Context::standard(b);

    let result = call_native(&mut context, b, "stringify", &[b.number(1.5, None)]).unwrap();
    assert_eq!(result.as_literal(), Some(Literal::Str("1.5")));

    let result = call_native(
        &mut context,
        b,
        "parse_int",
        &[b.string("7f", None), b.number(16.0, None)],
    )
    .unwrap();
    assert_eq!(result.as_literal(), Some(Literal::Number(127.0)));
}

#[test]
fn test_constants_are_values() {
    let arena = Bump::new();
    let context = Context::standard(TermBuilder::new(&arena));
    let Some(Global::Value(pi)) = context.lookup("math_PI") else {
        panic!("math_PI is not a value");
    };
    assert_eq!(
        pi.as_literal(),
        Some(Literal::Number(core::f64::consts::PI))
    );
    let Some(Global::Value(undefined)) = context.lookup("undefined") else {
        panic!("undefined is not a value");
    };
    assert_eq!(undefined.as_literal(), Some(Literal::Undefined));
}
