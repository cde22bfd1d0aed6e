//! Display, conversion and kind predicates.

use crate::ast::{Literal, Term, TermBuilder};
use crate::builtins::{BuiltinRegistry, Overload, Signature, Type};
use crate::context::{Context, NativeCall, NativeFn, NativeResult};

/// Appends the rendered value to the output log and evaluates to it.
fn display<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
    let value = call.value(0)?;
    call.output.push(value.to_string());
    Ok(value)
}

fn stringify<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
    let value = call.value(0)?;
    Ok(call.builder.string(&value.to_string(), call.span))
}

fn parse_int<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
    let text = call.string(0)?;
    let radix = call.number(1)?;
    Ok(call.builder.number(parse_integer(text, radix), call.span))
}

/// Integer prefix of `text` in base `radix`, NaN when there is none.
fn parse_integer(text: &str, radix: f64) -> f64 {
    if !(2.0..=36.0).contains(&radix) || radix.fract() != 0.0 {
        return f64::NAN;
    }
    let radix = radix as u32;
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: Option<f64> = None;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(digit) => value = Some(value.unwrap_or(0.0) * radix as f64 + digit as f64),
            None => break,
        }
    }
    match value {
        Some(value) if negative => -value,
        Some(value) => value,
        None => f64::NAN,
    }
}

fn kind_is<'a>(call: &NativeCall<'_, 'a>, kind: Type) -> NativeResult<'a> {
    let value = call.value(0)?;
    Ok(call.builder.boolean(Type::of(value) == kind, call.span))
}

fn is_number<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
    kind_is(&call, Type::Number)
}

fn is_string<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
    kind_is(&call, Type::String)
}

fn is_boolean<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
    kind_is(&call, Type::Boolean)
}

fn is_function<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
    kind_is(&call, Type::Function)
}

fn is_undefined<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
    kind_is(&call, Type::Undefined)
}

const PREDICATES: &[(&str, NativeFn)] = &[
    ("is_number", is_number),
    ("is_string", is_string),
    ("is_boolean", is_boolean),
    ("is_function", is_function),
    ("is_undefined", is_undefined),
];

pub fn register_signatures(registry: &mut BuiltinRegistry) {
    registry.register(
        "display",
        Signature::polymorphic(vec![Overload::new(&[Type::Any], Type::Any)]),
    );
    registry.register(
        "stringify",
        Signature::polymorphic(vec![Overload::new(&[Type::Any], Type::String)]),
    );
    registry.register(
        "parse_int",
        Signature::new(vec![Overload::new(
            &[Type::String, Type::Number],
            Type::Number,
        )]),
    );
    for &(name, _) in PREDICATES {
        registry.register(
            name,
            Signature::polymorphic(vec![Overload::new(&[Type::Any], Type::Boolean)]),
        );
    }
}

pub fn install<'a>(builder: TermBuilder<'a>, context: &mut Context<'a>) {
    context.define_native("display", display);
    context.define_native("stringify", stringify);
    context.define_native("parse_int", parse_int);
    for &(name, native) in PREDICATES {
        context.define_native(name, native);
    }

    let constants: [(&str, &'a Term<'a>); 3] = [
        ("Infinity", builder.number(f64::INFINITY, None)),
        ("NaN", builder.number(f64::NAN, None)),
        ("undefined", builder.literal(Literal::Undefined, None)),
    ];
    for (name, value) in constants {
        context.define_value(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::parse_integer;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42", 10.0), 42.0);
        assert_eq!(parse_integer("  -17px", 10.0), -17.0);
        assert_eq!(parse_integer("ff", 16.0), 255.0);
        assert_eq!(parse_integer("101", 2.0), 5.0);
        assert!(parse_integer("px", 10.0).is_nan());
        assert!(parse_integer("10", 1.0).is_nan());
        assert!(parse_integer("10", 2.5).is_nan());
    }
}
