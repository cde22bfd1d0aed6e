//! Math Package
//!
//! Constants: math_PI, math_E, math_LN2, math_LN10, math_LOG2E, math_LOG10E,
//!            math_SQRT1_2, math_SQRT2
//! Functions: one-number functions such as math_abs and math_sqrt, and
//!            math_atan2, math_pow, math_max, math_min, math_hypot

use core::f64::consts;

use crate::ast::TermBuilder;
use crate::builtins::{BuiltinRegistry, Overload, Signature, Type};
use crate::context::{Context, NativeCall, NativeFn, NativeResult};

macro_rules! unary_math {
    ($($name:ident => $f:expr),* $(,)?) => {
        $(
            fn $name<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
                let x = call.number(0)?;
                let f: fn(f64) -> f64 = $f;
                Ok(call.builder.number(f(x), call.span))
            }
        )*

        const UNARY: &[(&str, NativeFn)] = &[$((stringify!($name), $name)),*];
    };
}

macro_rules! binary_math {
    ($($name:ident => $f:expr),* $(,)?) => {
        $(
            fn $name<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
                let x = call.number(0)?;
                let y = call.number(1)?;
                let f: fn(f64, f64) -> f64 = $f;
                Ok(call.builder.number(f(x, y), call.span))
            }
        )*

        const BINARY: &[(&str, NativeFn)] = &[$((stringify!($name), $name)),*];
    };
}

unary_math! {
    math_abs => f64::abs,
    math_acos => f64::acos,
    math_acosh => f64::acosh,
    math_asin => f64::asin,
    math_asinh => f64::asinh,
    math_atan => f64::atan,
    math_atanh => f64::atanh,
    math_cbrt => f64::cbrt,
    math_ceil => f64::ceil,
    math_clz32 => clz32,
    math_cos => f64::cos,
    math_cosh => f64::cosh,
    math_exp => f64::exp,
    math_expm1 => f64::exp_m1,
    math_floor => f64::floor,
    math_fround => |x| x as f32 as f64,
    math_log => f64::ln,
    math_log1p => f64::ln_1p,
    math_log2 => f64::log2,
    math_log10 => f64::log10,
    math_round => round,
    math_sign => sign,
    math_sin => f64::sin,
    math_sinh => f64::sinh,
    math_sqrt => f64::sqrt,
    math_tan => f64::tan,
    math_tanh => f64::tanh,
    math_trunc => f64::trunc,
}

binary_math! {
    math_atan2 => f64::atan2,
    math_pow => f64::powf,
    math_max => |x, y| if x.is_nan() || y.is_nan() { f64::NAN } else { x.max(y) },
    math_min => |x, y| if x.is_nan() || y.is_nan() { f64::NAN } else { x.min(y) },
    math_hypot => f64::hypot,
}

const CONSTANTS: &[(&str, f64)] = &[
    ("math_PI", consts::PI),
    ("math_E", consts::E),
    ("math_LN2", consts::LN_2),
    ("math_LN10", consts::LN_10),
    ("math_LOG2E", consts::LOG2_E),
    ("math_LOG10E", consts::LOG10_E),
    ("math_SQRT1_2", consts::FRAC_1_SQRT_2),
    ("math_SQRT2", consts::SQRT_2),
];

/// Leading zero bits of the 32-bit unsigned integer conversion of `x`.
fn clz32(x: f64) -> f64 {
    let bits = if x.is_finite() {
        x.trunc().rem_euclid(4_294_967_296.0) as u32
    } else {
        0
    };
    bits.leading_zeros() as f64
}

/// Rounds half-way cases towards positive infinity.
fn round(x: f64) -> f64 {
    if !x.is_finite() || x.fract() == 0.0 {
        x
    } else {
        (x + 0.5).floor()
    }
}

fn sign(x: f64) -> f64 {
    if x.is_nan() || x == 0.0 { x } else { x.signum() }
}

pub fn register_signatures(registry: &mut BuiltinRegistry) {
    for &(name, _) in UNARY {
        registry.register(
            name,
            Signature::new(vec![Overload::new(&[Type::Number], Type::Number)]),
        );
    }
    for &(name, _) in BINARY {
        registry.register(
            name,
            Signature::new(vec![Overload::new(
                &[Type::Number, Type::Number],
                Type::Number,
            )]),
        );
    }
}

pub fn install<'a>(builder: TermBuilder<'a>, context: &mut Context<'a>) {
    for &(name, native) in UNARY.iter().chain(BINARY) {
        context.define_native(name, native);
    }
    for &(name, value) in CONSTANTS {
        context.define_value(name, builder.number(value, None));
    }
}
