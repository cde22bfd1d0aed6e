//! Standard library natives.
//!
//! Each package contributes two things: type signatures for the builtin
//! registry and bindings for the global frame of a context. Keeping both in
//! the package keeps the two tables in sync.
//!
//! Natives whose results change from run to run (random numbers, clocks,
//! prompts) are not provided, so a trace depends only on its program.

use crate::ast::TermBuilder;
use crate::builtins::BuiltinRegistry;
use crate::context::Context;

pub mod math;
pub mod misc;

/// Register the signatures of every standard native.
pub fn register_signatures(registry: &mut BuiltinRegistry) {
    math::register_signatures(registry);
    misc::register_signatures(registry);
}

/// Bind every standard native and constant in `context`.
pub fn install<'a>(builder: TermBuilder<'a>, context: &mut Context<'a>) {
    math::install(builder, context);
    misc::install(builder, context);
}

#[cfg(test)]
#[path = "stdlib_test.rs"]
mod stdlib_test;
