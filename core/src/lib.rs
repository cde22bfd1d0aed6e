//! Substitution-model stepper for a restricted JavaScript subset.
//!
//! A program is parsed into arena-allocated [`ast::Term`]s and then reduced
//! one rule at a time. Every intermediate program is kept, so evaluation can
//! be shown as a sequence of rewrites instead of through an implicit call
//! stack.

pub mod ast;
pub mod builtins;
pub mod context;
pub mod diagnostics;
pub mod errors;
pub mod parser;
pub mod reducer;
pub mod stdlib;
pub mod stepper;
pub mod substituter;

pub use ast::{Term, TermBuilder, TermKind};
pub use builtins::BuiltinRegistry;
pub use context::Context;
pub use errors::{StepError, StepErrorKind};
pub use stepper::{StepperOptions, get_evaluation_steps, get_evaluation_steps_with_options};
