//! The evaluation driver.
//!
//! Repeatedly reduces a program, collecting every intermediate program into a
//! trace. This is the only place where step errors are caught: the first one
//! is appended to the context's error log and the trace collected so far is
//! returned.

mod treeify;

pub use treeify::treeify;

use tracing::debug;

use crate::ast::{Term, TermBuilder};
use crate::builtins::BuiltinRegistry;
use crate::context::Context;
use crate::errors::{StepError, StepErrorKind};
use crate::reducer::reduce;
use crate::substituter::substitute;

/// Configuration options for the evaluation driver.
///
/// # Example
///
/// ```
/// use stepper_core::stepper::StepperOptions;
///
/// let options = StepperOptions {
///     step_limit: Some(10_000),
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct StepperOptions {
    /// Maximum number of programs in the trace (if Some).
    ///
    /// Set to `None` to let non-terminating programs run forever.
    ///
    /// Default: None
    pub step_limit: Option<usize>,
}

/// The treeified trace of `program`, without a step limit.
///
/// The trace starts with `program` itself and ends with the last non-empty
/// program. Check `context.errors` to tell a finished run from an aborted one.
pub fn get_evaluation_steps<'a>(
    builder: TermBuilder<'a>,
    registry: &BuiltinRegistry,
    program: &'a Term<'a>,
    context: &mut Context<'a>,
) -> Vec<&'a Term<'a>> {
    get_evaluation_steps_with_options(
        builder,
        registry,
        program,
        context,
        &StepperOptions::default(),
    )
}

pub fn get_evaluation_steps_with_options<'a>(
    builder: TermBuilder<'a>,
    registry: &BuiltinRegistry,
    program: &'a Term<'a>,
    context: &mut Context<'a>,
    options: &StepperOptions,
) -> Vec<&'a Term<'a>> {
    raw_steps(builder, registry, program, context, options)
        .into_iter()
        .map(|step| treeify(builder, step))
        .collect()
}

/// The trace before closures are collapsed for display.
fn raw_steps<'a>(
    builder: TermBuilder<'a>,
    registry: &BuiltinRegistry,
    program: &'a Term<'a>,
    context: &mut Context<'a>,
    options: &StepperOptions,
) -> Vec<&'a Term<'a>> {
    let mut steps = Vec::new();
    let mut program = match apply_prelude(builder, program, context) {
        Ok(program) => program,
        Err(error) => {
            context.push_error(error);
            return steps;
        }
    };

    while !program.is_empty_program() {
        if let Some(limit) = options.step_limit {
            if steps.len() >= limit {
                debug!(limit, "Step limit reached");
                context.push_error(StepErrorKind::StepLimitExceeded { limit }.at(None));
                break;
            }
        }
        steps.push(program);
        match reduce(builder, registry, context, program) {
            Ok(next) => {
                debug!(step = steps.len(), "Reduced");
                program = next;
            }
            Err(error) => {
                debug!(%error, "Evaluation halted");
                context.push_error(error);
                break;
            }
        }
    }
    steps
}

/// Substitute the context's prelude closures through `program`.
fn apply_prelude<'a>(
    builder: TermBuilder<'a>,
    program: &'a Term<'a>,
    context: &Context<'a>,
) -> Result<&'a Term<'a>, StepError> {
    context
        .prelude
        .iter()
        .try_fold(program, |program, &(name, closure)| {
            substitute(builder, name, closure, program)
        })
}
