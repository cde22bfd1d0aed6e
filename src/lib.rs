//! Stepper - shows how a program evaluates, one substitution at a time
//!
//! # Overview
//!
//! Programs are written in a small subset of JavaScript: constants, function
//! declarations, arrow functions, conditionals, arithmetic and comparison
//! operators, and calls. Instead of computing a result directly, the stepper
//! rewrites the program one rule at a time and records every intermediate
//! program. Each step is plain source text, which makes the trace useful for
//! teaching how function application and substitution work.
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use stepper::{Stepper, StepperOptions};
//!
//! let arena = Bump::new();
//! let stepper = Stepper::new(&arena, StepperOptions::default());
//!
//! let evaluation = stepper.evaluate("const x = 2; x * 21;").unwrap();
//! assert_eq!(evaluation.rendered, vec!["const x = 2;\nx * 21;", "2 * 21;", "42;"]);
//! assert!(evaluation.is_complete());
//! ```
//!
//! # Errors
//!
//! Syntax errors are reported by [`Stepper::evaluate`] itself. A program that
//! fails while it runs still produces the steps taken before the failure;
//! [`Evaluation::error`] turns the failure into an [`Error`] that can be
//! rendered with [`render_error`].

mod error_renderer;

use bumpalo::Bump;
use thiserror::Error;

use stepper_core::parser::{ParseError, parse};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
pub use stepper_core::ast::Literal;
pub use stepper_core::diagnostics::{Diagnostic, Severity};
pub use stepper_core::{
    BuiltinRegistry, Context, StepError, StepErrorKind, StepperOptions, Term, TermBuilder,
    TermKind, ast, builtins, get_evaluation_steps, parser, stepper::treeify,
};

/// An error ready to be shown to a user, together with the program text it
/// points into.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("{}", .diagnostic.message)]
    Parse {
        diagnostic: Diagnostic,
        program: String,
    },
    #[error("{}", .diagnostic.message)]
    Evaluation {
        diagnostic: Diagnostic,
        program: String,
    },
}

impl Error {
    pub fn parse(error: &ParseError, program: &str) -> Self {
        Error::Parse {
            diagnostic: error.to_diagnostic(),
            program: program.to_string(),
        }
    }

    pub fn evaluation(error: &StepError, program: &str) -> Self {
        Error::Evaluation {
            diagnostic: error.to_diagnostic(),
            program: program.to_string(),
        }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            Error::Parse { diagnostic, .. } | Error::Evaluation { diagnostic, .. } => diagnostic,
        }
    }

    pub fn program(&self) -> &str {
        match self {
            Error::Parse { program, .. } | Error::Evaluation { program, .. } => program,
        }
    }
}

/// The outcome of stepping one program.
#[derive(Debug)]
pub struct Evaluation<'a> {
    /// Treeified programs, starting with the input program.
    pub steps: Vec<&'a Term<'a>>,
    /// `steps`, rendered as source text.
    pub rendered: Vec<String>,
    /// At most one entry: the error that stopped evaluation.
    pub errors: Vec<StepError>,
    /// Lines logged by `display`.
    pub output: Vec<String>,
    program: String,
}

impl<'a> Evaluation<'a> {
    /// True when the program ran until nothing was left to reduce.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// The last program of the trace, rendered.
    pub fn last_step(&self) -> Option<&str> {
        self.rendered.last().map(String::as_str)
    }

    /// The error that stopped evaluation, if any.
    pub fn error(&self) -> Option<Error> {
        self.errors
            .first()
            .map(|error| Error::evaluation(error, &self.program))
    }
}

/// Evaluates programs into step traces.
///
/// Terms live in the arena passed to [`Stepper::new`], so the steps of every
/// evaluation stay valid for as long as the arena does.
pub struct Stepper<'a> {
    arena: &'a Bump,
    registry: BuiltinRegistry,
    options: StepperOptions,
    prelude: Vec<(&'a str, &'a Term<'a>)>,
}

impl<'a> Stepper<'a> {
    pub fn new(arena: &'a Bump, options: StepperOptions) -> Self {
        Self {
            arena,
            registry: BuiltinRegistry::standard(),
            options,
            prelude: Vec::new(),
        }
    }

    pub fn builder(&self) -> TermBuilder<'a> {
        TermBuilder::new(self.arena)
    }

    /// Make `closure` available under `name` in every program evaluated
    /// afterwards.
    pub fn define_prelude(&mut self, name: &str, closure: &'a Term<'a>) {
        let name = self.builder().str(name);
        self.prelude.push((name, closure));
    }

    pub fn evaluate(&self, source: &str) -> Result<Evaluation<'a>, Error> {
        let builder = self.builder();
        let program = parse(builder, source).map_err(|error| Error::parse(&error, source))?;

        let mut context = Context::standard(builder);
        for &(name, closure) in &self.prelude {
            context.define_prelude(name, closure);
        }
        let steps = stepper_core::get_evaluation_steps_with_options(
            builder,
            &self.registry,
            program,
            &mut context,
            &self.options,
        );

        Ok(Evaluation {
            rendered: steps.iter().map(|step| step.to_string()).collect(),
            steps,
            errors: context.errors,
            output: context.output,
            program: source.to_string(),
        })
    }
}
