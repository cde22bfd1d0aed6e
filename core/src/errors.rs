//! Errors raised while stepping a program.
//!
//! The substitutor and the reducer fail at the first violation; the driver is
//! the only place that catches a [`StepError`], logs it into the context and
//! stops. There is no recovery inside the language.

use core::fmt;

use thiserror::Error;

use crate::ast::Span;
use crate::diagnostics::{Diagnostic, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepErrorKind {
    /// An operand or argument has the wrong kind for the operation.
    ///
    /// `position` is 1-based. It is `None` when the value is not an argument,
    /// such as the test of a conditional.
    #[error("{}", type_mismatch_message(.expected, .actual, .position))]
    TypeMismatch {
        expected: String,
        actual: String,
        position: Option<usize>,
        operation: String,
    },

    #[error("Expected {expected} arguments, but got {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Name {name} not declared")]
    UndefinedVariable { name: String },

    #[error("Calling non-function value {value}")]
    CallingNonFunctionValue { value: String },

    #[error("Evaluation stopped after {limit} steps")]
    StepLimitExceeded { limit: usize },
}

fn with_article(kind: &str) -> String {
    if kind == "undefined" {
        kind.to_string()
    } else {
        format!("a {}", kind)
    }
}

fn type_mismatch_message(expected: &str, actual: &str, position: &Option<usize>) -> String {
    match *position {
        Some(position) => format!(
            "The function expects argument #{} to be {} but got {} instead",
            position,
            with_article(expected),
            with_article(actual)
        ),
        None => format!("Expected {}, got {}", expected, actual),
    }
}

impl StepErrorKind {
    pub fn type_mismatch(
        expected: impl Into<String>,
        actual: impl Into<String>,
        position: Option<usize>,
        operation: impl Into<String>,
    ) -> Self {
        StepErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
            position,
            operation: operation.into(),
        }
    }

    /// Short tag naming the error kind.
    pub fn tag(&self) -> &'static str {
        match self {
            StepErrorKind::TypeMismatch { .. } => "TypeMismatch",
            StepErrorKind::ArityMismatch { .. } => "ArityMismatch",
            StepErrorKind::UndefinedVariable { .. } => "UndefinedVariable",
            StepErrorKind::CallingNonFunctionValue { .. } => "CallingNonFunctionValue",
            StepErrorKind::StepLimitExceeded { .. } => "StepLimitExceeded",
        }
    }

    /// Attach the location of the offending term.
    pub fn at(self, span: Option<Span>) -> StepError {
        StepError { kind: self, span }
    }
}

/// A failure together with the location of the term that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    pub kind: StepErrorKind,
    pub span: Option<Span>,
}

impl StepError {
    /// 1-based source line, if the offending term came from the source text.
    pub fn line(&self) -> Option<usize> {
        self.span.map(|span| span.line())
    }

    /// Use `span` as the location when the error does not carry one yet.
    pub fn or_at(self, span: Option<Span>) -> StepError {
        StepError {
            span: self.span.or(span),
            ..self
        }
    }

    /// The rendered message, `"Line <L>: <message>."`.
    pub fn message(&self) -> String {
        match self.line() {
            Some(line) => format!("Line {}: {}.", line, self.kind),
            None => format!("{}.", self.kind),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span,
            help: None,
            code: Some(self.kind.tag().to_string()),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for StepError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    fn line_one() -> Option<Span> {
        let at = |offset| Position {
            offset,
            line: 1,
            column: offset + 1,
        };
        Some(Span::new(at(0), at(5)))
    }

    #[test]
    fn test_type_mismatch_message_with_position() {
        let error = StepErrorKind::type_mismatch("number", "boolean", Some(1), "-").at(line_one());
        assert_eq!(
            error.message(),
            "Line 1: The function expects argument #1 to be a number but got a boolean instead."
        );
        assert_eq!(error.line(), Some(1));
    }

    #[test]
    fn test_type_mismatch_undefined_has_no_article() {
        let kind = StepErrorKind::type_mismatch("number or string", "undefined", Some(2), "+");
        assert_eq!(
            kind.to_string(),
            "The function expects argument #2 to be a number or string but got undefined instead"
        );
    }

    #[test]
    fn test_condition_mismatch_without_position() {
        let kind = StepErrorKind::type_mismatch("boolean as condition", "number", None, "?");
        assert_eq!(kind.to_string(), "Expected boolean as condition, got number");
    }

    #[test]
    fn test_message_without_span() {
        let error = StepErrorKind::UndefinedVariable {
            name: "x".to_string(),
        }
        .at(None);
        assert_eq!(error.message(), "Name x not declared.");
        assert_eq!(error.line(), None);
    }

    #[test]
    fn test_arity_diagnostic() {
        let error = StepErrorKind::ArityMismatch {
            expected: 0,
            found: 1,
        }
        .at(line_one());
        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.message, "Expected 0 arguments, but got 1");
        assert_eq!(diagnostic.code.as_deref(), Some("ArityMismatch"));
    }
}
