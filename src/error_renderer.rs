//! Error rendering using ariadne
//!
//! Parse errors and evaluation errors are rendered the same way: the
//! diagnostic message, its code, and a label under the offending source text.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<program>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use bumpalo::Bump;
/// use stepper::{Stepper, StepperOptions, render_error};
///
/// let arena = Bump::new();
/// let stepper = Stepper::new(&arena, StepperOptions::default());
///
/// match stepper.evaluate("-true;") {
///     Err(e) => render_error(&e),
///     Ok(evaluation) => {
///         if let Some(e) = evaluation.error() {
///             render_error(&e);
///         }
///     }
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for web UIs, logs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    render_diagnostic(error.program(), error.diagnostic(), writer, use_color)
}

fn render_diagnostic(
    program: &str,
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    // Terms built during evaluation may have no span; point at the start.
    let range = diag.span.map_or(0..0, |span| span.range());

    let mut report = Report::build(kind, (SOURCE_ID, range.clone()))
        .with_message(&diag.message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    let color = colors.next();
    report = report.with_label(
        Label::new((SOURCE_ID, range))
            .with_message(&diag.message)
            .with_color(color),
    );

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(program)), &mut *writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Stepper, StepperOptions};
    use bumpalo::Bump;

    #[test]
    fn test_render_parse_error() {
        let arena = Bump::new();
        let stepper = Stepper::new(&arena, StepperOptions::default());

        let source = "1 + + ;";
        let result = stepper.evaluate(source);

        assert!(result.is_err());
        if let Err(e) = result {
            let output = render_error_to_string_no_color(&e);

            assert!(output.contains("Error") || output.contains("error"));
            assert!(output.contains("1 + + ;"));
        }
    }

    #[test]
    fn test_render_evaluation_error() {
        let arena = Bump::new();
        let stepper = Stepper::new(&arena, StepperOptions::default());

        let evaluation = stepper.evaluate("const a = 1;\n!a;").unwrap();
        let error = evaluation.error().expect("evaluation should fail");
        let output = render_error_to_string_no_color(&error);

        assert!(output.contains("TypeMismatch"));
        assert!(output.contains("to be a boolean but got a number"));
        assert!(output.contains("!a;"));
    }

    #[test]
    fn test_render_error_without_span() {
        let arena = Bump::new();
        let stepper = Stepper::new(
            &arena,
            StepperOptions {
                step_limit: Some(1),
            },
        );

        let evaluation = stepper.evaluate("1 + 1;").unwrap();
        let error = evaluation.error().expect("step limit should be hit");
        let output = render_error_to_string_no_color(&error);

        assert!(output.contains("Evaluation stopped after 1 steps"));
        assert!(output.lines().count() > 1);
    }
}
