use crate::ast::{Position, Span};
use crate::diagnostics::{Diagnostic, Severity};
use crate::parser::Rule;

/// Parser error with its location in the source text.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Invalid number literal
    InvalidNumber { text: String },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// 1-based line where parsing failed.
    pub fn line(&self) -> usize {
        self.span.line()
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("Expected {}, found {}", expected, found)
            }
            ParseErrorKind::InvalidNumber { text } => format!("Invalid number literal '{}'", text),
            ParseErrorKind::Other { message } => message.clone(),
        }
    }

    /// Convert to a Diagnostic for the API boundary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { .. } => ("P001", None),
            ParseErrorKind::InvalidNumber { .. } => {
                ("P003", Some("Check the number format".to_string()))
            }
            ParseErrorKind::Other { .. } => ("P999", None),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.message(),
            span: Some(self.span),
            help,
            code: Some(code.to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(
            f,
            "{}: Line {}: {}",
            diagnostic.severity,
            self.line(),
            diagnostic.message
        )?;

        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }

        if let Some(help) = &diagnostic.help {
            write!(f, "\nhelp: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::{ErrorVariant, InputLocation};

    let (start, end) = match err.location {
        InputLocation::Pos(pos) => (pos, pos),
        InputLocation::Span((start, end)) => (start, end),
    };
    let span = Span::new(position_at(source, start), position_at(source, end));

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => ParseErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: format_found(&negatives, source, start),
        },
        ErrorVariant::CustomError { message } => {
            match message.strip_prefix(INVALID_NUMBER_PREFIX) {
                Some(text) => ParseErrorKind::InvalidNumber {
                    text: text.to_string(),
                },
                None => ParseErrorKind::Other { message },
            }
        }
    };

    ParseError::new(kind, span)
}

/// Prefix of the custom pest message raised by the lowering pass.
pub(crate) const INVALID_NUMBER_PREFIX: &str = "invalid number literal: ";

fn position_at(source: &str, offset: usize) -> Position {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(newline) => before[newline + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    Position {
        offset,
        line,
        column,
    }
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "something else".to_string();
    }

    // Group related rules into higher-level concepts
    let mut concepts: Vec<&str> = Vec::new();
    for rule in rules {
        let concept = match rule {
            Rule::number | Rule::string | Rule::boolean => "literal",
            Rule::identifier | Rule::parameters | Rule::arrow_parameters => "identifier",
            Rule::EOI => "end of input",
            Rule::or
            | Rule::and
            | Rule::strict_eq
            | Rule::strict_neq
            | Rule::le
            | Rule::ge
            | Rule::lt
            | Rule::gt
            | Rule::add
            | Rule::sub
            | Rule::mul
            | Rule::div
            | Rule::rem => "operator",
            Rule::arguments => "argument list",
            Rule::block => "block",
            Rule::declarator => "declarator",
            Rule::function_declaration
            | Rule::variable_declaration
            | Rule::return_statement
            | Rule::if_statement
            | Rule::expression_statement
            | Rule::declaration_kind
            | Rule::kw_function
            | Rule::kw_return
            | Rule::kw_if => "statement",
            _ => "expression",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        None => "something else".to_string(),
    }
}

fn format_found(rules: &[Rule], source: &str, offset: usize) -> String {
    if let Some(rule) = rules.first() {
        return match rule {
            Rule::identifier => "identifier".to_string(),
            Rule::number => "number".to_string(),
            Rule::string => "string".to_string(),
            Rule::boolean => "boolean".to_string(),
            other => format!("{:?}", other),
        };
    }
    match source.get(offset..).and_then(|rest| rest.chars().next()) {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}
