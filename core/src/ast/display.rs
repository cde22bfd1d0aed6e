//! Rendering terms back to Source text.
//!
//! Programs print one statement per line, blocks print inline. Expressions are
//! parenthesized by precedence. Closures can be cyclic after self-substitution,
//! so a closure met again while it is still being printed is shown by name.

use core::fmt::{self, Write};

use super::builder::ANONYMOUS_MARKER;
use super::term::{ClosureKind, Declarator, Literal, Term, TermKind};

// Precedence levels, loosest first.
const ARROW: u8 = 1;
const CONDITIONAL: u8 = 2;
const OR: u8 = 3;
const AND: u8 = 4;
const EQUALITY: u8 = 5;
const RELATIONAL: u8 = 6;
const ADDITIVE: u8 = 7;
const MULTIPLICATIVE: u8 = 8;
const UNARY: u8 = 9;
const CALL: u8 = 10;
const PRIMARY: u8 = 11;

/// Format a number the way JavaScript prints it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        // Covers -0 as well.
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

fn write_string(out: &mut impl Write, value: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => f.write_str(&format_number(*n)),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Str(s) => write_string(f, s),
            Literal::Undefined => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for Term<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer {
            out: f,
            open_closures: Vec::new(),
        }
        .term(self)
    }
}

struct Printer<'f, 'g> {
    out: &'f mut fmt::Formatter<'g>,
    open_closures: Vec<*const ()>,
}

impl Printer<'_, '_> {
    fn term(&mut self, term: &Term<'_>) -> fmt::Result {
        match &term.kind {
            TermKind::Program(body) => {
                for (i, stmt) in body.iter().enumerate() {
                    if i > 0 {
                        self.out.write_char('\n')?;
                    }
                    self.statement(stmt)?;
                }
                Ok(())
            }
            TermKind::Block(_)
            | TermKind::BlockExpression(_)
            | TermKind::ExpressionStatement(_)
            | TermKind::VariableDeclaration { .. }
            | TermKind::FunctionDeclaration { .. }
            | TermKind::Return(_)
            | TermKind::If { .. } => self.statement(term),
            _ => self.expression(term, 0),
        }
    }

    fn statement(&mut self, stmt: &Term<'_>) -> fmt::Result {
        match &stmt.kind {
            TermKind::Block(body) | TermKind::BlockExpression(body) => self.block(body),
            TermKind::ExpressionStatement(expr) => {
                // A leading `function` would read back as a declaration.
                let wrap = matches!(&expr.kind, TermKind::Closure(c) if c.kind == ClosureKind::Function);
                if wrap {
                    self.out.write_char('(')?;
                }
                self.expression(expr, 0)?;
                if wrap {
                    self.out.write_char(')')?;
                }
                self.out.write_char(';')
            }
            TermKind::VariableDeclaration { kind, declarators } => {
                write!(self.out, "{} ", kind.keyword())?;
                for (i, Declarator { name, init }) in declarators.iter().enumerate() {
                    if i > 0 {
                        self.out.write_str(", ")?;
                    }
                    self.out.write_str(name)?;
                    if let Some(init) = init {
                        self.out.write_str(" = ")?;
                        self.expression(init, ARROW)?;
                    }
                }
                self.out.write_char(';')
            }
            TermKind::FunctionDeclaration { name, params, body } => {
                write!(self.out, "function {}", name)?;
                self.params(params)?;
                self.out.write_char(' ')?;
                self.statement(body)
            }
            TermKind::Return(argument) => {
                self.out.write_str("return ")?;
                self.expression(argument, 0)?;
                self.out.write_char(';')
            }
            TermKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.out.write_str("if (")?;
                self.expression(test, 0)?;
                self.out.write_str(") ")?;
                self.statement(consequent)?;
                if let Some(alternate) = alternate {
                    self.out.write_str(" else ")?;
                    self.statement(alternate)?;
                }
                Ok(())
            }
            TermKind::Program(_) => self.term(stmt),
            _ => {
                self.expression(stmt, 0)?;
                self.out.write_char(';')
            }
        }
    }

    fn block(&mut self, body: &[&Term<'_>]) -> fmt::Result {
        if body.is_empty() {
            return self.out.write_str("{}");
        }
        self.out.write_char('{')?;
        for stmt in body {
            self.out.write_char(' ')?;
            self.statement(stmt)?;
        }
        self.out.write_str(" }")
    }

    fn params(&mut self, params: &[&str]) -> fmt::Result {
        write!(self.out, "({})", params.join(", "))
    }

    fn precedence(term: &Term<'_>) -> u8 {
        use crate::ast::{BinaryOp::*, LogicalOp};
        match &term.kind {
            TermKind::Closure(c) if c.kind == ClosureKind::Arrow => ARROW,
            // Parenthesized when called.
            TermKind::Closure(_) => UNARY,
            TermKind::Conditional { .. } => CONDITIONAL,
            TermKind::Logical { op: LogicalOp::Or, .. } => OR,
            TermKind::Logical { op: LogicalOp::And, .. } => AND,
            TermKind::Binary { op, .. } => match op {
                StrictEq | StrictNeq => EQUALITY,
                Lt | Le | Gt | Ge => RELATIONAL,
                Add | Sub => ADDITIVE,
                Mul | Div | Rem => MULTIPLICATIVE,
            },
            TermKind::Unary { .. } => UNARY,
            TermKind::Literal(Literal::Number(n)) if n.is_sign_negative() && *n != 0.0 => UNARY,
            TermKind::Call { .. } => CALL,
            _ => PRIMARY,
        }
    }

    fn expression(&mut self, expr: &Term<'_>, min: u8) -> fmt::Result {
        let prec = Self::precedence(expr);
        if prec < min {
            self.out.write_char('(')?;
            self.expression_inner(expr, prec)?;
            self.out.write_char(')')
        } else {
            self.expression_inner(expr, prec)
        }
    }

    fn expression_inner(&mut self, expr: &Term<'_>, prec: u8) -> fmt::Result {
        match &expr.kind {
            TermKind::Identifier(name) => self.out.write_str(name),
            TermKind::Literal(literal) => write!(self.out, "{}", literal),
            TermKind::Unary { op, argument } => {
                self.out.write_str(op.symbol())?;
                // `- -x` must not collapse into `--x`.
                self.expression(argument, UNARY + 1)
            }
            TermKind::Binary { op, left, right } => {
                self.expression(left, prec)?;
                write!(self.out, " {} ", op.symbol())?;
                self.expression(right, prec + 1)
            }
            TermKind::Logical { op, left, right } => {
                self.expression(left, prec)?;
                write!(self.out, " {} ", op.symbol())?;
                self.expression(right, prec + 1)
            }
            TermKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test, OR)?;
                self.out.write_str(" ? ")?;
                self.expression(consequent, ARROW)?;
                self.out.write_str(" : ")?;
                self.expression(alternate, ARROW)
            }
            TermKind::Call { callee, arguments } => {
                self.expression(callee, CALL)?;
                self.out.write_char('(')?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.write_str(", ")?;
                    }
                    self.expression(arg, ARROW)?;
                }
                self.out.write_char(')')
            }
            TermKind::Closure(closure) => {
                let key = expr.as_ptr() as *const ();
                if self.open_closures.contains(&key) {
                    return self.out.write_str(closure.name.unwrap_or(ANONYMOUS_MARKER));
                }
                self.open_closures.push(key);
                let result = match closure.kind {
                    ClosureKind::Function => {
                        self.out.write_str("function")?;
                        if let Some(name) = closure.name {
                            write!(self.out, " {}", name)?;
                        }
                        self.params(closure.params)?;
                        self.out.write_char(' ')?;
                        self.statement(closure.body())
                    }
                    ClosureKind::Arrow => {
                        match closure.params {
                            [single] => self.out.write_str(single)?,
                            params => self.params(params)?,
                        }
                        self.out.write_str(" => ")?;
                        if closure.has_expression_body() {
                            self.expression(closure.body(), ARROW)
                        } else {
                            self.statement(closure.body())
                        }
                    }
                };
                self.open_closures.pop();
                result
            }
            TermKind::BlockExpression(body) => self.block(body),
            _ => self.statement(expr),
        }
    }
}

#[cfg(test)]
#[path = "display_test.rs"]
mod display_test;
