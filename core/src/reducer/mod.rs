//! One step of the substitution model.
//!
//! [`reduce`] applies exactly one rewrite to a term. Evaluation order is
//! fixed: left operand before right, test before branches, callee before
//! arguments and arguments left to right, first statement of a sequence
//! before the rest.
//!
//! A term with no applicable rule reduces to the empty program. That is the
//! signal callers use for "nothing further to do", so it is not an error.

mod operators;

use tracing::{debug, trace};

use crate::ast::{
    Closure, ClosureKind, DeclarationKind, Declarator, Literal, LogicalOp, Span, Term,
    TermBuilder, TermKind,
};
use crate::builtins::{BuiltinRegistry, Type};
use crate::context::{Context, Global, NativeCall};
use crate::errors::{StepError, StepErrorKind};
use crate::substituter::substitute;

/// Why a step produced no successor term.
enum Interrupt {
    /// No rule applies. The whole step collapses to the empty program.
    Halt,
    Fail(StepError),
}

impl From<StepError> for Interrupt {
    fn from(error: StepError) -> Self {
        Interrupt::Fail(error)
    }
}

type Step<'a> = Result<&'a Term<'a>, Interrupt>;

/// Apply one reduction rule to `term`.
pub fn reduce<'a>(
    builder: TermBuilder<'a>,
    registry: &BuiltinRegistry,
    context: &mut Context<'a>,
    term: &'a Term<'a>,
) -> Result<&'a Term<'a>, StepError> {
    let mut reducer = Reducer {
        builder,
        registry,
        context,
    };
    match reducer.step(term) {
        Ok(next) => Ok(next),
        Err(Interrupt::Halt) => {
            debug!("No reduction rule applies, halting");
            Ok(builder.empty_program())
        }
        Err(Interrupt::Fail(error)) => Err(error),
    }
}

/// Whether `term` is finished: a literal, a closure, or the name of a native.
///
/// Identifiers bound to global values still have a step to take, and unbound
/// identifiers are an error.
pub fn is_value(context: &Context<'_>, term: &Term<'_>) -> Result<bool, StepError> {
    match &term.kind {
        TermKind::Literal(_) | TermKind::Closure(_) => Ok(true),
        TermKind::Identifier(name) => match context.lookup(name) {
            Some(Global::Native(_)) => Ok(true),
            Some(Global::Value(_)) => Ok(false),
            None => Err(undefined(name, term.span)),
        },
        _ => Ok(false),
    }
}

fn undefined(name: &str, span: Option<Span>) -> StepError {
    StepErrorKind::UndefinedVariable {
        name: name.to_string(),
    }
    .at(span)
}

/// The name and initializer of a well-formed declaration: exactly one
/// `const` declarator with an initializer.
fn single_const<'a>(
    kind: DeclarationKind,
    declarators: &[Declarator<'a>],
) -> Option<(&'a str, &'a Term<'a>)> {
    match (kind, declarators) {
        (
            DeclarationKind::Const,
            [
                Declarator {
                    name,
                    init: Some(init),
                },
            ],
        ) => Some((*name, *init)),
        _ => None,
    }
}

/// Statement lists share their rules; they differ in what a finished list
/// turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    Program,
    Block,
    BlockExpression,
}

struct Reducer<'r, 'a> {
    builder: TermBuilder<'a>,
    registry: &'r BuiltinRegistry,
    context: &'r mut Context<'a>,
}

impl<'r, 'a> Reducer<'r, 'a> {
    fn is_value(&self, term: &Term<'a>) -> Result<bool, StepError> {
        is_value(&*self.context, term)
    }

    fn check(&self, operation: &str, kinds: &[Type], span: Option<Span>) -> Result<(), StepError> {
        self.registry
            .check(operation, kinds)
            .map(|_| ())
            .map_err(|mismatch| mismatch.into_error(operation).at(span))
    }

    fn condition(&self, test: &Term<'a>, span: Option<Span>) -> Result<bool, StepError> {
        match test.as_literal() {
            Some(Literal::Boolean(value)) => Ok(value),
            _ => Err(StepErrorKind::type_mismatch(
                "boolean as condition",
                Type::of(test).name(),
                None,
                "conditional",
            )
            .at(span)),
        }
    }

    fn step(&mut self, term: &'a Term<'a>) -> Step<'a> {
        let b = self.builder;
        let span = term.span;
        match &term.kind {
            TermKind::Program(body) if body.is_empty() => Ok(term),
            TermKind::Program(body) => self.sequence(Sequence::Program, body, span),
            TermKind::Block(body) => self.sequence(Sequence::Block, body, span),
            TermKind::BlockExpression(body) => {
                self.sequence(Sequence::BlockExpression, body, span)
            }
            TermKind::ExpressionStatement(expr) => {
                Ok(b.expression_statement(self.step(expr)?, span))
            }
            TermKind::Return(argument) => Ok(b.return_statement(self.step(argument)?, span)),
            TermKind::VariableDeclaration { kind, declarators } => {
                match single_const(*kind, declarators) {
                    Some((name, init)) => Ok(b.constant(name, self.step(init)?, span)),
                    None => Err(Interrupt::Halt),
                }
            }
            TermKind::FunctionDeclaration { .. } | TermKind::Literal(_) | TermKind::Closure(_) => {
                Err(Interrupt::Halt)
            }
            TermKind::Identifier(name) => match self.context.lookup(name) {
                Some(Global::Value(value)) => {
                    trace!(identifier = *name, "Replacing global by its value");
                    Ok(value)
                }
                Some(Global::Native(_)) => Err(Interrupt::Halt),
                None => Err(undefined(name, span).into()),
            },
            TermKind::If {
                test,
                consequent,
                alternate,
            } => {
                if !self.is_value(test)? {
                    let test = self.step(test)?;
                    return Ok(b.if_statement(test, consequent, *alternate, span));
                }
                if self.condition(test, span)? {
                    Ok(*consequent)
                } else {
                    Ok(alternate.unwrap_or_else(|| b.block(&[], span)))
                }
            }
            TermKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if !self.is_value(test)? {
                    let test = self.step(test)?;
                    return Ok(b.conditional(test, consequent, alternate, span));
                }
                if self.condition(test, span)? {
                    Ok(*consequent)
                } else {
                    Ok(*alternate)
                }
            }
            TermKind::Unary { op, argument } => {
                if !self.is_value(argument)? {
                    return Ok(b.unary(*op, self.step(argument)?, span));
                }
                self.check(op.symbol(), &[Type::of(argument)], span)?;
                argument
                    .as_literal()
                    .and_then(|operand| operators::unary(b, *op, operand, span))
                    .ok_or_else(|| self.unsupported(op.symbol(), argument, span))
            }
            TermKind::Binary { op, left, right } => {
                if !self.is_value(left)? {
                    return Ok(b.binary(*op, self.step(left)?, right, span));
                }
                if !self.is_value(right)? {
                    return Ok(b.binary(*op, left, self.step(right)?, span));
                }
                self.check(op.symbol(), &[Type::of(left), Type::of(right)], span)?;
                match (left.as_literal(), right.as_literal()) {
                    (Some(l), Some(r)) => operators::binary(b, *op, l, r, span)
                        .ok_or_else(|| self.unsupported(op.symbol(), right, span)),
                    (None, _) => Err(self.unsupported(op.symbol(), left, span)),
                    (_, None) => Err(self.unsupported(op.symbol(), right, span)),
                }
            }
            TermKind::Logical { op, left, right } => {
                if !self.is_value(left)? {
                    return Ok(b.logical(*op, self.step(left)?, right, span));
                }
                self.check(op.symbol(), &[Type::of(left), Type::Any], span)?;
                match (*op, left.as_literal()) {
                    (LogicalOp::And, Some(Literal::Boolean(false))) => Ok(b.boolean(false, span)),
                    (LogicalOp::Or, Some(Literal::Boolean(true))) => Ok(b.boolean(true, span)),
                    _ => {
                        // A selected operand that is already a value must be a boolean too.
                        if self.is_value(right)? {
                            self.check(op.symbol(), &[Type::of(left), Type::of(right)], span)?;
                        }
                        Ok(*right)
                    }
                }
            }
            TermKind::Call { callee, arguments } => self.call(term, callee, arguments),
        }
    }

    fn unsupported(&self, operation: &str, operand: &Term<'a>, span: Option<Span>) -> Interrupt {
        let expected = self
            .registry
            .signature(operation)
            .and_then(|signature| signature.overloads.first())
            .and_then(|overload| overload.params.first())
            .map_or("value", |ty| ty.name());
        StepErrorKind::type_mismatch(expected, Type::of(operand).name(), None, operation)
            .at(span)
            .into()
    }

    /// Statement-list rules shared by programs, blocks and blocks in progress.
    fn sequence(
        &mut self,
        kind: Sequence,
        body: &'a [&'a Term<'a>],
        span: Option<Span>,
    ) -> Step<'a> {
        let b = self.builder;
        let Some((&head, rest)) = body.split_first() else {
            return match kind {
                Sequence::Program => Ok(b.empty_program()),
                Sequence::Block => Err(Interrupt::Halt),
                Sequence::BlockExpression => Ok(b.undefined(span)),
            };
        };

        match &head.kind {
            TermKind::ExpressionStatement(expr) if self.is_value(expr)? => {
                trace!("Dropping finished expression statement");
                Ok(self.rebuild(kind, &[], rest, span))
            }
            TermKind::Return(argument) if self.is_value(argument)? => {
                trace!(?kind, "Returning a value");
                Ok(match kind {
                    Sequence::BlockExpression => *argument,
                    Sequence::Block => b.expression_statement(argument, head.span),
                    Sequence::Program => b.program(&[b.expression_statement(argument, head.span)]),
                })
            }
            TermKind::FunctionDeclaration {
                name,
                params,
                body: function_body,
            } => {
                trace!(function = *name, "Hoisting function declaration");
                let closure = b.function_expression(Some(*name), params, function_body, head.span);
                let closure = substitute(b, name, closure, closure)?;
                let rest = self.rebuild(kind, &[], rest, span);
                Ok(substitute(b, name, closure, rest)?)
            }
            TermKind::VariableDeclaration {
                kind: declaration_kind,
                declarators,
            } => {
                let Some((name, init)) = single_const(*declaration_kind, declarators) else {
                    debug!("Malformed declaration, halting");
                    return Err(Interrupt::Halt);
                };
                if self.is_value(init)? {
                    trace!(constant = name, "Eliminating declaration");
                    let value = self.bind(name, init)?;
                    let rest = self.rebuild(kind, &[], rest, span);
                    Ok(substitute(b, name, value, rest).map_err(|e| e.or_at(head.span))?)
                } else {
                    let head = b.constant(name, self.step(init)?, head.span);
                    Ok(self.rebuild(kind, &[head], rest, span))
                }
            }
            TermKind::Block(inner) => match inner.first() {
                None => Ok(self.rebuild(kind, &[], rest, span)),
                Some(&first) => match &first.kind {
                    TermKind::Return(argument) if self.is_value(argument)? => {
                        trace!("Leaving nested block");
                        Ok(self.rebuild(kind, &[first], rest, span))
                    }
                    _ => {
                        let head = self.step(head)?;
                        Ok(self.rebuild(kind, &[head], rest, span))
                    }
                },
            },
            _ => {
                let head = self.step(head)?;
                Ok(self.rebuild(kind, &[head], rest, span))
            }
        }
    }

    fn rebuild(
        &self,
        kind: Sequence,
        head: &[&'a Term<'a>],
        rest: &[&'a Term<'a>],
        span: Option<Span>,
    ) -> &'a Term<'a> {
        let body: Vec<&'a Term<'a>> = head.iter().chain(rest).copied().collect();
        match kind {
            Sequence::Program => self.builder.program(&body),
            Sequence::Block => self.builder.block(&body, span),
            Sequence::BlockExpression => self.builder.block_expression(&body, span),
        }
    }

    /// The value a `const` binds. Closures are named after the constant and
    /// their own name is substituted into their body, so they can recurse.
    fn bind(&self, name: &'a str, init: &'a Term<'a>) -> Result<&'a Term<'a>, StepError> {
        let b = self.builder;
        let Some(closure) = init.as_closure() else {
            return Ok(init);
        };
        let (own_name, function) = match (closure.kind, closure.name) {
            (ClosureKind::Function, Some(own_name)) => (own_name, init),
            _ => {
                let body = closure.body();
                let body = if closure.has_expression_body() {
                    b.block(&[b.return_statement(body, body.span)], body.span)
                } else {
                    body
                };
                let named = b.function_expression(Some(name), closure.params, body, init.span);
                (name, named)
            }
        };
        substitute(b, own_name, function, function)
    }

    fn call(
        &mut self,
        term: &'a Term<'a>,
        callee: &'a Term<'a>,
        arguments: &'a [&'a Term<'a>],
    ) -> Step<'a> {
        let b = self.builder;
        let span = term.span;
        if !callee.is_irreducible() {
            return Ok(b.call(self.step(callee)?, arguments, span));
        }

        match &callee.kind {
            TermKind::Literal(_) => Err(StepErrorKind::CallingNonFunctionValue {
                value: callee.to_string(),
            }
            .at(span)
            .into()),
            TermKind::Identifier(name) => match self.context.lookup(name) {
                None => Err(undefined(name, callee.span).into()),
                Some(Global::Value(value)) => Ok(b.call(value, arguments, span)),
                Some(Global::Native(native)) => {
                    if let Some(advanced) = self.advance_argument(callee, arguments, span)? {
                        return Ok(advanced);
                    }
                    let kinds: Vec<Type> = arguments.iter().map(|arg| Type::of(arg)).collect();
                    self.check(name, &kinds, span)?;
                    trace!(native = *name, "Calling native");
                    native(NativeCall {
                        name: *name,
                        builder: b,
                        args: arguments,
                        span,
                        output: &mut self.context.output,
                    })
                    .map_err(|kind| kind.at(span).into())
                }
            },
            TermKind::Closure(closure) => {
                if closure.arity() != arguments.len() {
                    return Err(StepErrorKind::ArityMismatch {
                        expected: closure.arity(),
                        found: arguments.len(),
                    }
                    .at(span)
                    .into());
                }
                if let Some(advanced) = self.advance_argument(callee, arguments, span)? {
                    return Ok(advanced);
                }
                Ok(self.apply(closure, arguments, span)?)
            }
            _ => Err(Interrupt::Halt),
        }
    }

    /// Reduce the leftmost argument that is not a value yet, if any.
    fn advance_argument(
        &mut self,
        callee: &'a Term<'a>,
        arguments: &'a [&'a Term<'a>],
        span: Option<Span>,
    ) -> Result<Option<&'a Term<'a>>, Interrupt> {
        for (index, &argument) in arguments.iter().enumerate() {
            if !self.is_value(argument)? {
                let mut advanced = arguments.to_vec();
                advanced[index] = self.step(argument)?;
                return Ok(Some(self.builder.call(callee, &advanced, span)));
            }
        }
        Ok(None)
    }

    /// Substitute the arguments for the parameters, in declaration order.
    fn apply(
        &self,
        closure: &Closure<'a>,
        arguments: &[&'a Term<'a>],
        span: Option<Span>,
    ) -> Result<&'a Term<'a>, StepError> {
        let b = self.builder;
        let mut body = closure.body();
        for (param, &argument) in closure.params.iter().zip(arguments) {
            body = substitute(b, param, argument, body).map_err(|e| e.or_at(span))?;
        }
        trace!(arity = closure.arity(), "Applied closure");

        if closure.has_expression_body() {
            return Ok(body);
        }
        let TermKind::Block(statements) = body.kind else {
            return Ok(body);
        };
        if let Some(TermKind::Return(argument)) = statements.first().map(|stmt| &stmt.kind) {
            return Ok(*argument);
        }
        Ok(b.block_expression(statements, span))
    }
}
