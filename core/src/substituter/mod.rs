//! Capture-avoiding substitution of a name by a value.
//!
//! One call copies the target top-down, replacing free occurrences of the
//! name. A memo keyed by term identity makes each distinct term instance get
//! substituted at most once per call, so shared sub-terms stay shared.
//!
//! Closures are the one place where a term can be reached again while it is
//! still being copied: substituting a recursive function's name by the
//! function itself leads back into its own body. The copy of a closure is
//! therefore registered in the memo before its body is substituted, and the
//! body is filled in afterwards. Every other node is memoized once it is
//! built, which is enough for termination because closures are the only way
//! back into a term that is already being copied.

use hashbrown::HashMap;
use tracing::trace;

use crate::ast::{Declarator, Literal, Term, TermBuilder, TermKind};
use crate::builtins::Type;
use crate::errors::{StepError, StepErrorKind};

/// Replace the free occurrences of `name` in `target` by `replacement`.
///
/// `replacement` must be a number, string or boolean literal, a closure, or
/// an identifier naming a native. Anything else is a type mismatch.
pub fn substitute<'a>(
    builder: TermBuilder<'a>,
    name: &str,
    replacement: &'a Term<'a>,
    target: &'a Term<'a>,
) -> Result<&'a Term<'a>, StepError> {
    let literal = match &replacement.kind {
        TermKind::Literal(Literal::Undefined) => {
            return Err(StepErrorKind::type_mismatch(
                "string, boolean or number",
                Type::of(replacement).name(),
                None,
                "substitution",
            )
            .at(replacement.span));
        }
        TermKind::Literal(_) => true,
        TermKind::Closure(_) | TermKind::Identifier(_) => false,
        _ => {
            return Err(StepErrorKind::type_mismatch(
                "string, boolean or number",
                "expression",
                None,
                "substitution",
            )
            .at(replacement.span));
        }
    };
    trace!(binding = name, replacement = %replacement, "Substituting");

    let mut substituter = Substituter {
        builder,
        name,
        replacement,
        literal,
        memo: HashMap::new(),
    };
    Ok(substituter.term(target))
}

struct Substituter<'s, 'a> {
    builder: TermBuilder<'a>,
    name: &'s str,
    replacement: &'a Term<'a>,
    /// Literals are never substituted into callee position.
    literal: bool,
    memo: HashMap<*const Term<'a>, &'a Term<'a>>,
}

impl<'s, 'a> Substituter<'s, 'a> {
    fn term(&mut self, term: &'a Term<'a>) -> &'a Term<'a> {
        if let Some(&done) = self.memo.get(&term.as_ptr()) {
            return done;
        }

        let b = self.builder;
        let span = term.span;
        let result = match &term.kind {
            TermKind::Identifier(id) if *id == self.name => match self.replacement.kind {
                TermKind::Literal(literal) => b.literal(literal, span),
                TermKind::Closure(_) => self.term(self.replacement),
                _ => self.replacement,
            },
            TermKind::Identifier(_) | TermKind::Literal(_) => term,
            TermKind::Closure(closure) => {
                let copy = b.closure_placeholder(closure.kind, closure.name, closure.params, span);
                self.memo.insert(term.as_ptr(), copy);
                let body = if closure.binds(self.name) {
                    closure.body()
                } else {
                    self.term(closure.body())
                };
                if let TermKind::Closure(cell) = &copy.kind {
                    cell.set_body(body);
                }
                return copy;
            }
            TermKind::Program(body) => b.program(&self.statements(body)),
            TermKind::Block(body) => b.block(&self.statements(body), span),
            TermKind::BlockExpression(body) => b.block_expression(&self.statements(body), span),
            TermKind::ExpressionStatement(expr) => b.expression_statement(self.term(expr), span),
            TermKind::VariableDeclaration { kind, declarators } => {
                let declarators: Vec<Declarator<'a>> = declarators
                    .iter()
                    .map(|declarator| Declarator {
                        name: declarator.name,
                        init: match declarator.init {
                            Some(init) if declarator.name != self.name => Some(self.term(init)),
                            init => init,
                        },
                    })
                    .collect();
                b.declaration(*kind, &declarators, span)
            }
            TermKind::FunctionDeclaration { name, params, body } => {
                let body = if params.iter().any(|param| *param == self.name) {
                    *body
                } else {
                    self.term(body)
                };
                b.function_declaration(*name, params, body, span)
            }
            TermKind::Return(argument) => b.return_statement(self.term(argument), span),
            TermKind::If {
                test,
                consequent,
                alternate,
            } => {
                let test = self.term(test);
                let consequent = self.term(consequent);
                let alternate = alternate.map(|alternate| self.term(alternate));
                b.if_statement(test, consequent, alternate, span)
            }
            TermKind::Unary { op, argument } => b.unary(*op, self.term(argument), span),
            TermKind::Binary { op, left, right } => {
                let left = self.term(left);
                b.binary(*op, left, self.term(right), span)
            }
            TermKind::Logical { op, left, right } => {
                let left = self.term(left);
                b.logical(*op, left, self.term(right), span)
            }
            TermKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let test = self.term(test);
                let consequent = self.term(consequent);
                b.conditional(test, consequent, self.term(alternate), span)
            }
            TermKind::Call { callee, arguments } => {
                let callee = if self.literal {
                    *callee
                } else {
                    self.term(callee)
                };
                let arguments: Vec<_> = arguments.iter().map(|arg| self.term(arg)).collect();
                b.call(callee, &arguments, span)
            }
        };

        self.memo.insert(term.as_ptr(), result);
        result
    }

    /// A `function` declaration of the name hides it from the whole list; a
    /// declaration of the name hides it from that statement onwards.
    fn statements(&mut self, body: &'a [&'a Term<'a>]) -> Vec<&'a Term<'a>> {
        let hoisted = body.iter().any(|stmt| {
            matches!(stmt.kind, TermKind::FunctionDeclaration { name, .. } if name == self.name)
        });
        if hoisted {
            return body.to_vec();
        }

        let mut shadowed = false;
        body.iter()
            .map(|stmt| {
                shadowed = shadowed || declares(stmt, self.name);
                if shadowed { *stmt } else { self.term(stmt) }
            })
            .collect()
    }
}

fn declares(stmt: &Term<'_>, name: &str) -> bool {
    match &stmt.kind {
        TermKind::VariableDeclaration { declarators, .. } => {
            declarators.iter().any(|declarator| declarator.name == name)
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "substituter_test.rs"]
mod substituter_test;
