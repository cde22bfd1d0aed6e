//! Type signatures of the builtin operators and natives.
//!
//! The registry is built once and handed to the reducer by reference. It is
//! only consulted for runtime checks of operand and argument kinds; it is not
//! a type checker.

use core::fmt;

use hashbrown::HashMap;

use crate::ast::{Literal, Term, TermKind};
use crate::errors::StepErrorKind;

/// Primitive kinds known to the runtime checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Number,
    Boolean,
    String,
    Undefined,
    Function,
    /// Matches anything. Used for polymorphic natives and for operands that
    /// have not been reduced yet.
    Any,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Number => "number",
            Type::Boolean => "boolean",
            Type::String => "string",
            Type::Undefined => "undefined",
            Type::Function => "function",
            Type::Any => "any",
        }
    }

    /// Kind of an irreducible term. Identifiers left in argument position
    /// name natives, so they count as functions.
    pub fn of(term: &Term<'_>) -> Type {
        match &term.kind {
            TermKind::Literal(literal) => Type::of_literal(literal),
            TermKind::Closure(_) | TermKind::Identifier(_) => Type::Function,
            _ => Type::Any,
        }
    }

    pub fn of_literal(literal: &Literal<'_>) -> Type {
        match literal {
            Literal::Number(_) => Type::Number,
            Literal::Boolean(_) => Type::Boolean,
            Literal::Str(_) => Type::String,
            Literal::Undefined => Type::Undefined,
        }
    }

    fn admits(self, actual: Type) -> bool {
        self == Type::Any || actual == Type::Any || self == actual
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overload {
    pub params: Vec<Type>,
    pub result: Type,
}

impl Overload {
    pub fn new(params: &[Type], result: Type) -> Self {
        Self {
            params: params.to_vec(),
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub overloads: Vec<Overload>,
    pub polymorphic: bool,
}

/// Why a list of argument kinds matches none of the overloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Arity {
        expected: usize,
        found: usize,
    },
    Argument {
        /// 1-based.
        position: usize,
        expected: Vec<Type>,
        actual: Type,
    },
}

impl Mismatch {
    pub fn into_error(self, operation: &str) -> StepErrorKind {
        match self {
            Mismatch::Arity { expected, found } => StepErrorKind::ArityMismatch { expected, found },
            Mismatch::Argument {
                position,
                expected,
                actual,
            } => {
                let expected = expected
                    .iter()
                    .map(|ty| ty.name())
                    .collect::<Vec<_>>()
                    .join(" or ");
                StepErrorKind::type_mismatch(expected, actual.name(), Some(position), operation)
            }
        }
    }
}

impl Signature {
    pub fn new(overloads: Vec<Overload>) -> Self {
        Self {
            overloads,
            polymorphic: false,
        }
    }

    pub fn polymorphic(overloads: Vec<Overload>) -> Self {
        Self {
            overloads,
            polymorphic: true,
        }
    }

    /// First overload consistent with `args`, narrowing left to right.
    pub fn check(&self, args: &[Type]) -> Result<&Overload, Mismatch> {
        let mut candidates: Vec<&Overload> = self
            .overloads
            .iter()
            .filter(|overload| overload.params.len() == args.len())
            .collect();
        if candidates.is_empty() {
            return Err(Mismatch::Arity {
                expected: self.overloads.first().map_or(0, |o| o.params.len()),
                found: args.len(),
            });
        }

        for (index, actual) in args.iter().enumerate() {
            let admissible: Vec<&Overload> = candidates
                .iter()
                .copied()
                .filter(|overload| overload.params[index].admits(*actual))
                .collect();
            if admissible.is_empty() {
                let mut expected = Vec::new();
                for overload in &candidates {
                    if !expected.contains(&overload.params[index]) {
                        expected.push(overload.params[index]);
                    }
                }
                return Err(Mismatch::Argument {
                    position: index + 1,
                    expected,
                    actual: *actual,
                });
            }
            candidates = admissible;
        }

        Ok(candidates[0])
    }
}

/// Immutable table from builtin names (operator symbols included) to their
/// signatures.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    signatures: HashMap<&'static str, Signature>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operators plus the standard library natives.
    pub fn standard() -> Self {
        use Type::*;

        let mut registry = Self::new();
        let numeric = || Overload::new(&[Number, Number], Number);

        for op in ["*", "/", "%"] {
            registry.register(op, Signature::new(vec![numeric()]));
        }
        registry.register(
            "-",
            Signature::new(vec![numeric(), Overload::new(&[Number], Number)]),
        );
        registry.register(
            "+",
            Signature::new(vec![numeric(), Overload::new(&[String, String], String)]),
        );
        for op in ["<", "<=", ">", ">="] {
            registry.register(
                op,
                Signature::new(vec![
                    Overload::new(&[Number, Number], Boolean),
                    Overload::new(&[String, String], Boolean),
                ]),
            );
        }
        for op in ["===", "!=="] {
            registry.register(
                op,
                Signature::new(vec![
                    Overload::new(&[Number, Number], Boolean),
                    Overload::new(&[String, String], Boolean),
                    Overload::new(&[Boolean, Boolean], Boolean),
                ]),
            );
        }
        for op in ["&&", "||"] {
            registry.register(
                op,
                Signature::new(vec![Overload::new(&[Boolean, Boolean], Boolean)]),
            );
        }
        registry.register(
            "!",
            Signature::new(vec![Overload::new(&[Boolean], Boolean)]),
        );

        crate::stdlib::register_signatures(&mut registry);
        registry
    }

    pub fn register(&mut self, name: &'static str, signature: Signature) {
        self.signatures.insert(name, signature);
    }

    pub fn signature(&self, name: &str) -> Option<&Signature> {
        self.signatures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.signatures.contains_key(name)
    }

    /// Check `args` against the signature of `name`. Unknown names have no
    /// constraints and yield `Ok(None)`.
    pub fn check(&self, name: &str, args: &[Type]) -> Result<Option<&Overload>, Mismatch> {
        match self.signature(name) {
            Some(signature) => signature.check(args).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "builtins_test.rs"]
mod builtins_test;
