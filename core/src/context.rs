//! The evaluation context: global frame plus append-only logs.

use core::fmt;

use hashbrown::HashMap;

use crate::ast::{Span, Term, TermBuilder};
use crate::builtins::Type;
use crate::errors::{StepError, StepErrorKind};

/// Arguments handed to a native operation.
///
/// By the time a native runs, every argument is irreducible and the registry
/// has already checked their kinds.
pub struct NativeCall<'c, 'a> {
    pub name: &'c str,
    pub builder: TermBuilder<'a>,
    pub args: &'c [&'a Term<'a>],
    pub span: Option<Span>,
    pub output: &'c mut Vec<String>,
}

pub type NativeResult<'a> = Result<&'a Term<'a>, StepErrorKind>;

/// A builtin implemented in Rust. The returned term replaces the call.
pub type NativeFn = for<'c, 'a> fn(NativeCall<'c, 'a>) -> NativeResult<'a>;

impl<'c, 'a> NativeCall<'c, 'a> {
    fn argument(&self, index: usize) -> Result<&'a Term<'a>, StepErrorKind> {
        self.args
            .get(index)
            .copied()
            .ok_or(StepErrorKind::ArityMismatch {
                expected: index + 1,
                found: self.args.len(),
            })
    }

    fn mismatch(&self, index: usize, expected: Type, actual: &Term<'_>) -> StepErrorKind {
        StepErrorKind::type_mismatch(
            expected.name(),
            Type::of(actual).name(),
            Some(index + 1),
            self.name,
        )
    }

    pub fn value(&self, index: usize) -> Result<&'a Term<'a>, StepErrorKind> {
        self.argument(index)
    }

    pub fn number(&self, index: usize) -> Result<f64, StepErrorKind> {
        let arg = self.argument(index)?;
        match arg.as_literal() {
            Some(crate::ast::Literal::Number(n)) => Ok(n),
            _ => Err(self.mismatch(index, Type::Number, arg)),
        }
    }

    pub fn string(&self, index: usize) -> Result<&'a str, StepErrorKind> {
        let arg = self.argument(index)?;
        match arg.as_literal() {
            Some(crate::ast::Literal::Str(s)) => Ok(s),
            _ => Err(self.mismatch(index, Type::String, arg)),
        }
    }
}

#[derive(Clone, Copy)]
pub enum Global<'a> {
    Native(NativeFn),
    /// A literal or closure bound before evaluation started.
    Value(&'a Term<'a>),
}

impl fmt::Debug for Global<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Global::Native(_) => f.write_str("Native(..)"),
            Global::Value(term) => f.debug_tuple("Value").field(&term.to_string()).finish(),
        }
    }
}

/// Global bindings read by the reducer, and the logs it appends to.
///
/// The core never removes entries: `errors` and `output` only grow.
#[derive(Debug, Default)]
pub struct Context<'a> {
    frame: HashMap<&'a str, Global<'a>>,
    pub errors: Vec<StepError>,
    pub output: Vec<String>,
    /// Named closures substituted through every program before it runs.
    pub prelude: Vec<(&'a str, &'a Term<'a>)>,
}

impl<'a> Context<'a> {
    /// A context with an empty frame.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A context whose frame holds the standard library.
    pub fn standard(builder: TermBuilder<'a>) -> Self {
        let mut context = Self::empty();
        crate::stdlib::install(builder, &mut context);
        context
    }

    pub fn lookup(&self, name: &str) -> Option<Global<'a>> {
        self.frame.get(name).copied()
    }

    pub fn define_native(&mut self, name: &'a str, native: NativeFn) {
        self.frame.insert(name, Global::Native(native));
    }

    pub fn define_value(&mut self, name: &'a str, value: &'a Term<'a>) {
        self.frame.insert(name, Global::Value(value));
    }

    pub fn define_prelude(&mut self, name: &'a str, closure: &'a Term<'a>) {
        self.prelude.push((name, closure));
    }

    pub fn push_error(&mut self, error: StepError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Names bound in the global frame, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.frame.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn answer<'c, 'a>(call: NativeCall<'c, 'a>) -> NativeResult<'a> {
        Ok(call.builder.number(42.0, call.span))
    }

    #[test]
    fn test_lookup_distinguishes_natives_and_values() {
        let arena = Bump::new();
        let b = TermBuilder::new(&arena);
        let mut context = Context::empty();
        context.define_native("answer", answer);
        context.define_value("one", b.number(1.0, None));

        assert!(matches!(context.lookup("answer"), Some(Global::Native(_))));
        assert!(matches!(context.lookup("one"), Some(Global::Value(_))));
        assert!(context.lookup("missing").is_none());
    }

    #[test]
    fn test_standard_frame() {
        let arena = Bump::new();
        let context = Context::standard(TermBuilder::new(&arena));
        assert!(matches!(context.lookup("display"), Some(Global::Native(_))));
        assert!(matches!(context.lookup("math_PI"), Some(Global::Value(_))));
        assert!(context.lookup("math_random").is_none());
        assert!(!context.has_errors());
    }

    #[test]
    fn test_native_argument_accessors() {
        let arena = Bump::new();
        let b = TermBuilder::new(&arena);
        let mut output = Vec::new();
        let args = [b.string("7", None)];
        let call = NativeCall {
            name: "f",
            builder: b,
            args: &args,
            span: None,
            output: &mut output,
        };
        assert_eq!(call.string(0), Ok("7"));
        assert_eq!(
            call.number(0).unwrap_err().to_string(),
            "The function expects argument #1 to be a number but got a string instead"
        );
        assert!(matches!(
            call.number(1),
            Err(StepErrorKind::ArityMismatch { .. })
        ));
    }
}
