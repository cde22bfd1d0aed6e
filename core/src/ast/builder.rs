//! Canonical constructors for every grammar production.
//!
//! All terms produced by the parser, the substitutor, the reducer and the
//! treeifier go through [`TermBuilder`], so every node is arena-allocated and
//! well formed by construction.

use bumpalo::Bump;

use super::term::{
    BinaryOp, Closure, ClosureKind, DeclarationKind, Declarator, Literal, LogicalOp, Span, Term,
    TermKind, UnaryOp,
};

/// Marker shown in place of anonymous closures.
pub const ANONYMOUS_MARKER: &str = "=>";

#[derive(Clone, Copy)]
pub struct TermBuilder<'a> {
    arena: &'a Bump,
}

impl core::fmt::Debug for TermBuilder<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TermBuilder")
    }
}

impl<'a> TermBuilder<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    /// Copy a string into the arena.
    pub fn str(&self, s: &str) -> &'a str {
        self.arena.alloc_str(s)
    }

    pub fn terms(&self, terms: &[&'a Term<'a>]) -> &'a [&'a Term<'a>] {
        self.arena.alloc_slice_copy(terms)
    }

    pub fn names(&self, names: &[&'a str]) -> &'a [&'a str] {
        self.arena.alloc_slice_copy(names)
    }

    fn alloc(&self, kind: TermKind<'a>, span: Option<Span>) -> &'a Term<'a> {
        self.arena.alloc(Term { kind, span })
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    pub fn program(&self, body: &[&'a Term<'a>]) -> &'a Term<'a> {
        let span = Span::combine(
            body.first().and_then(|s| s.span),
            body.last().and_then(|s| s.span),
        );
        self.alloc(TermKind::Program(self.terms(body)), span)
    }

    pub fn empty_program(&self) -> &'a Term<'a> {
        self.alloc(TermKind::Program(&[]), None)
    }

    pub fn block(&self, body: &[&'a Term<'a>], span: Option<Span>) -> &'a Term<'a> {
        self.alloc(TermKind::Block(self.terms(body)), span)
    }

    pub fn block_expression(&self, body: &[&'a Term<'a>], span: Option<Span>) -> &'a Term<'a> {
        self.alloc(TermKind::BlockExpression(self.terms(body)), span)
    }

    pub fn expression_statement(&self, expr: &'a Term<'a>, span: Option<Span>) -> &'a Term<'a> {
        self.alloc(TermKind::ExpressionStatement(expr), span)
    }

    pub fn declaration(
        &self,
        kind: DeclarationKind,
        declarators: &[Declarator<'a>],
        span: Option<Span>,
    ) -> &'a Term<'a> {
        let declarators = self.arena.alloc_slice_copy(declarators);
        self.alloc(TermKind::VariableDeclaration { kind, declarators }, span)
    }

    /// `const name = init;`
    pub fn constant(&self, name: &'a str, init: &'a Term<'a>, span: Option<Span>) -> &'a Term<'a> {
        self.declaration(
            DeclarationKind::Const,
            &[Declarator {
                name,
                init: Some(init),
            }],
            span,
        )
    }

    pub fn function_declaration(
        &self,
        name: &'a str,
        params: &[&'a str],
        body: &'a Term<'a>,
        span: Option<Span>,
    ) -> &'a Term<'a> {
        let params = self.names(params);
        self.alloc(TermKind::FunctionDeclaration { name, params, body }, span)
    }

    pub fn return_statement(&self, argument: &'a Term<'a>, span: Option<Span>) -> &'a Term<'a> {
        self.alloc(TermKind::Return(argument), span)
    }

    pub fn if_statement(
        &self,
        test: &'a Term<'a>,
        consequent: &'a Term<'a>,
        alternate: Option<&'a Term<'a>>,
        span: Option<Span>,
    ) -> &'a Term<'a> {
        self.alloc(
            TermKind::If {
                test,
                consequent,
                alternate,
            },
            span,
        )
    }

    // ------------------------------------------------------------------------
    // Closures
    // ------------------------------------------------------------------------

    pub fn function_expression(
        &self,
        name: Option<&'a str>,
        params: &[&'a str],
        body: &'a Term<'a>,
        span: Option<Span>,
    ) -> &'a Term<'a> {
        let closure = Closure::new(ClosureKind::Function, name, self.names(params), Some(body));
        self.alloc(TermKind::Closure(closure), span)
    }

    pub fn arrow_function(
        &self,
        params: &[&'a str],
        body: &'a Term<'a>,
        span: Option<Span>,
    ) -> &'a Term<'a> {
        let closure = Closure::new(ClosureKind::Arrow, None, self.names(params), Some(body));
        self.alloc(TermKind::Closure(closure), span)
    }

    /// A closure whose body is filled in later with `Closure::set_body`.
    pub(crate) fn closure_placeholder(
        &self,
        kind: ClosureKind,
        name: Option<&'a str>,
        params: &'a [&'a str],
        span: Option<Span>,
    ) -> &'a Term<'a> {
        self.alloc(TermKind::Closure(Closure::new(kind, name, params, None)), span)
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub fn identifier(&self, name: &'a str, span: Option<Span>) -> &'a Term<'a> {
        self.alloc(TermKind::Identifier(name), span)
    }

    pub fn literal(&self, literal: Literal<'a>, span: Option<Span>) -> &'a Term<'a> {
        self.alloc(TermKind::Literal(literal), span)
    }

    pub fn number(&self, value: f64, span: Option<Span>) -> &'a Term<'a> {
        self.literal(Literal::Number(value), span)
    }

    pub fn boolean(&self, value: bool, span: Option<Span>) -> &'a Term<'a> {
        self.literal(Literal::Boolean(value), span)
    }

    pub fn string(&self, value: &str, span: Option<Span>) -> &'a Term<'a> {
        self.literal(Literal::Str(self.str(value)), span)
    }

    pub fn undefined(&self, span: Option<Span>) -> &'a Term<'a> {
        self.literal(Literal::Undefined, span)
    }

    pub fn unary(&self, op: UnaryOp, argument: &'a Term<'a>, span: Option<Span>) -> &'a Term<'a> {
        self.alloc(TermKind::Unary { op, argument }, span)
    }

    pub fn binary(
        &self,
        op: BinaryOp,
        left: &'a Term<'a>,
        right: &'a Term<'a>,
        span: Option<Span>,
    ) -> &'a Term<'a> {
        self.alloc(TermKind::Binary { op, left, right }, span)
    }

    pub fn logical(
        &self,
        op: LogicalOp,
        left: &'a Term<'a>,
        right: &'a Term<'a>,
        span: Option<Span>,
    ) -> &'a Term<'a> {
        self.alloc(TermKind::Logical { op, left, right }, span)
    }

    pub fn conditional(
        &self,
        test: &'a Term<'a>,
        consequent: &'a Term<'a>,
        alternate: &'a Term<'a>,
        span: Option<Span>,
    ) -> &'a Term<'a> {
        self.alloc(
            TermKind::Conditional {
                test,
                consequent,
                alternate,
            },
            span,
        )
    }

    pub fn call(
        &self,
        callee: &'a Term<'a>,
        arguments: &[&'a Term<'a>],
        span: Option<Span>,
    ) -> &'a Term<'a> {
        let arguments = self.terms(arguments);
        self.alloc(TermKind::Call { callee, arguments }, span)
    }
}
