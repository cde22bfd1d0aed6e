//! Terms of the restricted Source grammar.
//!
//! Terms live in a `Bump` arena and are shared by reference. Identity is
//! pointer identity (see [`Term::as_ptr`]): the substitutor's memo and the
//! printer's cycle guard both key on it.
//!
//! A term is immutable once it is handed out, with one exception: a closure's
//! body sits in a write-once cell so the substitutor can register a closure
//! copy before its body has been computed. That is what lets a recursive
//! function refer to itself without an environment.

use core::cell::OnceCell;
use core::fmt;

/// A point in the source text. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `a` and `b`.
    pub fn combine(a: Option<Span>, b: Option<Span>) -> Option<Span> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Span::new(a.start, b.end)),
            (a, b) => a.or(b),
        }
    }

    pub fn line(&self) -> usize {
        self.start.line
    }

    /// Byte range into the source text.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start.offset..self.end.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Number(f64),
    Boolean(bool),
    Str(&'a str),
    Undefined,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    StrictEq,
    StrictNeq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNeq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    Const,
    Let,
}

impl DeclarationKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclarationKind::Const => "const",
            DeclarationKind::Let => "let",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Declarator<'a> {
    pub name: &'a str,
    pub init: Option<&'a Term<'a>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClosureKind {
    /// `function name(params) { ... }`, named or anonymous.
    Function,
    /// `(params) => body`, where body is an expression or a block.
    Arrow,
}

/// A function value: parameter list plus body, substituted as a unit.
pub struct Closure<'a> {
    pub kind: ClosureKind,
    pub name: Option<&'a str>,
    pub params: &'a [&'a str],
    body: OnceCell<&'a Term<'a>>,
}

impl<'a> Closure<'a> {
    pub(crate) fn new(
        kind: ClosureKind,
        name: Option<&'a str>,
        params: &'a [&'a str],
        body: Option<&'a Term<'a>>,
    ) -> Self {
        let cell = OnceCell::new();
        if let Some(body) = body {
            let _ = cell.set(body);
        }
        Self {
            kind,
            name,
            params,
            body: cell,
        }
    }

    pub fn body(&self) -> &'a Term<'a> {
        self.body
            .get()
            .copied()
            .expect("closure body is set before the closure leaves the substitutor")
    }

    /// Fill in the body of a placeholder. Returns false if it was already set.
    pub(crate) fn set_body(&self, body: &'a Term<'a>) -> bool {
        self.body.set(body).is_ok()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// True when one of the parameters shadows `name`.
    pub fn binds(&self, name: &str) -> bool {
        self.params.iter().any(|param| *param == name)
    }

    /// Arrow functions whose body is a bare expression rather than a block.
    pub fn has_expression_body(&self) -> bool {
        self.kind == ClosureKind::Arrow && !matches!(self.body().kind, TermKind::Block(_))
    }
}

// Bodies may refer back to the closure itself, so Debug stops at the header.
impl fmt::Debug for Closure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum TermKind<'a> {
    Program(&'a [&'a Term<'a>]),
    Block(&'a [&'a Term<'a>]),
    /// A function body in the middle of being evaluated, produced when a call
    /// is applied to a closure whose body does not start with `return`.
    BlockExpression(&'a [&'a Term<'a>]),
    ExpressionStatement(&'a Term<'a>),
    VariableDeclaration {
        kind: DeclarationKind,
        declarators: &'a [Declarator<'a>],
    },
    FunctionDeclaration {
        name: &'a str,
        params: &'a [&'a str],
        body: &'a Term<'a>,
    },
    Return(&'a Term<'a>),
    If {
        test: &'a Term<'a>,
        consequent: &'a Term<'a>,
        alternate: Option<&'a Term<'a>>,
    },
    Closure(Closure<'a>),
    Identifier(&'a str),
    Literal(Literal<'a>),
    Unary {
        op: UnaryOp,
        argument: &'a Term<'a>,
    },
    Binary {
        op: BinaryOp,
        left: &'a Term<'a>,
        right: &'a Term<'a>,
    },
    Logical {
        op: LogicalOp,
        left: &'a Term<'a>,
        right: &'a Term<'a>,
    },
    Conditional {
        test: &'a Term<'a>,
        consequent: &'a Term<'a>,
        alternate: &'a Term<'a>,
    },
    Call {
        callee: &'a Term<'a>,
        arguments: &'a [&'a Term<'a>],
    },
}

#[derive(Debug)]
pub struct Term<'a> {
    pub kind: TermKind<'a>,
    pub span: Option<Span>,
}

impl<'a> Term<'a> {
    pub fn as_ptr(&self) -> *const Self {
        self as *const _
    }

    /// Identifiers, literals and closures: terms the reducer never takes apart.
    pub fn is_irreducible(&self) -> bool {
        matches!(
            self.kind,
            TermKind::Identifier(_) | TermKind::Literal(_) | TermKind::Closure(_)
        )
    }

    pub fn as_literal(&self) -> Option<Literal<'a>> {
        match self.kind {
            TermKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_closure(&self) -> Option<&Closure<'a>> {
        match &self.kind {
            TermKind::Closure(closure) => Some(closure),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&'a str> {
        match self.kind {
            TermKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Statement list of a program, block or block-in-progress.
    pub fn statements(&self) -> Option<&'a [&'a Term<'a>]> {
        match self.kind {
            TermKind::Program(body) | TermKind::Block(body) | TermKind::BlockExpression(body) => {
                Some(body)
            }
            _ => None,
        }
    }

    /// The terminal state of evaluation: a program with no statements left.
    pub fn is_empty_program(&self) -> bool {
        matches!(self.kind, TermKind::Program(body) if body.is_empty())
    }
}
