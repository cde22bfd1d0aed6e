mod builder;
mod display;
mod term;

pub use builder::{ANONYMOUS_MARKER, TermBuilder};
pub use display::format_number;
pub use term::{
    BinaryOp, Closure, ClosureKind, DeclarationKind, Declarator, Literal, LogicalOp, Position,
    Span, Term, TermKind, UnaryOp,
};
