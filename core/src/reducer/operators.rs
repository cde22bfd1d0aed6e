//! Operators applied to literal operands.
//!
//! Operand kinds are checked against the builtin registry before these run;
//! `None` means the kinds did not line up after all.

use crate::ast::{BinaryOp, Literal, Span, Term, TermBuilder, UnaryOp};

pub(crate) fn unary<'a>(
    b: TermBuilder<'a>,
    op: UnaryOp,
    operand: Literal<'a>,
    span: Option<Span>,
) -> Option<&'a Term<'a>> {
    match (op, operand) {
        (UnaryOp::Neg, Literal::Number(x)) => Some(b.number(-x, span)),
        (UnaryOp::Not, Literal::Boolean(x)) => Some(b.boolean(!x, span)),
        _ => None,
    }
}

pub(crate) fn binary<'a>(
    b: TermBuilder<'a>,
    op: BinaryOp,
    left: Literal<'a>,
    right: Literal<'a>,
    span: Option<Span>,
) -> Option<&'a Term<'a>> {
    use Literal::{Number, Str};

    let term = match (op, left, right) {
        (BinaryOp::Add, Number(x), Number(y)) => b.number(x + y, span),
        (BinaryOp::Add, Str(x), Str(y)) => b.string(&format!("{}{}", x, y), span),
        (BinaryOp::Sub, Number(x), Number(y)) => b.number(x - y, span),
        (BinaryOp::Mul, Number(x), Number(y)) => b.number(x * y, span),
        (BinaryOp::Div, Number(x), Number(y)) => b.number(x / y, span),
        // `%` on f64 truncates like JavaScript's remainder.
        (BinaryOp::Rem, Number(x), Number(y)) => b.number(x % y, span),
        (BinaryOp::StrictEq, left, right) => b.boolean(strict_equals(left, right), span),
        (BinaryOp::StrictNeq, left, right) => b.boolean(!strict_equals(left, right), span),
        (op, Number(x), Number(y)) => b.boolean(compare(op, x, y)?, span),
        (op, Str(x), Str(y)) => b.boolean(compare(op, x, y)?, span),
        _ => return None,
    };
    Some(term)
}

fn compare<T: PartialOrd>(op: BinaryOp, x: T, y: T) -> Option<bool> {
    match op {
        BinaryOp::Lt => Some(x < y),
        BinaryOp::Le => Some(x <= y),
        BinaryOp::Gt => Some(x > y),
        BinaryOp::Ge => Some(x >= y),
        _ => None,
    }
}

fn strict_equals(left: Literal<'_>, right: Literal<'_>) -> bool {
    match (left, right) {
        (Literal::Number(x), Literal::Number(y)) => x == y,
        (Literal::Str(x), Literal::Str(y)) => x == y,
        (Literal::Boolean(x), Literal::Boolean(y)) => x == y,
        (Literal::Undefined, Literal::Undefined) => true,
        _ => false,
    }
}
