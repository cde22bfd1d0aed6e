use lazy_static::lazy_static;
use pest::Parser;
use pest::error::ErrorVariant;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use tracing::debug;

use crate::ast::{
    BinaryOp, DeclarationKind, Declarator, LogicalOp, Position, Span, Term, TermBuilder, UnaryOp,
};
use crate::parser::error::{INVALID_NUMBER_PREFIX, ParseError, convert_pest_error};

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or, Assoc::Left))            // `||`
        .op(Op::infix(Rule::and, Assoc::Left))           // `&&`
        .op(
            Op::infix(Rule::strict_eq, Assoc::Left) |
            Op::infix(Rule::strict_neq, Assoc::Left)
        )                                                // `===`, `!==`
        .op(
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left)
        )                                                // `<`, `<=`, `>`, `>=`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::rem, Assoc::Left)
        )                                                // `*`, `/`, `%`
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::not)) // `-`, `!`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/source.pest"]
pub struct SourceParser;

type PestError = pest::error::Error<Rule>;
type Lowered<'a> = Result<&'a Term<'a>, PestError>;

/// Parse Source text into a `Program` term allocated through `builder`.
///
/// The source is copied into the arena, so identifiers and string literals
/// borrow from it for as long as the terms live.
pub fn parse<'a>(builder: TermBuilder<'a>, source: &str) -> Result<&'a Term<'a>, ParseError> {
    let source: &'a str = builder.str(source);
    let program = Lowering { builder }
        .program(source)
        .map_err(|err| convert_pest_error(err, source))?;
    debug!(
        statements = program.statements().map_or(0, |body| body.len()),
        "Parsed program"
    );
    Ok(program)
}

fn position(pos: pest::Position<'_>) -> Position {
    let (line, column) = pos.line_col();
    Position {
        offset: pos.pos(),
        line,
        column,
    }
}

fn span_of(span: pest::Span<'_>) -> Option<Span> {
    Some(Span::new(position(span.start_pos()), position(span.end_pos())))
}

fn custom_error(span: pest::Span<'_>, message: String) -> PestError {
    PestError::new_from_span(ErrorVariant::CustomError { message }, span)
}

fn unexpected_rule(span: pest::Span<'_>, rule: Rule) -> PestError {
    custom_error(span, format!("unexpected {:?}", rule))
}

fn is_keyword(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_function | Rule::kw_return | Rule::kw_if | Rule::kw_else
    )
}

/// Inner pairs of a node, with keyword tokens filtered out.
struct Children<'i> {
    span: pest::Span<'i>,
    pairs: Pairs<'i, Rule>,
}

impl<'i> Children<'i> {
    fn of(pair: Pair<'i, Rule>) -> Self {
        Self {
            span: pair.as_span(),
            pairs: pair.into_inner(),
        }
    }

    fn peek_rule(&self) -> Option<Rule> {
        self.pairs
            .clone()
            .map(|pair| pair.as_rule())
            .find(|rule| !is_keyword(*rule))
    }

    fn expect(&mut self, what: &str) -> Result<Pair<'i, Rule>, PestError> {
        let span = self.span;
        self.next()
            .ok_or_else(|| custom_error(span, format!("missing {}", what)))
    }
}

impl<'i> Iterator for Children<'i> {
    type Item = Pair<'i, Rule>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.by_ref().find(|pair| !is_keyword(pair.as_rule()))
    }
}

struct Lowering<'a> {
    builder: TermBuilder<'a>,
}

impl<'a> Lowering<'a> {
    fn program(&self, source: &'a str) -> Lowered<'a> {
        let mut pairs = SourceParser::parse(Rule::main, source)?;
        let statements = match pairs.next() {
            Some(main) => main
                .into_inner()
                .filter(|pair| pair.as_rule() != Rule::EOI)
                .map(|pair| self.statement(pair))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(self.builder.program(&statements))
    }

    fn statement(&self, pair: Pair<'a, Rule>) -> Lowered<'a> {
        let b = self.builder;
        let span = span_of(pair.as_span());
        match pair.as_rule() {
            Rule::function_declaration => {
                let mut children = Children::of(pair);
                let name = children.expect("function name")?.as_str();
                let params = self.parameters(children.expect("parameter list")?);
                let body = self.statement(children.expect("function body")?)?;
                Ok(b.function_declaration(name, &params, body, span))
            }
            Rule::variable_declaration => {
                let mut children = Children::of(pair);
                let kind = match children.expect("declaration kind")?.as_str() {
                    "let" => DeclarationKind::Let,
                    _ => DeclarationKind::Const,
                };
                let declarators = children
                    .map(|declarator| self.declarator(declarator))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(b.declaration(kind, &declarators, span))
            }
            Rule::return_statement => {
                let argument = self.expression(Children::of(pair).expect("return value")?)?;
                Ok(b.return_statement(argument, span))
            }
            Rule::if_statement => {
                let mut children = Children::of(pair);
                let test = self.expression(children.expect("condition")?)?;
                let consequent = self.statement(children.expect("consequent block")?)?;
                let alternate = children
                    .next()
                    .map(|alternate| self.statement(alternate))
                    .transpose()?;
                Ok(b.if_statement(test, consequent, alternate, span))
            }
            Rule::block => {
                let body = Children::of(pair)
                    .map(|stmt| self.statement(stmt))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(b.block(&body, span))
            }
            Rule::expression_statement => {
                let expr = self.expression(Children::of(pair).expect("expression")?)?;
                Ok(b.expression_statement(expr, span))
            }
            rule => Err(unexpected_rule(pair.as_span(), rule)),
        }
    }

    fn declarator(&self, pair: Pair<'a, Rule>) -> Result<Declarator<'a>, PestError> {
        let mut children = Children::of(pair);
        let name = children.expect("declared name")?.as_str();
        let init = children.next().map(|init| self.expression(init)).transpose()?;
        Ok(Declarator { name, init })
    }

    fn parameters(&self, pair: Pair<'a, Rule>) -> Vec<&'a str> {
        pair.into_inner().map(|param| param.as_str()).collect()
    }

    fn expression(&self, pair: Pair<'a, Rule>) -> Lowered<'a> {
        let b = self.builder;
        let span = span_of(pair.as_span());
        match pair.as_rule() {
            Rule::arrow_function => {
                let mut children = Children::of(pair);
                let params = match children.expect("arrow parameters")?.into_inner().next() {
                    Some(list) if list.as_rule() == Rule::parameters => self.parameters(list),
                    Some(single) => vec![single.as_str()],
                    None => Vec::new(),
                };
                let body = children.expect("arrow body")?;
                let body = if body.as_rule() == Rule::block {
                    self.statement(body)?
                } else {
                    self.expression(body)?
                };
                Ok(b.arrow_function(&params, body, span))
            }
            Rule::conditional => {
                let mut children = Children::of(pair);
                let test = self.expression(children.expect("expression")?)?;
                match children.next() {
                    None => Ok(test),
                    Some(consequent) => {
                        let consequent = self.expression(consequent)?;
                        let alternate = self.expression(children.expect("alternative")?)?;
                        Ok(b.conditional(test, consequent, alternate, span))
                    }
                }
            }
            Rule::binary => self.binary(pair),
            Rule::call => {
                let start = position(pair.as_span().start_pos());
                let mut children = Children::of(pair);
                let mut callee = self.expression(children.expect("callee")?)?;
                for arguments in children {
                    let end = position(arguments.as_span().end_pos());
                    let arguments = arguments
                        .into_inner()
                        .map(|arg| self.expression(arg))
                        .collect::<Result<Vec<_>, _>>()?;
                    callee = b.call(callee, &arguments, Some(Span::new(start, end)));
                }
                Ok(callee)
            }
            Rule::function_expression => {
                let mut children = Children::of(pair);
                let name = match children.peek_rule() {
                    Some(Rule::identifier) => children.next().map(|name| name.as_str()),
                    _ => None,
                };
                let params = self.parameters(children.expect("parameter list")?);
                let body = self.statement(children.expect("function body")?)?;
                Ok(b.function_expression(name, &params, body, span))
            }
            Rule::number => {
                let text = pair.as_str();
                let value: f64 = text.parse().map_err(|_| {
                    custom_error(
                        pair.as_span(),
                        format!("{}{}", INVALID_NUMBER_PREFIX, text),
                    )
                })?;
                Ok(b.number(value, span))
            }
            Rule::string => Ok(b.string(&unescape(pair.as_str()), span)),
            Rule::boolean => Ok(b.boolean(pair.as_str() == "true", span)),
            Rule::identifier => Ok(b.identifier(pair.as_str(), span)),
            rule => Err(unexpected_rule(pair.as_span(), rule)),
        }
    }

    fn binary(&self, pair: Pair<'a, Rule>) -> Lowered<'a> {
        let b = self.builder;
        PRATT_PARSER
            .map_primary(|primary| self.expression(primary))
            .map_prefix(|op, rhs| {
                let rhs = rhs?;
                let span = Span::combine(span_of(op.as_span()), rhs.span);
                let op = match op.as_rule() {
                    Rule::neg => UnaryOp::Neg,
                    Rule::not => UnaryOp::Not,
                    rule => return Err(unexpected_rule(op.as_span(), rule)),
                };
                Ok(b.unary(op, rhs, span))
            })
            .map_infix(|lhs, op, rhs| {
                let (lhs, rhs) = (lhs?, rhs?);
                let span = Span::combine(lhs.span, rhs.span);
                let op = match op.as_rule() {
                    Rule::or => return Ok(b.logical(LogicalOp::Or, lhs, rhs, span)),
                    Rule::and => return Ok(b.logical(LogicalOp::And, lhs, rhs, span)),
                    Rule::add => BinaryOp::Add,
                    Rule::sub => BinaryOp::Sub,
                    Rule::mul => BinaryOp::Mul,
                    Rule::div => BinaryOp::Div,
                    Rule::rem => BinaryOp::Rem,
                    Rule::strict_eq => BinaryOp::StrictEq,
                    Rule::strict_neq => BinaryOp::StrictNeq,
                    Rule::lt => BinaryOp::Lt,
                    Rule::le => BinaryOp::Le,
                    Rule::gt => BinaryOp::Gt,
                    Rule::ge => BinaryOp::Ge,
                    rule => return Err(unexpected_rule(op.as_span(), rule)),
                };
                Ok(b.binary(op, lhs, rhs, span))
            })
            .parse(pair.into_inner())
    }
}

/// Strip the quotes of a string literal and resolve its escapes.
fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
