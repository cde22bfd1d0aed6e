//! Display-oriented rewrite collapsing closures into marker identifiers.

use hashbrown::HashMap;

use crate::ast::{ANONYMOUS_MARKER, Declarator, Term, TermBuilder, TermKind};

/// Copy `term`, replacing every closure by an identifier carrying its name,
/// or [`ANONYMOUS_MARKER`] when it has none.
///
/// The input is never modified. Closures are the only way a term can refer
/// back to itself, so the copy is always a finite tree.
pub fn treeify<'a>(builder: TermBuilder<'a>, term: &'a Term<'a>) -> &'a Term<'a> {
    Treeifier {
        builder,
        memo: HashMap::new(),
    }
    .term(term)
}

struct Treeifier<'a> {
    builder: TermBuilder<'a>,
    memo: HashMap<*const Term<'a>, &'a Term<'a>>,
}

impl<'a> Treeifier<'a> {
    fn terms(&mut self, terms: &'a [&'a Term<'a>]) -> Vec<&'a Term<'a>> {
        terms.iter().map(|term| self.term(term)).collect()
    }

    fn term(&mut self, term: &'a Term<'a>) -> &'a Term<'a> {
        if let Some(&done) = self.memo.get(&term.as_ptr()) {
            return done;
        }

        let b = self.builder;
        let span = term.span;
        let result = match &term.kind {
            TermKind::Closure(closure) => {
                b.identifier(closure.name.unwrap_or(ANONYMOUS_MARKER), span)
            }
            TermKind::Identifier(name) => b.identifier(name, span),
            TermKind::Literal(literal) => b.literal(*literal, span),
            TermKind::Program(body) => b.program(&self.terms(body)),
            TermKind::Block(body) => b.block(&self.terms(body), span),
            TermKind::BlockExpression(body) => b.block_expression(&self.terms(body), span),
            TermKind::ExpressionStatement(expr) => b.expression_statement(self.term(expr), span),
            TermKind::VariableDeclaration { kind, declarators } => {
                let declarators: Vec<Declarator<'a>> = declarators
                    .iter()
                    .map(|declarator| Declarator {
                        name: declarator.name,
                        init: declarator.init.map(|init| self.term(init)),
                    })
                    .collect();
                b.declaration(*kind, &declarators, span)
            }
            TermKind::FunctionDeclaration { name, params, body } => {
                b.function_declaration(name, params, self.term(body), span)
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
                let callee = self.term(callee);
                b.call(callee, &self.terms(arguments), span)
            }
        };

        self.memo.insert(term.as_ptr(), result);
        result
    }
}
