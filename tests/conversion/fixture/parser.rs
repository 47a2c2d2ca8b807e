use chumsky::{
    error, extra,
    prelude::{choice, end, just, recursive},
    text, IterParser, Parser,
};
use feature_nnf::formula::Formula;

/// Appends `rhs` to `lhs` if `lhs` already is a non-empty operator of the
/// same kind, so that `A & B & C` becomes a single ternary conjunction.
fn flatten(lhs: Formula, rhs: Formula, conjunction: bool) -> Formula {
    match (lhs, conjunction) {
        (Formula::And(mut operands), true) if !operands.is_empty() => {
            operands.push(rhs);
            Formula::And(operands)
        }
        (Formula::Or(mut operands), false) if !operands.is_empty() => {
            operands.push(rhs);
            Formula::Or(operands)
        }
        (lhs, true) => Formula::and([lhs, rhs]),
        (lhs, false) => Formula::or([lhs, rhs]),
    }
}

/// Parses a formula. E.g. `A & -(B | C)`, `A => B`, `A <=> B`,
/// `atleast2(A, B, C)`, `true`.
///
/// Binding from strongest to weakest: `-`, `&`, `|`, `=>` (right
/// associative), `<=>`. Parentheses group as usual.
pub(crate) fn formula<'src>()
-> impl Parser<'src, &'src str, Formula, extra::Err<error::Simple<'src, char>>> {
    recursive(|expr| {
        let operands = expr
            .clone()
            .separated_by(just(',').padded())
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just('(').padded(), just(')').padded());
        let count = text::int(10).map(|s: &str| s.parse::<usize>().unwrap());

        let at_least = just("atleast")
            .ignore_then(count.clone())
            .then(operands.clone())
            .map(|(k, operands)| Formula::at_least(k, operands));
        let at_most = just("atmost")
            .ignore_then(count.clone())
            .then(operands.clone())
            .map(|(k, operands)| Formula::at_most(k, operands));
        let choose = just("choose")
            .ignore_then(count)
            .then(operands)
            .map(|(k, operands)| Formula::choose(k, operands));

        let name = text::ident().map(|name: &str| match name {
            "true" => Formula::tautology(),
            "false" => Formula::contradiction(),
            _ => Formula::var(name),
        });

        let atom = choice((
            at_least,
            at_most,
            choose,
            name,
            expr.delimited_by(just('('), just(')')),
        ))
        .padded();

        let negation = just('-')
            .padded()
            .repeated()
            .foldr(atom, |_, operand| Formula::not(operand));

        let conjunction = negation.clone().foldl(
            just('&').padded().ignore_then(negation).repeated(),
            |lhs, rhs| flatten(lhs, rhs, true),
        );

        let disjunction = conjunction.clone().foldl(
            just('|').padded().ignore_then(conjunction).repeated(),
            |lhs, rhs| flatten(lhs, rhs, false),
        );

        let implication = disjunction
            .separated_by(just("=>").padded())
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|operands| {
                operands
                    .into_iter()
                    .rev()
                    .reduce(|rhs, lhs| Formula::implies(lhs, rhs))
                    .unwrap()
            });

        implication.clone().foldl(
            just("<=>").padded().ignore_then(implication).repeated(),
            Formula::equals,
        )
    })
}

pub(crate) fn document<'src>()
-> impl Parser<'src, &'src str, Formula, extra::Err<error::Simple<'src, char>>> {
    formula().then_ignore(end())
}
