use itertools::Itertools;

use super::{Formula, Literal, Node};

/// Rewrites `formula` into an equivalent [`Node`] that only uses literals,
/// negation, conjunction and disjunction.
///
/// Implications, equivalences and the cardinality operators are replaced by
/// their standard expansions. Negations are kept where they are, use
/// [`super::propagate_negation`] to push them down to the literals.
pub fn eliminate_symbols(formula: &Formula) -> Node {
    match formula {
        Formula::Var(name) => Node::Literal(Literal::positive(name.clone())),
        Formula::Not(operand) => Node::not(eliminate_symbols(operand)),
        Formula::And(operands) => Node::And(operands.iter().map(eliminate_symbols).collect()),
        Formula::Or(operands) => Node::Or(operands.iter().map(eliminate_symbols).collect()),
        Formula::Implies(lhs, rhs) => {
            Node::Or(vec![Node::not(eliminate_symbols(lhs)), eliminate_symbols(rhs)])
        }
        Formula::Equals(lhs, rhs) => {
            let lhs = eliminate_symbols(lhs);
            let rhs = eliminate_symbols(rhs);
            Node::And(vec![
                Node::Or(vec![Node::not(lhs.clone()), rhs.clone()]),
                Node::Or(vec![lhs, Node::not(rhs)]),
            ])
        }
        Formula::AtLeast(k, operands) => {
            at_least(*k, &operands.iter().map(eliminate_symbols).collect_vec())
        }
        Formula::AtMost(k, operands) => {
            at_most(*k, &operands.iter().map(eliminate_symbols).collect_vec())
        }
        Formula::Choose(k, operands) => {
            let operands = operands.iter().map(eliminate_symbols).collect_vec();
            Node::And(vec![at_least(*k, &operands), at_most(*k, &operands)])
        }
    }
}

/// At least `k` of `n` operands hold iff every subset of `n - k + 1` operands
/// contains one that holds.
fn at_least(k: usize, operands: &[Node]) -> Node {
    if k == 0 {
        return Node::tautology();
    }
    if k > operands.len() {
        return Node::contradiction();
    }

    let subset_size = operands.len() - k + 1;
    Node::And(
        operands
            .iter()
            .cloned()
            .combinations(subset_size)
            .map(Node::Or)
            .collect(),
    )
}

/// At most `k` operands hold iff every subset of `k + 1` operands contains one
/// that does not hold.
fn at_most(k: usize, operands: &[Node]) -> Node {
    if k >= operands.len() {
        return Node::tautology();
    }

    Node::And(
        operands
            .iter()
            .cloned()
            .combinations(k + 1)
            .map(|subset| Node::Or(subset.into_iter().map(Node::not).collect()))
            .collect(),
    )
}
