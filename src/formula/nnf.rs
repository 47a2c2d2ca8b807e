use super::{eliminate_symbols, Formula, Node};

/// Brings `formula` into negation normal form.
///
/// This first eliminates every operator other than negation, conjunction and
/// disjunction and then pushes the negations down to the literals. The input
/// is left untouched, the result is a freshly allocated tree.
pub fn normalize(formula: &Formula) -> Node {
    propagate_negation(eliminate_symbols(formula))
}

/// Pushes all negations in `node` down to the literals using De Morgan's laws.
///
/// Double negations cancel out, a negated conjunction becomes a disjunction of
/// negated children (and vice versa) and a literal under an odd number of
/// negations ends up wrapped in a single `Not`. The arity and the order of
/// the children of every conjunction and disjunction are preserved.
pub fn propagate_negation(node: Node) -> Node {
    propagate(node, false)
}

fn propagate(node: Node, negated: bool) -> Node {
    match node {
        Node::Not(child) => propagate(*child, !negated),
        Node::And(children) => {
            let children = children
                .into_iter()
                .map(|child| propagate(child, negated))
                .collect();
            if negated {
                Node::Or(children)
            } else {
                Node::And(children)
            }
        }
        Node::Or(children) => {
            let children = children
                .into_iter()
                .map(|child| propagate(child, negated))
                .collect();
            if negated {
                Node::And(children)
            } else {
                Node::Or(children)
            }
        }
        Node::Literal(literal) if negated => Node::not(Node::Literal(literal)),
        literal @ Node::Literal(_) => literal,
    }
}

/// Returns true if every negation in `node` applies directly to a literal.
pub fn is_nnf(node: &Node) -> bool {
    match node {
        Node::Literal(_) => true,
        Node::Not(child) => matches!(child.as_ref(), Node::Literal(_)),
        Node::And(children) | Node::Or(children) => children.iter().all(is_nnf),
    }
}
