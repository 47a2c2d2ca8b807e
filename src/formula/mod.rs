//! Propositional formulas as they appear in the cross-tree constraints of a
//! feature model.
//!
//! Two representations are used. [`Formula`] is the wide representation that
//! supports every operator a constraint may use (implication, equivalence and
//! the cardinality operators included). [`Node`] is the narrow representation
//! that only knows literals, negation, conjunction and disjunction. A
//! [`Formula`] is turned into a [`Node`] by [`eliminate_symbols`] and a
//! [`Node`] is brought into negation normal form by [`propagate_negation`].

mod eliminate;
mod nnf;

use std::fmt::{self, Display, Formatter};

use indexmap::IndexSet;
use itertools::Itertools;

pub use eliminate::eliminate_symbols;
pub use nnf::{is_nnf, normalize, propagate_negation};

/// A propositional formula over named variables.
///
/// Constants are not represented explicitly: an empty conjunction is `true`
/// and an empty disjunction is `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Formula {
    /// A reference to a feature.
    Var(String),
    /// Negation.
    Not(Box<Formula>),
    /// N-ary conjunction.
    And(Vec<Formula>),
    /// N-ary disjunction.
    Or(Vec<Formula>),
    /// Material implication `lhs => rhs`.
    Implies(Box<Formula>, Box<Formula>),
    /// Equivalence `lhs <=> rhs`.
    Equals(Box<Formula>, Box<Formula>),
    /// At least `k` of the operands hold.
    AtLeast(usize, Vec<Formula>),
    /// At most `k` of the operands hold.
    AtMost(usize, Vec<Formula>),
    /// Exactly `k` of the operands hold.
    Choose(usize, Vec<Formula>),
}

impl Formula {
    /// Constructs a variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        Formula::Var(name.into())
    }

    /// Constructs the negation of `operand`.
    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Formula) -> Self {
        Formula::Not(Box::new(operand))
    }

    /// Constructs a conjunction of all `operands`.
    pub fn and(operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::And(operands.into_iter().collect())
    }

    /// Constructs a disjunction of all `operands`.
    pub fn or(operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::Or(operands.into_iter().collect())
    }

    /// Constructs `lhs => rhs`.
    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Formula::Implies(Box::new(lhs), Box::new(rhs))
    }

    /// Constructs `lhs <=> rhs`.
    pub fn equals(lhs: Formula, rhs: Formula) -> Self {
        Formula::Equals(Box::new(lhs), Box::new(rhs))
    }

    /// Constructs a formula that holds if at least `k` operands hold.
    pub fn at_least(k: usize, operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::AtLeast(k, operands.into_iter().collect())
    }

    /// Constructs a formula that holds if at most `k` operands hold.
    pub fn at_most(k: usize, operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::AtMost(k, operands.into_iter().collect())
    }

    /// Constructs a formula that holds if exactly `k` operands hold.
    pub fn choose(k: usize, operands: impl IntoIterator<Item = Formula>) -> Self {
        Formula::Choose(k, operands.into_iter().collect())
    }

    /// The constant `true`.
    pub fn tautology() -> Self {
        Formula::And(Vec::new())
    }

    /// The constant `false`.
    pub fn contradiction() -> Self {
        Formula::Or(Vec::new())
    }

    /// Returns the direct operands of this formula in order.
    pub fn operands(&self) -> Vec<&Formula> {
        match self {
            Formula::Var(_) => Vec::new(),
            Formula::Not(operand) => vec![operand.as_ref()],
            Formula::Implies(lhs, rhs) | Formula::Equals(lhs, rhs) => {
                vec![lhs.as_ref(), rhs.as_ref()]
            }
            Formula::And(operands)
            | Formula::Or(operands)
            | Formula::AtLeast(_, operands)
            | Formula::AtMost(_, operands)
            | Formula::Choose(_, operands) => operands.iter().collect(),
        }
    }

    /// Returns the names of all variables in this formula, in order of first
    /// occurrence and without duplicates.
    pub fn variables(&self) -> Vec<&str> {
        let mut variables = IndexSet::new();
        self.collect_variables(&mut variables);
        variables.into_iter().collect()
    }

    fn collect_variables<'a>(&'a self, variables: &mut IndexSet<&'a str>) {
        match self {
            Formula::Var(name) => {
                variables.insert(name.as_str());
            }
            _ => {
                for operand in self.operands() {
                    operand.collect_variables(variables);
                }
            }
        }
    }

    /// Evaluates the formula, looking up the value of every variable with
    /// `assignment`.
    pub fn evaluate<F: Fn(&str) -> bool>(&self, assignment: &F) -> bool {
        let count_true = |operands: &[Formula]| {
            operands
                .iter()
                .filter(|operand| operand.evaluate(assignment))
                .count()
        };

        match self {
            Formula::Var(name) => assignment(name),
            Formula::Not(operand) => !operand.evaluate(assignment),
            Formula::And(operands) => operands.iter().all(|operand| operand.evaluate(assignment)),
            Formula::Or(operands) => operands.iter().any(|operand| operand.evaluate(assignment)),
            Formula::Implies(lhs, rhs) => !lhs.evaluate(assignment) || rhs.evaluate(assignment),
            Formula::Equals(lhs, rhs) => lhs.evaluate(assignment) == rhs.evaluate(assignment),
            Formula::AtLeast(k, operands) => count_true(operands) >= *k,
            Formula::AtMost(k, operands) => count_true(operands) <= *k,
            Formula::Choose(k, operands) => count_true(operands) == *k,
        }
    }

    fn is_atomic(&self) -> bool {
        match self {
            Formula::Var(_)
            | Formula::Not(_)
            | Formula::AtLeast(..)
            | Formula::AtMost(..)
            | Formula::Choose(..) => true,
            Formula::And(operands) | Formula::Or(operands) => match operands.as_slice() {
                [] => true,
                [operand] => operand.is_atomic(),
                _ => false,
            },
            Formula::Implies(..) | Formula::Equals(..) => false,
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let operand = |formula: &Formula| {
            if formula.is_atomic() {
                formula.to_string()
            } else {
                format!("({formula})")
            }
        };

        match self {
            Formula::Var(name) => write!(f, "{name}"),
            Formula::Not(inner) => write!(f, "-{}", operand(inner)),
            Formula::And(operands) if operands.is_empty() => write!(f, "true"),
            Formula::Or(operands) if operands.is_empty() => write!(f, "false"),
            Formula::And(operands) | Formula::Or(operands) if operands.len() == 1 => {
                write!(f, "{}", operands[0])
            }
            Formula::And(operands) => write!(f, "{}", operands.iter().map(operand).format(" & ")),
            Formula::Or(operands) => write!(f, "{}", operands.iter().map(operand).format(" | ")),
            Formula::Implies(lhs, rhs) => write!(f, "{} => {}", operand(lhs), operand(rhs)),
            Formula::Equals(lhs, rhs) => write!(f, "{} <=> {}", operand(lhs), operand(rhs)),
            Formula::AtLeast(k, operands) => {
                write!(f, "atleast{k}({})", operands.iter().format(", "))
            }
            Formula::AtMost(k, operands) => {
                write!(f, "atmost{k}({})", operands.iter().format(", "))
            }
            Formula::Choose(k, operands) => {
                write!(f, "choose{k}({})", operands.iter().format(", "))
            }
        }
    }
}

/// A variable together with its polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    /// The name of the referenced feature.
    pub var: String,
    /// True if the literal is the variable itself, false if it is its
    /// complement.
    pub positive: bool,
}

impl Literal {
    /// Constructs a positive literal.
    pub fn positive(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            positive: true,
        }
    }

    /// Constructs a negative literal.
    pub fn negative(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            positive: false,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.var)
        } else {
            write!(f, "-{}", self.var)
        }
    }
}

/// A formula restricted to literals, negation, conjunction and disjunction.
///
/// This is the representation the structure synthesizer consumes. After
/// [`propagate_negation`] a `Not` only ever wraps a `Literal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Node {
    /// A (possibly negative) variable reference.
    Literal(Literal),
    /// Negation.
    Not(Box<Node>),
    /// N-ary conjunction, children keep their order.
    And(Vec<Node>),
    /// N-ary disjunction, children keep their order.
    Or(Vec<Node>),
}

impl Node {
    /// Constructs a positive literal node.
    pub fn var(name: impl Into<String>) -> Self {
        Node::Literal(Literal::positive(name))
    }

    /// Wraps `operand` in a negation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Node) -> Self {
        Node::Not(Box::new(operand))
    }

    /// Constructs a conjunction of all `operands`.
    pub fn and(operands: impl IntoIterator<Item = Node>) -> Self {
        Node::And(operands.into_iter().collect())
    }

    /// Constructs a disjunction of all `operands`.
    pub fn or(operands: impl IntoIterator<Item = Node>) -> Self {
        Node::Or(operands.into_iter().collect())
    }

    /// The constant `true`.
    pub fn tautology() -> Self {
        Node::And(Vec::new())
    }

    /// The constant `false`.
    pub fn contradiction() -> Self {
        Node::Or(Vec::new())
    }

    /// Returns the children of this node in order.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Literal(_) => &[],
            Node::Not(child) => std::slice::from_ref(child.as_ref()),
            Node::And(children) | Node::Or(children) => children,
        }
    }

    /// If this node is a literal or a negated literal, returns the literal
    /// together with its effective polarity.
    pub fn as_terminal(&self) -> Option<(&Literal, bool)> {
        match self {
            Node::Literal(literal) => Some((literal, literal.positive)),
            Node::Not(child) => match child.as_ref() {
                Node::Literal(literal) => Some((literal, !literal.positive)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the names of all variables in this node, in order of first
    /// occurrence and without duplicates.
    pub fn variables(&self) -> Vec<&str> {
        let mut variables = IndexSet::new();
        self.collect_variables(&mut variables);
        variables.into_iter().collect()
    }

    fn collect_variables<'a>(&'a self, variables: &mut IndexSet<&'a str>) {
        match self {
            Node::Literal(literal) => {
                variables.insert(literal.var.as_str());
            }
            _ => {
                for child in self.children() {
                    child.collect_variables(variables);
                }
            }
        }
    }

    /// Returns the nesting depth of this node. A literal has depth 0.
    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Evaluates the node, looking up the value of every variable with
    /// `assignment`.
    pub fn evaluate<F: Fn(&str) -> bool>(&self, assignment: &F) -> bool {
        match self {
            Node::Literal(literal) => assignment(&literal.var) == literal.positive,
            Node::Not(child) => !child.evaluate(assignment),
            Node::And(children) => children.iter().all(|child| child.evaluate(assignment)),
            Node::Or(children) => children.iter().any(|child| child.evaluate(assignment)),
        }
    }
}

impl Node {
    /// Returns true if the rendering of this node needs parentheses when it
    /// is the operand of another operator.
    fn is_compound(&self) -> bool {
        match self {
            Node::And(children) | Node::Or(children) => match children.as_slice() {
                [] => false,
                [child] => child.is_compound(),
                _ => true,
            },
            Node::Literal(_) | Node::Not(_) => false,
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let operand = |node: &Node| {
            if node.is_compound() {
                format!("({node})")
            } else {
                node.to_string()
            }
        };

        match self {
            Node::Literal(literal) => write!(f, "{literal}"),
            Node::Not(child) => write!(f, "-{}", operand(child)),
            Node::And(children) if children.is_empty() => write!(f, "true"),
            Node::Or(children) if children.is_empty() => write!(f, "false"),
            // A single operand is rendered as the operand itself
            Node::And(children) | Node::Or(children) if children.len() == 1 => {
                write!(f, "{}", children[0])
            }
            Node::And(children) => write!(f, "{}", children.iter().map(operand).format(" & ")),
            Node::Or(children) => write!(f, "{}", children.iter().map(operand).format(" | ")),
        }
    }
}

impl From<Literal> for Node {
    fn from(value: Literal) -> Self {
        Node::Literal(value)
    }
}

impl From<Literal> for Formula {
    fn from(value: Literal) -> Self {
        if value.positive {
            Formula::Var(value.var)
        } else {
            Formula::not(Formula::Var(value.var))
        }
    }
}

impl From<Node> for Formula {
    fn from(value: Node) -> Self {
        match value {
            Node::Literal(literal) => literal.into(),
            Node::Not(child) => Formula::not((*child).into()),
            Node::And(children) => Formula::And(children.into_iter().map(Into::into).collect()),
            Node::Or(children) => Formula::Or(children.into_iter().map(Into::into).collect()),
        }
    }
}
