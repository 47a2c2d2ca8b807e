use std::fmt::{Display, Formatter};

use crate::{formula::Formula, Node};

/// A cross-tree constraint of a feature model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Constraint {
    formula: Formula,
}

/// A constraint that already has the shape of a binary requires or excludes
/// relation between two features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryConstraint<'a> {
    /// Selecting the first feature requires the second one.
    Requires(&'a str, &'a str),
    /// The two features cannot be selected together.
    Excludes(&'a str, &'a str),
}

impl Constraint {
    /// Wraps `formula` in a constraint.
    pub fn new(formula: Formula) -> Self {
        Self { formula }
    }

    /// Constructs `requires(from, to)`, i.e. `from => to`.
    pub fn requires(from: &str, to: &str) -> Self {
        Self::new(Formula::implies(Formula::var(from), Formula::var(to)))
    }

    /// Constructs `excludes(from, to)`, i.e. `from => -to`.
    pub fn excludes(from: &str, to: &str) -> Self {
        Self::new(Formula::implies(
            Formula::var(from),
            Formula::not(Formula::var(to)),
        ))
    }

    /// Returns the formula of this constraint.
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Consumes the constraint and returns its formula.
    pub fn into_formula(self) -> Formula {
        self.formula
    }

    /// Recognizes the shapes `A => B`, `A => -B`, `-A | B`, `-A | -B` and
    /// `-(A & B)` and returns the binary relation they express.
    pub fn as_binary(&self) -> Option<BinaryConstraint<'_>> {
        use Formula::{And, Implies, Not, Or, Var};

        match &self.formula {
            Implies(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Var(a), Var(b)) => Some(BinaryConstraint::Requires(a, b)),
                (Var(a), Not(b)) => match b.as_ref() {
                    Var(b) => Some(BinaryConstraint::Excludes(a, b)),
                    _ => None,
                },
                _ => None,
            },
            Or(operands) => match operands.as_slice() {
                [Not(a), b] => match (a.as_ref(), b) {
                    (Var(a), Var(b)) => Some(BinaryConstraint::Requires(a, b)),
                    (Var(a), Not(b)) => match b.as_ref() {
                        Var(b) => Some(BinaryConstraint::Excludes(a, b)),
                        _ => None,
                    },
                    _ => None,
                },
                _ => None,
            },
            Not(inner) => match inner.as_ref() {
                And(operands) => match operands.as_slice() {
                    [Var(a), Var(b)] => Some(BinaryConstraint::Excludes(a, b)),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns true if the constraint is a single literal or a binary
    /// requires/excludes relation. Such constraints need no conversion.
    pub fn is_simple(&self) -> bool {
        let is_literal = match &self.formula {
            Formula::Var(_) => true,
            Formula::Not(inner) => matches!(inner.as_ref(), Formula::Var(_)),
            _ => false,
        };
        is_literal || self.as_binary().is_some()
    }
}

impl From<Formula> for Constraint {
    fn from(value: Formula) -> Self {
        Self::new(value)
    }
}

impl From<Node> for Constraint {
    fn from(value: Node) -> Self {
        Self::new(value.into())
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formula)
    }
}

impl Display for BinaryConstraint<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryConstraint::Requires(a, b) => write!(f, "{a} requires {b}"),
            BinaryConstraint::Excludes(a, b) => write!(f, "{a} excludes {b}"),
        }
    }
}
