//! Converts the cross-tree constraints of a feature model into feature model
//! structure.
//!
//! A cross-tree constraint is an arbitrary propositional formula over the
//! features of a model. This crate first brings such a formula into negation
//! normal form (NNF), see [`formula::normalize`], and then walks the
//! normalized formula to synthesize new abstract features, and-/or-groups and
//! binary requires/excludes constraints that together encode the formula, see
//! [`NnfConverter`]. The translation is purely syntax driven: it neither
//! evaluates formulas nor checks satisfiability, and it makes no attempt to
//! minimize the generated structure.
//!
//! The feature model itself is abstracted by the [`FeatureModel`] trait. A
//! ready to use implementation is provided by [`utils::FeatureTree`].
//!
//! ```
//! use feature_nnf::{convert, formula::Formula, utils::FeatureTree, Constraint, FeatureModel};
//!
//! let mut model = FeatureTree::new("Root");
//! let root = model.root();
//! model.add_feature(root, "A");
//! model.add_feature(root, "B");
//!
//! // A | -B
//! let constraint = Constraint::new(Formula::or([
//!     Formula::var("A"),
//!     Formula::not(Formula::var("B")),
//! ]));
//! let formulas = feature_nnf::preprocess(&constraint);
//!
//! let converted = convert(&model, &formulas, false).unwrap();
//! assert_eq!(converted.constraint_count(), 2);
//! assert_eq!(model.constraint_count(), 0);
//! ```

#![deny(missing_docs)]

pub mod complex;
mod constraint;
pub mod converter;
pub mod formula;
pub(crate) mod internal;
pub mod utils;

pub use complex::{ComplexConstraintConverter, ComplexConstraintError};
pub use constraint::{BinaryConstraint, Constraint};
pub use converter::{
    ConversionError, ConversionStrategy, ConverterOptions, NameGenerator, NnfConverter,
};
pub use formula::{Literal, Node};
pub use internal::id::{ConstraintId, FeatureId};

use std::sync::atomic::{AtomicU64, Ordering};

/// The way the children of a feature are grouped.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GroupType {
    /// Every mandatory child has to be selected together with the parent,
    /// optional children may be selected.
    #[default]
    And,

    /// At least one child has to be selected together with the parent.
    Or,

    /// Exactly one child has to be selected together with the parent.
    Alternative,
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupType::And => write!(f, "and"),
            GroupType::Or => write!(f, "or"),
            GroupType::Alternative => write!(f, "alternative"),
        }
    }
}

/// The mutation interface a feature model has to provide so that constraints
/// can be converted into structure.
///
/// Implementations must be cheap to reason about: [`Clone`] has to produce a
/// deep copy that can be mutated independently of the original, and the ids
/// of features and constraints must stay valid in the copy.
pub trait FeatureModel: Clone {
    /// Returns the root feature.
    fn root(&self) -> FeatureId;

    /// Makes `feature` the root of the model.
    fn set_root(&mut self, feature: FeatureId);

    /// Creates a new feature with the given name that is not yet attached to
    /// the tree. New features are concrete, optional and and-grouped.
    fn create_feature(&mut self, name: String) -> FeatureId;

    /// Appends `child` to the children of `parent`, detaching it from its
    /// previous parent if it had one.
    fn add_child(&mut self, parent: FeatureId, child: FeatureId);

    /// Marks `feature` as mandatory or optional.
    fn set_mandatory(&mut self, feature: FeatureId, mandatory: bool);

    /// Marks `feature` as abstract or concrete.
    fn set_abstract(&mut self, feature: FeatureId, is_abstract: bool);

    /// Returns how the children of `feature` are grouped.
    fn group_type(&self, feature: FeatureId) -> GroupType;

    /// Changes how the children of `feature` are grouped.
    fn set_group_type(&mut self, feature: FeatureId, group: GroupType);

    /// Returns true if the children of `feature` form an and-group.
    fn is_and(&self, feature: FeatureId) -> bool {
        self.group_type(feature) == GroupType::And
    }

    /// Returns the feature with the given name, if any.
    fn lookup_feature(&self, name: &str) -> Option<FeatureId>;

    /// Returns the number of features in the model.
    fn feature_count(&self) -> usize;

    /// Returns all cross-tree constraints of the model in insertion order.
    fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> + '_;

    /// Returns the number of cross-tree constraints of the model.
    fn constraint_count(&self) -> usize {
        self.constraints().count()
    }

    /// Adds a cross-tree constraint to the model.
    fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId;

    /// Removes a cross-tree constraint from the model and returns it.
    fn remove_constraint(&mut self, constraint: ConstraintId) -> Option<Constraint>;
}

/// Normalizes the formula of `constraint` into negation normal form.
///
/// The result is a list of alternatives that can be passed to [`convert`]. It
/// currently always contains exactly one element. `constraint` itself is not
/// modified.
pub fn preprocess(constraint: &Constraint) -> Vec<Node> {
    vec![formula::normalize(constraint.formula())]
}

/// Counter behind [`convert`]. Every call reserves the range of values it
/// can use up front, so concurrent calls never share a name.
static NEXT_NAME: AtomicU64 = AtomicU64::new(0);

/// Converts `formulas` into structure and constraints of a copy of `model`.
///
/// This is a shorthand for an [`NnfConverter`] with default options whose
/// names are drawn from a process-wide counter: no two calls of this function
/// ever produce the same name, so the result of one call can be converted
/// again. An [`NnfConverter`] owns its counter instead, names only stay unique
/// across the conversions performed by that converter.
pub fn convert<M: FeatureModel>(
    model: &M,
    formulas: &[Node],
    preserve: bool,
) -> Result<M, ConversionError> {
    let start = NEXT_NAME.fetch_add(names_needed(formulas), Ordering::Relaxed);
    NnfConverter::with_options(ConverterOptions::new().preserve(preserve))
        .with_names(NameGenerator::starting_at(start))
        .convert(model, formulas)
}

/// Returns an upper bound of the number of names needed to convert
/// `formulas`: one per literal and one per conjunction or disjunction.
fn names_needed(formulas: &[Node]) -> u64 {
    let mut stack: Vec<&Node> = formulas.iter().collect();
    let mut count = 0;
    while let Some(node) = stack.pop() {
        count += 1;
        if node.as_terminal().is_none() {
            stack.extend(node.children());
        }
    }
    count
}
