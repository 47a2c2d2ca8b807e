// A tiny textual notation for formulas so that the conversion tests can be
// written the way constraints are written in feature modeling tools:
//
//   A & -(B | C)         conjunction, negation, disjunction
//   A => B, A <=> B      implication, equivalence
//   atleast2(A, B, C)    cardinality, also `atmostK` and `chooseK`
//   true, false          constants
//
// Every identifier that is not a keyword refers to a feature.

pub mod parser;

use chumsky::Parser;
use feature_nnf::{
    formula::{normalize, Formula},
    utils::FeatureTree,
    Constraint, ConversionError, ConversionStrategy, ConverterOptions, FeatureModel, Node,
    NnfConverter,
};

/// Parses `s` into a [`Formula`], panicking on malformed input.
pub fn formula(s: &str) -> Formula {
    match parser::document().parse(s).into_result() {
        Ok(formula) => formula,
        Err(errors) => panic!("cannot parse `{s}`: {errors:?}"),
    }
}

/// Parses `s` and brings it into negation normal form.
pub fn node(s: &str) -> Node {
    normalize(&formula(s))
}

/// Constructs a model with an and-grouped root `Root` and the given optional
/// features directly below it.
pub fn model(features: &[&str]) -> FeatureTree {
    let mut tree = FeatureTree::new("Root");
    let root = tree.root();
    for feature in features {
        tree.add_feature(root, *feature);
    }
    tree
}

/// Like [`model`] but also adds the given constraints.
pub fn model_with_constraints(features: &[&str], constraints: &[&str]) -> FeatureTree {
    let mut tree = model(features);
    for constraint in constraints {
        tree.add_constraint(Constraint::new(formula(constraint)));
    }
    tree
}

/// Renders the constraints of `tree`, one per line.
pub fn constraints(tree: &FeatureTree) -> Vec<String> {
    tree.constraints().map(|(_, c)| c.to_string()).collect()
}

/// Converts with a fresh [`NnfConverter`], so names start at zero and the
/// expected output does not depend on other tests.
pub fn convert(
    model: &FeatureTree,
    formulas: &[Node],
    preserve: bool,
) -> Result<FeatureTree, ConversionError> {
    NnfConverter::with_options(ConverterOptions::new().preserve(preserve)).convert(model, formulas)
}
