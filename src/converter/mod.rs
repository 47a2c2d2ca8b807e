//! Synthesizes feature model structure from formulas in negation normal form.
//!
//! Every conjunction or disjunction of a formula becomes an abstract,
//! mandatory feature whose children form an and-group or an or-group. Every
//! literal becomes an abstract, optional *terminal* feature that is tied to the
//! feature it refers to by a requires constraint (positive literal) or an
//! excludes constraint (negative literal). All synthesized features hang below
//! a single abstract *anchor* feature directly under the root:
//!
//! ```text
//! Root                      A | -B
//! └─ top
//!    └─ f0 (or)
//!       ├─ A_1              A_1 => A
//!       └─ B_2              B_2 => -B
//! ```

mod error;
mod naming;

pub use error::ConversionError;
pub use naming::NameGenerator;

use crate::{Constraint, FeatureId, FeatureModel, GroupType, Node};

/// A way of turning constraints into feature model structure.
pub trait ConversionStrategy {
    /// Turns `constraint` into the list of formulas that [`Self::convert`]
    /// expects. The constraint is not modified.
    fn preprocess(&self, constraint: &Constraint) -> Vec<Node>;

    /// Encodes `formulas` into a copy of `model` and returns the copy. `model`
    /// itself is never modified, also not when an error is returned.
    fn convert<M: FeatureModel>(&mut self, model: &M, formulas: &[Node])
        -> Result<M, ConversionError>;
}

/// Configuration of an [`NnfConverter`].
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    preserve: bool,
    root_name: String,
    anchor_name: String,
    group_prefix: String,
    max_depth: Option<usize>,
    validate_variables: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            preserve: false,
            root_name: String::from("NewRoot"),
            anchor_name: String::from("top"),
            group_prefix: String::from("f"),
            max_depth: None,
            validate_variables: true,
        }
    }
}

impl ConverterOptions {
    /// Constructs the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, a positive literal is tied to its feature in both
    /// directions (`T => V` and `V => T`) so that the generated structure
    /// does not change the set of valid configurations.
    pub fn preserve(self, preserve: bool) -> Self {
        Self { preserve, ..self }
    }

    /// Sets the name of the feature that becomes the new root when the
    /// current root is not and-grouped.
    pub fn root_name(self, name: impl Into<String>) -> Self {
        Self {
            root_name: name.into(),
            ..self
        }
    }

    /// Sets the name of the feature all synthesized structure hangs below.
    pub fn anchor_name(self, name: impl Into<String>) -> Self {
        Self {
            anchor_name: name.into(),
            ..self
        }
    }

    /// Sets the prefix of the names of features that represent conjunctions
    /// and disjunctions.
    pub fn group_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            group_prefix: prefix.into(),
            ..self
        }
    }

    /// Rejects formulas nested deeper than `max_depth` instead of recursing
    /// into them. A literal at the top level has depth 0.
    pub fn max_depth(self, max_depth: Option<usize>) -> Self {
        Self { max_depth, ..self }
    }

    /// Controls whether formulas that refer to unknown features are
    /// rejected.
    pub fn validate_variables(self, validate_variables: bool) -> Self {
        Self {
            validate_variables,
            ..self
        }
    }

    /// Returns true if positive literals are tied to their feature in both
    /// directions.
    pub fn preserves_semantics(&self) -> bool {
        self.preserve
    }
}

/// Converts formulas in negation normal form into feature model structure.
///
/// The converter owns the [`NameGenerator`] that names synthesized features,
/// so all conversions performed with the same converter produce distinct
/// names.
#[derive(Debug, Default, Clone)]
pub struct NnfConverter {
    options: ConverterOptions,
    names: NameGenerator,
}

impl NnfConverter {
    /// Constructs a converter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a converter with the given options.
    pub fn with_options(options: ConverterOptions) -> Self {
        Self {
            options,
            names: NameGenerator::new(),
        }
    }

    /// Replaces the name generator, e.g. to continue numbering where a
    /// previous converter stopped.
    pub fn with_names(self, names: NameGenerator) -> Self {
        Self { names, ..self }
    }

    /// Returns the options of this converter.
    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Returns the name generator of this converter.
    pub fn names(&self) -> &NameGenerator {
        &self.names
    }

    /// Checks every formula before anything is built. The traversal uses an
    /// explicit stack so that pathologically deep input cannot overflow the
    /// call stack here.
    fn validate<M: FeatureModel>(
        &self,
        model: &M,
        formulas: &[Node],
    ) -> Result<(), ConversionError> {
        for (index, formula) in formulas.iter().enumerate() {
            let mut stack = vec![(formula, 0usize)];
            while let Some((node, depth)) = stack.pop() {
                if let Some(limit) = self.options.max_depth {
                    if depth > limit {
                        return Err(ConversionError::DepthExceeded {
                            index,
                            formula: formula.to_string(),
                            limit,
                        });
                    }
                }

                match node {
                    Node::Literal(_) => {}
                    Node::Not(child) if matches!(child.as_ref(), Node::Literal(_)) => {}
                    Node::Not(_) => {
                        return Err(ConversionError::NotInNegationNormalForm {
                            index,
                            formula: formula.to_string(),
                            node: node.to_string(),
                        });
                    }
                    Node::Or(children) if children.is_empty() => {
                        return Err(ConversionError::EmptyDisjunction {
                            index,
                            formula: formula.to_string(),
                        });
                    }
                    Node::And(children) | Node::Or(children) => {
                        stack.extend(children.iter().rev().map(|child| (child, depth + 1)));
                    }
                }

                if let Some((literal, _)) = node.as_terminal() {
                    let known = model.lookup_feature(&literal.var).is_some();
                    if self.options.validate_variables && !known {
                        return Err(ConversionError::UnknownVariable {
                            index,
                            formula: formula.to_string(),
                            variable: literal.var.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Makes sure the root is and-grouped by inserting a new root above it if
    /// it is not.
    fn restructure_root<M: FeatureModel>(&self, model: &mut M) {
        let old_root = model.root();
        if model.is_and(old_root) {
            return;
        }

        let new_root = model.create_feature(self.options.root_name.clone());
        model.set_abstract(new_root, true);
        model.set_mandatory(new_root, true);
        model.set_group_type(new_root, GroupType::And);
        model.add_child(new_root, old_root);
        model.set_mandatory(old_root, true);
        model.set_root(new_root);

        tracing::debug!(
            "├─ root is {}-grouped, inserted `{}` above it",
            model.group_type(old_root),
            self.options.root_name
        );
    }

    /// Adds the feature below which all synthesized structure is placed.
    fn prepare_anchor<M: FeatureModel>(&self, model: &mut M) -> FeatureId {
        let anchor = model.create_feature(self.options.anchor_name.clone());
        model.add_child(model.root(), anchor);
        model.set_group_type(anchor, GroupType::And);
        model.set_abstract(anchor, true);
        model.set_mandatory(anchor, true);

        tracing::debug!("├─ added anchor `{}` below the root", self.options.anchor_name);
        anchor
    }

    /// Synthesizes a feature for every node in `nodes` and attaches it to
    /// `parent`, in order.
    fn build<M: FeatureModel>(
        &mut self,
        model: &mut M,
        parent: FeatureId,
        nodes: &[Node],
        depth: usize,
    ) {
        for node in nodes {
            if let Some((literal, positive)) = node.as_terminal() {
                let name = self.names.terminal_name(&literal.var);
                let feature = model.create_feature(name.clone());
                model.set_abstract(feature, true);
                model.set_mandatory(feature, false);
                model.add_child(parent, feature);

                if positive {
                    model.add_constraint(Constraint::requires(&name, &literal.var));
                    if self.options.preserve {
                        model.add_constraint(Constraint::requires(&literal.var, &name));
                    }
                } else {
                    model.add_constraint(Constraint::excludes(&name, &literal.var));
                }

                tracing::trace!(
                    "{:indent$}├─ terminal `{name}` for {}{}",
                    "",
                    if positive { "" } else { "-" },
                    literal.var,
                    indent = depth * 2
                );
                continue;
            }

            // An empty conjunction still gets its feature: a childless
            // mandatory and-feature is `true`, also below an or-group.
            let group = match node {
                Node::And(_) => GroupType::And,
                Node::Or(_) => GroupType::Or,
                Node::Literal(_) | Node::Not(_) => {
                    unreachable!("negations of compound formulas are rejected by validation")
                }
            };

            let name = self.names.group_name(&self.options.group_prefix);
            let feature = model.create_feature(name);
            model.set_abstract(feature, true);
            model.set_mandatory(feature, true);
            model.set_group_type(feature, group);

            tracing::trace!(
                "{:indent$}├─ {group}-group with {} children",
                "",
                node.children().len(),
                indent = depth * 2
            );

            self.build(model, feature, node.children(), depth + 1);
            model.add_child(parent, feature);
        }
    }
}

impl ConversionStrategy for NnfConverter {
    fn preprocess(&self, constraint: &Constraint) -> Vec<Node> {
        crate::preprocess(constraint)
    }

    fn convert<M: FeatureModel>(
        &mut self,
        model: &M,
        formulas: &[Node],
    ) -> Result<M, ConversionError> {
        tracing::info!("=== CONVERTING {} FORMULA(S)", formulas.len());
        self.validate(model, formulas)?;

        let mut result = model.clone();
        let features_before = result.feature_count();
        let constraints_before = result.constraint_count();
        let first_name = self.names.peek();

        self.restructure_root(&mut result);
        let anchor = self.prepare_anchor(&mut result);
        self.build(&mut result, anchor, formulas, 0);

        tracing::info!(
            "╘══ added {} feature(s) and {} constraint(s), names {}..{}",
            result.feature_count() - features_before,
            result.constraint_count() - constraints_before,
            first_name,
            self.names.peek()
        );

        Ok(result)
    }
}
