//! Converts all complex constraints of a feature model in one go.
//!
//! A constraint is *simple* if it already is a single literal or a binary
//! requires/excludes relation (see
//! [`Constraint::is_simple`](crate::Constraint::is_simple)). Every other
//! constraint is *complex*: it is normalized, handed to a
//! [`ConversionStrategy`] together with all other complex constraints, and
//! finally removed from the model because the generated structure now
//! encodes it.

use crate::{
    converter::{ConversionError, ConversionStrategy, NnfConverter},
    ConstraintId, FeatureModel, Node,
};

/// The error returned by [`ComplexConstraintConverter::convert`], naming the
/// constraint that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert constraint `{formula}`")]
pub struct ComplexConstraintError {
    /// The id of the offending constraint in the input model.
    pub constraint: ConstraintId,
    /// The offending constraint as written in the model.
    pub formula: String,
    /// Why the conversion failed.
    #[source]
    pub source: ConversionError,
}

/// Replaces the complex constraints of a model by structure.
#[derive(Debug, Default, Clone)]
pub struct ComplexConstraintConverter<S = NnfConverter> {
    strategy: S,
}

impl ComplexConstraintConverter {
    /// Constructs a converter that uses an [`NnfConverter`] with default
    /// options.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: ConversionStrategy> ComplexConstraintConverter<S> {
    /// Constructs a converter that uses the given strategy.
    pub fn with_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    /// Returns the strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Consumes the converter and returns its strategy.
    pub fn into_strategy(self) -> S {
        self.strategy
    }

    /// Returns the ids of all constraints of `model` that are not simple, in
    /// model order.
    pub fn complex_constraints<M: FeatureModel>(model: &M) -> Vec<ConstraintId> {
        model
            .constraints()
            .filter(|(_, constraint)| !constraint.is_simple())
            .map(|(id, _)| id)
            .collect()
    }

    /// Converts every complex constraint of `model` and returns the converted
    /// copy. Simple constraints are kept as they are. `model` is not
    /// modified.
    ///
    /// If `model` has no complex constraints an unchanged copy is returned.
    pub fn convert<M: FeatureModel>(&mut self, model: &M) -> Result<M, ComplexConstraintError> {
        let mut origins = Vec::new();
        let mut formulas: Vec<Node> = Vec::new();
        for (id, constraint) in model.constraints() {
            if constraint.is_simple() {
                continue;
            }
            for formula in self.strategy.preprocess(constraint) {
                tracing::trace!("├─ {constraint} normalized to {formula}");
                origins.push((id, constraint));
                formulas.push(formula);
            }
        }

        if formulas.is_empty() {
            tracing::debug!("╘══ no complex constraints");
            return Ok(model.clone());
        }

        tracing::debug!(
            "├─ converting {} of {} constraint(s)",
            formulas.len(),
            model.constraint_count()
        );

        let mut result = self
            .strategy
            .convert(model, &formulas)
            .map_err(|source| {
                let (constraint, formula) = origins[source.formula_index()];
                ComplexConstraintError {
                    constraint,
                    formula: formula.to_string(),
                    source,
                }
            })?;

        for (id, _) in &origins {
            // A constraint that normalizes into several formulas appears more
            // than once
            result.remove_constraint(*id);
        }

        Ok(result)
    }
}
