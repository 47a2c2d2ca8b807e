/// The reasons a list of formulas can be rejected by the
/// [`NnfConverter`](super::NnfConverter).
///
/// Every variant names the offending formula by its position in the list that
/// was passed to the converter and by its textual representation. The error
/// is always detected before the model is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// A negation wraps something other than a literal, the formula was not
    /// normalized.
    #[error("formula #{index} `{formula}` is not in negation normal form: `{node}` negates a compound formula")]
    NotInNegationNormalForm {
        /// Position of the formula in the input list.
        index: usize,
        /// The whole formula.
        formula: String,
        /// The offending negation.
        node: String,
    },

    /// A disjunction without operands is unsatisfiable and has no
    /// representation as an or-group.
    #[error("formula #{index} `{formula}` contains an empty disjunction")]
    EmptyDisjunction {
        /// Position of the formula in the input list.
        index: usize,
        /// The whole formula.
        formula: String,
    },

    /// The formula refers to a variable that is not a feature of the model.
    #[error("formula #{index} `{formula}` refers to `{variable}` which is not a feature of the model")]
    UnknownVariable {
        /// Position of the formula in the input list.
        index: usize,
        /// The whole formula.
        formula: String,
        /// The unknown variable.
        variable: String,
    },

    /// The formula is nested deeper than allowed by
    /// [`ConverterOptions::max_depth`](super::ConverterOptions::max_depth).
    #[error("formula #{index} `{formula}` is nested deeper than the limit of {limit}")]
    DepthExceeded {
        /// Position of the formula in the input list.
        index: usize,
        /// The whole formula.
        formula: String,
        /// The configured limit.
        limit: usize,
    },
}

impl ConversionError {
    /// Returns the position of the offending formula in the input list.
    pub fn formula_index(&self) -> usize {
        match self {
            ConversionError::NotInNegationNormalForm { index, .. }
            | ConversionError::EmptyDisjunction { index, .. }
            | ConversionError::UnknownVariable { index, .. }
            | ConversionError::DepthExceeded { index, .. } => *index,
        }
    }
}
