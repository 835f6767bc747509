//! Traits for shape inference and the errors it reports.

use std::fmt;

use crate::shape::Shape;

/// Rank requirement which an input failed to satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankConstraint {
    Exactly(usize),
    AtLeast(usize),
}

impl fmt::Display for RankConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(rank) => write!(f, "{}", rank),
            Self::AtLeast(rank) => write!(f, "at least {}", rank),
        }
    }
}

/// Broad category of an [`InferShapesError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operator attribute has an invalid value, is missing or has the
    /// wrong type.
    AttributeInvariant,

    /// An input's known rank conflicts with the rank the operator requires.
    RankMismatch,

    /// Input shapes are individually well-formed but inconsistent with each
    /// other or with the operator's attributes.
    StructuralMismatch,

    /// Too many or too few inputs were provided.
    InputCount,

    /// The operator is not registered.
    Registry,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InferShapesError {
    /// Too many or too few inputs were provided for this operator.
    #[error("expected {expected} inputs but got {actual}")]
    IncorrectInputCount { expected: usize, actual: usize },

    /// An operator attribute has an invalid value.
    #[error("invalid value for attribute \"{name}\": {reason}")]
    InvalidAttr { name: String, reason: String },

    /// A required attribute was not provided.
    #[error("required attribute \"{name}\" is missing")]
    MissingAttr { name: String },

    /// An attribute was provided with a different type than declared.
    #[error("attribute \"{name}\" should be of type {expected}")]
    AttrType { name: String, expected: &'static str },

    /// An input's rank does not match that expected by the operator.
    #[error("input {input} must have rank {expected} but has rank {actual}")]
    IncorrectRank {
        input: usize,
        expected: RankConstraint,
        actual: usize,
    },

    /// The rank of encoded ragged values is inconsistent with the input and
    /// output ragged ranks.
    #[error(
        "encoded ragged input must have rank {expected} (output_ragged_rank - input_ragged_rank) but has rank {actual}"
    )]
    EncodedRankMismatch { expected: i64, actual: usize },

    /// A row-splits input has a length which cannot describe any rows.
    #[error("row splits input {input} must have at least one element but has length {len}")]
    InvalidRowSplits { input: usize, len: u64 },

    /// The number of elements in a shape does not fit in a `u64`.
    #[error("number of elements in shape {shape} overflows")]
    DimensionOverflow { shape: String },

    /// No operator with the given name is registered.
    #[error("operator \"{name}\" is not registered")]
    UnknownOp { name: String },
}

impl InferShapesError {
    /// Create an [`InferShapesError::InvalidAttr`] error.
    pub fn invalid_attr(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttr {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Return the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAttr { .. } | Self::MissingAttr { .. } | Self::AttrType { .. } => {
                ErrorKind::AttributeInvariant
            }
            Self::IncorrectRank { .. } => ErrorKind::RankMismatch,
            Self::EncodedRankMismatch { .. }
            | Self::InvalidRowSplits { .. }
            | Self::DimensionOverflow { .. } => ErrorKind::StructuralMismatch,
            Self::IncorrectInputCount { .. } => ErrorKind::InputCount,
            Self::UnknownOp { .. } => ErrorKind::Registry,
        }
    }

    /// Attach the input index to a rank error produced by a [`Shape`]
    /// method, which does not know which input it was called on.
    pub(crate) fn for_input(self, index: usize) -> Self {
        match self {
            Self::IncorrectRank {
                expected, actual, ..
            } => Self::IncorrectRank {
                input: index,
                expected,
                actual,
            },
            other => other,
        }
    }
}

/// Infer the shapes of an operator's outputs given the shapes of its inputs.
///
/// Implementations are pure: they read the operator's attributes and the
/// borrowed input shapes and either return a shape for every output, or an
/// error. No partial results are produced.
pub trait InferShapes {
    /// Number of inputs the operator takes, given its attributes.
    fn input_count(&self) -> usize;

    /// Number of outputs the operator produces, given its attributes.
    fn output_count(&self) -> usize;

    /// Infer the shapes of the operator's outputs.
    fn infer_shapes(&self, inputs: &[Shape]) -> Result<Vec<Shape>, InferShapesError>;
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, InferShapesError, RankConstraint};

    #[test]
    fn test_error_messages() {
        let err = InferShapesError::IncorrectRank {
            input: 2,
            expected: RankConstraint::Exactly(1),
            actual: 3,
        };
        assert_eq!(err.to_string(), "input 2 must have rank 1 but has rank 3");

        let err = InferShapesError::IncorrectRank {
            input: 0,
            expected: RankConstraint::AtLeast(1),
            actual: 0,
        };
        assert_eq!(
            err.to_string(),
            "input 0 must have rank at least 1 but has rank 0"
        );

        let err = InferShapesError::invalid_attr("RAGGED_RANK", "ragged rank must be positive");
        assert_eq!(
            err.to_string(),
            "invalid value for attribute \"RAGGED_RANK\": ragged rank must be positive"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            InferShapesError::invalid_attr("RAGGED_RANK", "").kind(),
            ErrorKind::AttributeInvariant
        );
        assert_eq!(
            InferShapesError::EncodedRankMismatch {
                expected: 1,
                actual: 0
            }
            .kind(),
            ErrorKind::StructuralMismatch
        );
        assert_eq!(
            InferShapesError::IncorrectInputCount {
                expected: 3,
                actual: 2
            }
            .kind(),
            ErrorKind::InputCount
        );
    }

    #[test]
    fn test_for_input() {
        let err = InferShapesError::IncorrectRank {
            input: 0,
            expected: RankConstraint::Exactly(1),
            actual: 2,
        }
        .for_input(4);
        assert_eq!(
            err,
            InferShapesError::IncorrectRank {
                input: 4,
                expected: RankConstraint::Exactly(1),
                actual: 2,
            }
        );
    }
}
