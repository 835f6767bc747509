//! Shape inference for ragged tensor conversion operators.
//!
//! A ragged tensor with ragged rank `R` is passed to these operators as `R`
//! row-splits vectors, from outermost to innermost, followed by a flat values
//! tensor. The leading dimension of the values tensor is the total number of
//! ragged elements and any trailing dimensions are the dense shape of each
//! element.

use smallvec::SmallVec;

use crate::infer_shapes::InferShapesError;
use crate::shape::Shape;

mod from_variant;
mod to_sparse;
mod to_variant;

pub use from_variant::RaggedTensorFromVariant;
pub use to_sparse::RaggedTensorToSparse;
pub use to_variant::RaggedTensorToVariant;

/// Largest supported ragged rank.
///
/// Each ragged dimension is a separate row-splits input or output, so this
/// bounds the number of shapes a single operator passes in or out.
pub(crate) const MAX_RAGGED_RANK: i64 = 1 << 16;

/// Check a ragged rank attribute and convert it to a count of row-splits
/// tensors.
///
/// The rank must be positive, or non-negative if `allow_zero` is true, and
/// at most [`MAX_RAGGED_RANK`].
pub(crate) fn check_ragged_rank(
    name: &str,
    ragged_rank: i64,
    allow_zero: bool,
) -> Result<usize, InferShapesError> {
    if allow_zero && ragged_rank < 0 {
        return Err(InferShapesError::invalid_attr(
            name,
            format!("ragged rank must be non-negative, got {}", ragged_rank),
        ));
    }
    if !allow_zero && ragged_rank < 1 {
        return Err(InferShapesError::invalid_attr(
            name,
            format!("ragged rank must be positive, got {}", ragged_rank),
        ));
    }
    if ragged_rank > MAX_RAGGED_RANK {
        return Err(InferShapesError::invalid_attr(
            name,
            format!(
                "ragged rank must be at most {}, got {}",
                MAX_RAGGED_RANK, ragged_rank
            ),
        ));
    }
    usize::try_from(ragged_rank)
        .map_err(|_| InferShapesError::invalid_attr(name, "ragged rank is too large"))
}

/// Number of inputs for an operator taking `ragged_rank` row-splits plus a
/// values tensor.
///
/// Invalid ragged ranks count as zero row-splits. They are rejected when
/// shapes are inferred.
pub(crate) fn ragged_input_count(ragged_rank: i64) -> usize {
    usize::try_from(ragged_rank).unwrap_or(0) + 1
}

pub(crate) fn check_input_count(inputs: &[Shape], expected: usize) -> Result<(), InferShapesError> {
    if inputs.len() != expected {
        return Err(InferShapesError::IncorrectInputCount {
            expected,
            actual: inputs.len(),
        });
    }
    Ok(())
}

/// Components of a ragged tensor input after rank checks.
pub(crate) struct RaggedComponents {
    /// Row-splits shapes, each refined to rank 1.
    pub nested_splits: SmallVec<[Shape; 4]>,

    /// Values shape. This has unknown rank or rank >= 1.
    pub values: Shape,
}

/// Check the ranks of the `ragged_rank` row-splits inputs and the values
/// input which follows them.
///
/// Inputs with unknown rank are accepted. The values are checked first,
/// then each row-splits input in order.
pub(crate) fn check_ragged_components(
    inputs: &[Shape],
    ragged_rank: usize,
) -> Result<RaggedComponents, InferShapesError> {
    check_input_count(inputs, ragged_rank + 1)?;

    let values = inputs[ragged_rank]
        .with_rank_at_least(1)
        .map_err(|err| err.for_input(ragged_rank))?;

    let nested_splits = inputs[..ragged_rank]
        .iter()
        .enumerate()
        .map(|(i, splits)| splits.with_rank(1).map_err(|err| err.for_input(i)))
        .collect::<Result<_, _>>()?;

    Ok(RaggedComponents {
        nested_splits,
        values,
    })
}
