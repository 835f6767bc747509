use crate::dim::Dim;
use crate::infer_shapes::{InferShapes, InferShapesError};
use crate::ops::{check_ragged_components, check_ragged_rank, ragged_input_count};
use crate::shape::Shape;

/// RaggedTensorToVariant operator.
///
/// Encodes a ragged tensor as opaque variant values. If `batched_input` is
/// false, the whole ragged tensor is encoded as a single scalar. Otherwise
/// the outermost ragged dimension is treated as a batch and each row is
/// encoded separately, producing a vector with one element per row.
#[derive(Clone, Debug, PartialEq)]
pub struct RaggedTensorToVariant {
    /// Number of row-splits inputs (the `RAGGED_RANK` attribute).
    pub ragged_rank: i64,

    /// True if each row of the outermost ragged dimension is encoded
    /// separately.
    pub batched_input: bool,
}

impl InferShapes for RaggedTensorToVariant {
    fn input_count(&self) -> usize {
        ragged_input_count(self.ragged_rank)
    }

    fn output_count(&self) -> usize {
        1
    }

    fn infer_shapes(&self, inputs: &[Shape]) -> Result<Vec<Shape>, InferShapesError> {
        let ragged_rank = check_ragged_rank("RAGGED_RANK", self.ragged_rank, false)?;
        let ragged = check_ragged_components(inputs, ragged_rank)?;

        if !self.batched_input {
            return Ok([Shape::scalar()].into());
        }

        // Row splits for N rows have N + 1 entries.
        let outer_splits = &ragged.nested_splits[0];
        let splits_len = outer_splits.size(0).unwrap_or(Dim::Unknown);
        let num_rows = splits_len
            .checked_sub(1)
            .ok_or(InferShapesError::InvalidRowSplits { input: 0, len: 0 })?;

        Ok([Shape::vector(num_rows)].into())
    }
}
