use crate::dim::Dim;
use crate::infer_shapes::{InferShapes, InferShapesError};
use crate::ops::{check_ragged_components, check_ragged_rank, ragged_input_count};
use crate::shape::Shape;

/// RaggedTensorToSparse operator.
///
/// Converts a ragged tensor into COO sparse form. The outputs are:
///
/// - `sparse_indices`: `[num_values, dense_rank]` matrix of element indices
/// - `sparse_values`: `[num_values]` vector of element values
/// - `sparse_dense_shape`: `[dense_rank]` vector with the shape of the
///   equivalent dense tensor
///
/// Where `dense_rank` is `ragged_rank` plus the rank of the values input.
#[derive(Clone, Debug, PartialEq)]
pub struct RaggedTensorToSparse {
    /// Number of row-splits inputs (the `RAGGED_RANK` attribute).
    pub ragged_rank: i64,
}

impl InferShapes for RaggedTensorToSparse {
    fn input_count(&self) -> usize {
        ragged_input_count(self.ragged_rank)
    }

    fn output_count(&self) -> usize {
        3
    }

    fn infer_shapes(&self, inputs: &[Shape]) -> Result<Vec<Shape>, InferShapesError> {
        let ragged_rank = check_ragged_rank("RAGGED_RANK", self.ragged_rank, false)?;
        let ragged = check_ragged_components(inputs, ragged_rank)?;

        let dense_rank = match ragged.values.rank() {
            Some(values_rank) => Dim::Known((ragged_rank + values_rank) as u64),
            None => Dim::Unknown,
        };
        let num_values = ragged.values.num_elements()?;

        Ok([
            Shape::matrix(num_values, dense_rank),
            Shape::vector(num_values),
            Shape::vector(dense_rank),
        ]
        .into())
    }
}
