use crate::infer_shapes::{InferShapes, InferShapesError};
use crate::ops::{check_input_count, check_ragged_rank};
use crate::shape::Shape;

/// RaggedTensorFromVariant operator.
///
/// Decodes variant values produced by
/// [`RaggedTensorToVariant`](crate::ops::RaggedTensorToVariant) back into
/// `output_ragged_rank` row-splits vectors and a flat values tensor.
///
/// Each encoded value has ragged rank `input_ragged_rank`. The dimensions of
/// the encoded tensor become additional outer ragged dimensions of the
/// output, so a known encoded rank must be `output_ragged_rank -
/// input_ragged_rank`.
///
/// The lengths of the row splits and the shape of the values depend on the
/// contents of the encoded values, so they are unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct RaggedTensorFromVariant {
    /// Ragged rank of each encoded value.
    pub input_ragged_rank: i64,

    /// Ragged rank of the decoded output.
    pub output_ragged_rank: i64,
}

impl RaggedTensorFromVariant {
    /// Return the expected rank of the encoded input and the number of
    /// row-splits outputs.
    fn ragged_ranks(&self) -> Result<(usize, usize), InferShapesError> {
        let input_ragged_rank =
            check_ragged_rank("input_ragged_rank", self.input_ragged_rank, true)?;
        let output_ragged_rank =
            check_ragged_rank("output_ragged_rank", self.output_ragged_rank, false)?;

        let encoded_rank = output_ragged_rank
            .checked_sub(input_ragged_rank)
            .ok_or_else(|| {
                InferShapesError::invalid_attr(
                    "input_ragged_rank",
                    format!(
                        "must not exceed output_ragged_rank ({}), got {}",
                        self.output_ragged_rank, self.input_ragged_rank
                    ),
                )
            })?;

        Ok((encoded_rank, output_ragged_rank))
    }
}

impl InferShapes for RaggedTensorFromVariant {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        usize::try_from(self.output_ragged_rank).unwrap_or(0) + 1
    }

    fn infer_shapes(&self, inputs: &[Shape]) -> Result<Vec<Shape>, InferShapesError> {
        let (encoded_rank, num_splits) = self.ragged_ranks()?;
        check_input_count(inputs, 1)?;

        if let Some(actual) = inputs[0].rank() {
            if actual != encoded_rank {
                return Err(InferShapesError::EncodedRankMismatch {
                    expected: encoded_rank as i64,
                    actual,
                });
            }
        }

        let mut outputs: Vec<Shape> = (0..num_splits).map(|_| Shape::unknown_of_rank(1)).collect();
        outputs.push(Shape::unknown());

        Ok(outputs)
    }
}
