//! Shape inference for ragged tensor conversion operators.
//!
//! # About ragged tensors
//!
//! A ragged tensor is a tensor where some dimensions have rows of varying
//! length. Ragged tensors are represented by a flat _values_ tensor together
//! with one or more _row-splits_ vectors. The number of row-splits vectors is
//! the tensor's _ragged rank_. A row-splits vector for a dimension with `N`
//! rows has `N + 1` entries, where row `i` spans
//! `values[splits[i]..splits[i + 1]]`.
//!
//! ```text
//! rt = [[1, 2], [], [3, 4, 5]]
//! rt_nested_splits = [[0, 2, 2, 5]]
//! rt_dense_values = [1, 2, 3, 4, 5]
//! ```
//!
//! Graph builders call shape inference for each operator as it is added, to
//! find the shapes of the operator's outputs given the shapes of its inputs.
//! Input shapes may be only partially known. Inference propagates whatever is
//! known and rejects inputs which could never be valid.
//!
//! # Crate overview
//!
//! Shapes are described by [`Shape`], whose dimensions are [`Dim`]s. The
//! [`InferShapes`] trait computes the output shapes of an operator, and is
//! implemented by the operators in [`ops`]:
//!
//! - [`RaggedTensorToSparse`](ops::RaggedTensorToSparse) converts a ragged
//!   tensor to COO sparse form.
//! - [`RaggedTensorToVariant`](ops::RaggedTensorToVariant) encodes a ragged
//!   tensor as opaque variant values.
//! - [`RaggedTensorFromVariant`](ops::RaggedTensorFromVariant) decodes variant
//!   values back into a ragged tensor.
//!
//! Operators can also be looked up by name and constructed from [`Attrs`]
//! using an [`OpRegistry`].

mod attrs;
mod dim;
mod infer_shapes;
pub mod op_registry;
pub mod ops;
mod shape;

#[cfg(test)]
mod strategy;

pub use attrs::{AttrValue, Attrs, DataType};
pub use dim::Dim;
pub use infer_shapes::{ErrorKind, InferShapes, InferShapesError, RankConstraint};
pub use op_registry::{OpRegistry, OpSignature, ReadOp};
pub use shape::Shape;
