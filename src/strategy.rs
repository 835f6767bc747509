//! Property-based generators for shape descriptors.
//!
//! This module is only included in test builds.

use std::ops::Range;

use proptest::prelude::*;

use crate::dim::Dim;
use crate::shape::Shape;

/// Largest dimension size generated. Kept small so that element counts of
/// generated shapes do not overflow.
const MAX_SIZE: u64 = 16;

/// Generate a dimension which is either unknown or a known size.
pub fn dim() -> impl Strategy<Value = Dim> {
    prop_oneof![
        1 => Just(Dim::Unknown),
        3 => (0..=MAX_SIZE).prop_map(Dim::Known),
    ]
}

/// Generate a shape with a rank in `rank` and known dimension sizes.
pub fn known_shape(rank: Range<usize>) -> impl Strategy<Value = Shape> {
    proptest::collection::vec(0..=MAX_SIZE, rank).prop_map(|sizes| Shape::from_fixed(&sizes))
}

/// Generate a shape which either has unknown rank, or a rank in `rank`
/// with a mix of known and unknown dimensions.
pub fn any_shape(rank: Range<usize>) -> impl Strategy<Value = Shape> {
    prop_oneof![
        1 => Just(Shape::unknown()),
        4 => proptest::collection::vec(dim(), rank).prop_map(Shape::from_dims),
    ]
}

/// Generate a list of row-splits shapes with a length in `ragged_rank`.
///
/// Each shape is valid for a row-splits input: it has rank 1 or unknown
/// rank, and a known length is at least 1.
pub fn splits_shapes(ragged_rank: Range<usize>) -> impl Strategy<Value = Vec<Shape>> {
    let splits = prop_oneof![
        1 => Just(Shape::unknown()),
        1 => Just(Shape::unknown_of_rank(1)),
        3 => (1..=MAX_SIZE).prop_map(|len| Shape::vector(Dim::Known(len))),
    ];
    proptest::collection::vec(splits, ragged_rank)
}
