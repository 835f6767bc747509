//! Shape descriptors with partially known ranks and dimension sizes.

use std::fmt;

use smallvec::SmallVec;

use crate::dim::Dim;
use crate::infer_shapes::{InferShapesError, RankConstraint};

type Dims = SmallVec<[Dim; 4]>;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum ShapeKind {
    /// The rank is known. Individual dimensions may still be unknown.
    Known(Dims),
    /// Neither the rank nor any of the dimension sizes are known.
    Unknown,
}

/// Static description of a tensor's shape.
///
/// A shape is either entirely unknown, meaning the tensor may have any rank,
/// or has a known rank where each dimension is a [`Dim`] which may itself be
/// unknown.
///
/// ```
/// use ragged_shape_inference::{Dim, Shape};
///
/// // A matrix with an unknown number of rows and 3 columns.
/// let matrix = Shape::matrix(Dim::Unknown, Dim::Known(3));
/// assert_eq!(matrix.rank(), Some(2));
/// assert_eq!(matrix.size(1), Some(Dim::Known(3)));
/// assert_eq!(matrix.num_elements(), Ok(Dim::Unknown));
/// assert_eq!(matrix.to_string(), "[?, 3]");
///
/// // A shape of unknown rank can be refined into a shape of known rank
/// // with unknown dimensions.
/// let vec = Shape::unknown().with_rank(1).unwrap();
/// assert_eq!(vec, Shape::unknown_of_rank(1));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape(ShapeKind);

impl Shape {
    /// Create a shape whose rank and dimensions are unknown.
    pub fn unknown() -> Self {
        Self(ShapeKind::Unknown)
    }

    /// Create a shape with a known rank where every dimension is unknown.
    pub fn unknown_of_rank(rank: usize) -> Self {
        Self(ShapeKind::Known(SmallVec::from_elem(Dim::Unknown, rank)))
    }

    /// Create a shape with a known rank from a sequence of dimensions.
    pub fn from_dims(dims: impl IntoIterator<Item = Dim>) -> Self {
        Self(ShapeKind::Known(dims.into_iter().collect()))
    }

    /// Create a shape where every dimension size is known.
    pub fn from_fixed(sizes: &[u64]) -> Self {
        Self::from_dims(sizes.iter().copied().map(Dim::Known))
    }

    /// Create the shape of a scalar.
    pub fn scalar() -> Self {
        Self(ShapeKind::Known(Dims::new()))
    }

    /// Create the shape of a vector with `len` elements.
    pub fn vector(len: Dim) -> Self {
        Self::from_dims([len])
    }

    /// Create the shape of a matrix.
    pub fn matrix(rows: Dim, cols: Dim) -> Self {
        Self::from_dims([rows, cols])
    }

    /// Return the number of dimensions, if known.
    pub fn rank(&self) -> Option<usize> {
        self.dims().map(|dims| dims.len())
    }

    /// Return the dimensions, if the rank is known.
    pub fn dims(&self) -> Option<&[Dim]> {
        match &self.0 {
            ShapeKind::Known(dims) => Some(dims.as_slice()),
            ShapeKind::Unknown => None,
        }
    }

    /// Return the size of the index'th dimension.
    ///
    /// Returns `None` if the rank is unknown or `index` is out of bounds.
    pub fn size(&self, index: usize) -> Option<Dim> {
        self.dims().and_then(|dims| dims.get(index).copied())
    }

    /// Check that this shape can have rank `rank`.
    ///
    /// Returns the shape refined to that rank: a shape with unknown rank
    /// becomes a shape with `rank` unknown dimensions. Returns an error if
    /// the rank is known and different.
    pub fn with_rank(&self, rank: usize) -> Result<Shape, InferShapesError> {
        match &self.0 {
            ShapeKind::Unknown => Ok(Self::unknown_of_rank(rank)),
            ShapeKind::Known(dims) if dims.len() == rank => Ok(self.clone()),
            ShapeKind::Known(dims) => Err(InferShapesError::IncorrectRank {
                input: 0,
                expected: RankConstraint::Exactly(rank),
                actual: dims.len(),
            }),
        }
    }

    /// Check that this shape can have a rank of at least `min_rank`.
    ///
    /// A shape with unknown rank is returned unchanged, since its rank may
    /// still be anything `>= min_rank`.
    pub fn with_rank_at_least(&self, min_rank: usize) -> Result<Shape, InferShapesError> {
        match &self.0 {
            ShapeKind::Known(dims) if dims.len() < min_rank => {
                Err(InferShapesError::IncorrectRank {
                    input: 0,
                    expected: RankConstraint::AtLeast(min_rank),
                    actual: dims.len(),
                })
            }
            _ => Ok(self.clone()),
        }
    }

    /// Return the total number of elements in a tensor with this shape.
    ///
    /// The result is unknown if the rank or any dimension is unknown. A
    /// scalar has one element.
    pub fn num_elements(&self) -> Result<Dim, InferShapesError> {
        let Some(dims) = self.dims() else {
            return Ok(Dim::Unknown);
        };
        if dims.iter().any(|d| !d.is_known()) {
            return Ok(Dim::Unknown);
        }
        dims.iter()
            .try_fold(Dim::Known(1), |count, &dim| count.checked_mul(dim))
            .ok_or_else(|| InferShapesError::DimensionOverflow {
                shape: self.to_string(),
            })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(dims) = self.dims() else {
            return write!(f, "<unknown>");
        };
        write!(f, "[")?;
        for (i, dim) in dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dim)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
pub(crate) use tests::shape;
