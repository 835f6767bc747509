//! Dimension sizes which may be unknown until execution.

use std::fmt;

/// Size of a single dimension of a shape descriptor.
///
/// A dimension is either a known non-negative size or unknown. Checked
/// arithmetic involving an unknown dimension produces an unknown dimension.
///
/// The derived `PartialEq` compares representations, so `Unknown ==
/// Unknown` is true. That is what is needed to compare two descriptors for
/// equality, but it does not mean the sizes are the same at runtime. Use
/// [`Dim::same_size`] to test whether two dimensions are provably equal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dim {
    Known(u64),
    Unknown,
}

impl Dim {
    /// Return the size if it is known.
    pub fn value(self) -> Option<u64> {
        match self {
            Self::Known(size) => Some(size),
            Self::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Return true if both dimensions are known and have the same size.
    ///
    /// Two unknown dimensions are never considered the same size.
    pub fn same_size(self, other: Dim) -> bool {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => a == b,
            _ => false,
        }
    }

    /// Multiply two dimensions, returning `None` if the product of two known
    /// sizes overflows.
    pub fn checked_mul(self, other: Dim) -> Option<Dim> {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => a.checked_mul(b).map(Self::Known),
            _ => Some(Self::Unknown),
        }
    }

    /// Subtract a known amount from this dimension.
    ///
    /// Returns `None` if the dimension is known and smaller than `rhs`, since
    /// a dimension size cannot be negative. An unknown dimension stays
    /// unknown.
    pub fn checked_sub(self, rhs: u64) -> Option<Dim> {
        match self {
            Self::Known(size) => size.checked_sub(rhs).map(Self::Known),
            Self::Unknown => Some(Self::Unknown),
        }
    }
}

impl From<u64> for Dim {
    fn from(size: u64) -> Self {
        Self::Known(size)
    }
}

impl From<Option<u64>> for Dim {
    fn from(size: Option<u64>) -> Self {
        size.map(Self::Known).unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(size) => write!(f, "{}", size),
            Self::Unknown => write!(f, "?"),
        }
    }
}
