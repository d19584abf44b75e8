//! Non-uniform point sets: a struct-of-arrays over `D in {1,2,3}` axes.
//!
//! Points are stored as `D` parallel arrays of length `P` rather than `P x D`
//! — a layout decision for cache behaviour during per-axis kernel
//! evaluation, not a language one (spec Design Notes).

use crate::error::{NufftError, Result};

/// A bound non-uniform point set. Coordinates are stored as given by the
/// caller; they are canonicalised to `[0, 2*pi)` on use, not persisted in
/// reduced form.
#[derive(Clone, Debug)]
pub enum PointSet<T> {
    D1(Vec<T>),
    D2(Vec<T>, Vec<T>),
    D3(Vec<T>, Vec<T>, Vec<T>),
}

impl<T> PointSet<T> {
    pub fn dims(&self) -> usize {
        match self {
            PointSet::D1(_) => 1,
            PointSet::D2(..) => 2,
            PointSet::D3(..) => 3,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PointSet::D1(a) => a.len(),
            PointSet::D2(a, _) => a.len(),
            PointSet::D3(a, _, _) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-axis coordinate slices, in axis order.
    pub fn axes(&self) -> Vec<&[T]> {
        match self {
            PointSet::D1(a) => vec![a.as_slice()],
            PointSet::D2(a, b) => vec![a.as_slice(), b.as_slice()],
            PointSet::D3(a, b, c) => vec![a.as_slice(), b.as_slice(), c.as_slice()],
        }
    }

    /// Validate that every axis has the same length and that the point set's
    /// dimensionality matches `expected_dims`.
    pub fn validate(&self, expected_dims: usize) -> Result<()> {
        if self.dims() != expected_dims {
            return Err(NufftError::DimensionMismatch {
                expected: expected_dims,
                got: self.dims(),
            });
        }
        let axes = self.axes();
        let p = axes[0].len();
        for (axis, a) in axes.iter().enumerate() {
            if a.len() != p {
                return Err(NufftError::PointCountMismatch {
                    axis,
                    expected: p,
                    got: a.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_axis_length_mismatch() {
        let pts = PointSet::D2(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]);
        assert!(pts.validate(2).is_err());
    }

    #[test]
    fn validate_rejects_dimension_mismatch() {
        let pts = PointSet::D1(vec![0.0, 1.0]);
        assert!(pts.validate(2).is_err());
    }

    #[test]
    fn validate_accepts_consistent_set() {
        let pts = PointSet::D3(vec![0.0, 1.0], vec![0.1, 1.1], vec![0.2, 1.2]);
        assert!(pts.validate(3).is_ok());
        assert_eq!(pts.len(), 2);
    }
}
