//! Type-2 interpolation (spec §4.5): gather values off the oversampled
//! uniform grid at each non-uniform point via the same tensor-product
//! kernel weights used by [`crate::spread`], reversed in direction.
//!
//! Read-only, so it parallelizes trivially with `par_iter`, unlike
//! spreading's accumulate-with-shadow-buffers dance.

use num_complex::Complex;
use num_traits::Float;
use rayon::prelude::*;

use crate::consts::PARALLEL_POINT_THRESHOLD;
use crate::fft::strides_for;
use crate::kernel::KernelDescriptor;
use crate::points::PointSet;

/// Gather coefficients at every point in `points` from the `C` flat
/// row-major `grids` of the given oversampled `shape`, writing one value per
/// point per channel into `out` (`out[c].len() == points.len()`).
pub fn interpolate<T>(
    points: &PointSet<T>,
    grids: &[Vec<Complex<T>>],
    kernels: &[&KernelDescriptor<T>],
    shape: &[usize],
    out: &mut [Vec<Complex<T>>],
)
where
    T: Float + Send + Sync,
{
    let p = points.len();
    let strides = strides_for(shape);
    let axes = points.axes();

    let gather_one = |i: usize| -> Vec<Complex<T>> {
        let coords: Vec<T> = axes.iter().map(|a| a[i]).collect();
        let support = crate::spread::point_support(&coords, kernels, shape, &strides);
        grids
            .iter()
            .map(|grid| {
                support.iter().fold(Complex::new(T::zero(), T::zero()), |acc, &(offset, w)| {
                    acc + grid[offset] * Complex::new(w, T::zero())
                })
            })
            .collect()
    };

    if p < PARALLEL_POINT_THRESHOLD {
        for i in 0..p {
            let vals = gather_one(i);
            for (c, v) in vals.into_iter().enumerate() {
                out[c][i] = v;
            }
        }
    } else {
        let results: Vec<Vec<Complex<T>>> = (0..p).into_par_iter().map(gather_one).collect();
        for (i, vals) in results.into_iter().enumerate() {
            for (c, v) in vals.into_iter().enumerate() {
                out[c][i] = v;
            }
        }
    }
}
