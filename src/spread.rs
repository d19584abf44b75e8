//! Type-1 spreading (spec §4.4): scatter non-uniform point values onto the
//! oversampled uniform grid via per-axis tensor-product kernel weights.
//!
//! The per-axis neighbour/weight arrays are combined with a single
//! odometer-style counter that covers `D in {1,2,3}` with one code path,
//! rather than hand-unrolled 1-D/2-D/3-D loops.

use num_complex::Complex;
use num_traits::Float;
use rayon::prelude::*;

use crate::consts::PARALLEL_POINT_THRESHOLD;
use crate::fft::strides_for;
use crate::kernel::KernelDescriptor;
use crate::points::PointSet;

/// Precompute, for a single point, the flattened grid offsets and combined
/// weight for every cell in its tensor-product support box. Returns parallel
/// `(offset, weight)` pairs.
///
/// Each per-axis kernel vector is scaled by that axis's oversampled grid
/// step `dx` (spec §4.4: "multiply each 1-D vector by Δx̃_d so the aggregate
/// discrete sum approximates the integral"), so the combined weight is the
/// tensor-product kernel times `prod_d dx_d`. This quadrature weight is
/// shared by both spreading and interpolation (spec §4.5 reuses the same
/// Δx̃_d-baked vectors), which is why it lives here rather than in either
/// caller.
pub(crate) fn point_support<T: Float>(
    coords: &[T],
    kernels: &[&KernelDescriptor<T>],
    shape: &[usize],
    strides: &[usize],
) -> Vec<(usize, T)> {
    let d = coords.len();
    let mut per_axis_idx: Vec<Vec<usize>> = Vec::with_capacity(d);
    let mut per_axis_w: Vec<Vec<T>> = Vec::with_capacity(d);
    let mut volume_element = T::one();

    for (axis, &x) in coords.iter().enumerate() {
        let x0 = crate::grid::index::to_unit_cell(x);
        let (center, weights) = kernels[axis].evaluate(x0, shape[axis]);
        let m = kernels[axis].half_width();
        let idx = crate::grid::index::neighbours(center, m, shape[axis]);
        per_axis_idx.push(idx);
        per_axis_w.push(weights);
        volume_element = volume_element * kernels[axis].dx();
    }

    let counts: Vec<usize> = per_axis_idx.iter().map(|v| v.len()).collect();
    let total: usize = counts.iter().product();
    let mut out = Vec::with_capacity(total);

    let mut combo = vec![0usize; d];
    for _ in 0..total {
        let mut offset = 0usize;
        let mut weight = volume_element;
        for axis in 0..d {
            let j = combo[axis];
            offset += (per_axis_idx[axis][j] - 1) * strides[axis];
            weight = weight * per_axis_w[axis][j];
        }
        out.push((offset, weight));

        // Odometer increment, last axis fastest.
        for axis in (0..d).rev() {
            combo[axis] += 1;
            if combo[axis] < counts[axis] {
                break;
            }
            combo[axis] = 0;
        }
    }
    out
}

/// Spread `values` (one slice per channel, each of length `P`) from
/// `points` onto `C` flat row-major grids of the given oversampled `shape`.
pub fn spread<T>(
    points: &PointSet<T>,
    values: &[&[Complex<T>]],
    kernels: &[&KernelDescriptor<T>],
    shape: &[usize],
) -> Vec<Vec<Complex<T>>>
where
    T: Float + Send + Sync,
{
    let p = points.len();
    let channels = values.len();
    let total: usize = shape.iter().product();
    let strides = strides_for(shape);
    let axes = points.axes();

    let empty = || vec![vec![Complex::new(T::zero(), T::zero()); total]; channels];

    if p < PARALLEL_POINT_THRESHOLD {
        let mut grids = empty();
        for i in 0..p {
            let coords: Vec<T> = axes.iter().map(|a| a[i]).collect();
            let support = point_support(&coords, kernels, shape, &strides);
            for (c, grid) in grids.iter_mut().enumerate() {
                let v = values[c][i];
                for &(offset, w) in &support {
                    grid[offset] = grid[offset] + v * Complex::new(w, T::zero());
                }
            }
        }
        grids
    } else {
        (0..p)
            .into_par_iter()
            .fold(empty, |mut grids, i| {
                let coords: Vec<T> = axes.iter().map(|a| a[i]).collect();
                let support = point_support(&coords, kernels, shape, &strides);
                for (c, grid) in grids.iter_mut().enumerate() {
                    let v = values[c][i];
                    for &(offset, w) in &support {
                        grid[offset] = grid[offset] + v * Complex::new(w, T::zero());
                    }
                }
                grids
            })
            .reduce(empty, |mut a, b| {
                for (ga, gb) in a.iter_mut().zip(b.into_iter()) {
                    for (x, y) in ga.iter_mut().zip(gb.into_iter()) {
                        *x = *x + y;
                    }
                }
                a
            })
    }
}
