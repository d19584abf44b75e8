//! Kernel library (spec §4.2): smoothing kernels used by spreading and
//! interpolation, each backed by a piecewise-polynomial approximation of
//! its real-space shape.

mod bessel;
mod shapes;

use std::sync::{Arc, Mutex};

use num_traits::Float;

use crate::consts::DEFAULT_POLY_SIZE;
use crate::error::Result;
use crate::grid::index;
use crate::poly::PiecewisePoly;

pub use shapes::Shape;

/// The four supported kernel families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelFamily {
    BSpline,
    Gaussian,
    KaiserBessel,
    KaiserBesselBackwards,
}

impl KernelFamily {
    /// Whether this family's per-axis evaluator returns samples in the
    /// flipped ("backwards") offset order.
    fn is_backwards(self) -> bool {
        matches!(self, KernelFamily::KaiserBesselBackwards)
    }
}

/// A fully constructed per-axis kernel: shape parameters, the fitted
/// piecewise-polynomial table, and a lazily populated Fourier-coefficient
/// cache. Immutable once built except for that cache.
pub struct KernelDescriptor<T> {
    family: KernelFamily,
    half_width: usize,
    dx: T,
    shape: Shape<T>,
    poly: PiecewisePoly<T>,
    fourier_cache: Mutex<Option<(usize, Arc<Vec<T>>)>>,
}

impl<T: Float> KernelDescriptor<T> {
    /// Build a kernel descriptor for `family` with half-width `m`, grid step
    /// `dx` on the oversampled grid, given oversampling factor `sigma`.
    /// Mirrors spec.md's `optimal_kernel(M, dx, sigma) -> descriptor`.
    pub fn optimal(family: KernelFamily, m: usize, dx: T, sigma: f64) -> Result<Self> {
        Self::optimal_with_poly_size(family, m, dx, sigma, DEFAULT_POLY_SIZE)
    }

    pub fn optimal_with_poly_size(
        family: KernelFamily,
        m: usize,
        dx: T,
        sigma: f64,
        poly_size: usize,
    ) -> Result<Self> {
        assert!(m >= 1, "half-width M must be >= 1");
        let shape = shapes::optimal_shape::<T>(family, m, sigma)?;
        let poly = PiecewisePoly::build(
            |y| shapes::real_space_f64(&shape, y),
            2 * m,
            poly_size,
        );
        Ok(KernelDescriptor {
            family,
            half_width: m,
            dx,
            shape,
            poly,
            fourier_cache: Mutex::new(None),
        })
    }

    pub fn half_width(&self) -> usize {
        self.half_width
    }

    pub fn dx(&self) -> T {
        self.dx
    }

    pub fn family(&self) -> KernelFamily {
        self.family
    }

    /// Central cell index (1-based) and the `2M` kernel values around it
    /// for coordinate `x` (already canonicalised to `[0, 2*pi)`), in the
    /// order prescribed by the family's convention.
    ///
    /// The central cell is `x`'s owning grid cell under the floor convention
    /// (spec §4.3), so the normalised offset `X = (x/dx - (i-1))/M` stays in
    /// `[0, 1/M)` (spec §4.2), and each of the `2M` samples is taken at
    /// `X + (M-j)/M`, `j = 1..2M`, landing in the kernel's `[-1, 1]` support.
    pub fn evaluate(&self, x: T, n: usize) -> (usize, Vec<T>) {
        let m = self.half_width;
        let i = index::cell_index(x, self.dx, n);

        let m_t = T::from(m).unwrap();
        let i_minus_one = T::from(i - 1).unwrap();
        let frac = x / self.dx - i_minus_one; // in [0, 1)
        let big_x = frac / m_t; // X in [0, 1/M)

        let mut values = Vec::with_capacity(2 * m);
        for j in 1..=2 * m {
            let j_t = T::from(j).unwrap();
            let offset = if self.family.is_backwards() {
                big_x - (m_t - j_t) / m_t
            } else {
                big_x + (m_t - j_t) / m_t
            };
            values.push(self.poly.eval(offset));
        }
        // The backwards convention's natural `j` order walks cells from
        // `i+M` down to `i-M+1`, the reverse of the ascending `i-M..i+M-1`
        // order `grid::index::neighbours` always returns. Flip it here so
        // every family hands spreading/interpolation a weight array already
        // aligned, entry-for-entry, with that ascending neighbour list.
        if self.family.is_backwards() {
            values.reverse();
        }
        (i, values)
    }

    /// Analytic Fourier transform at wavenumber `k` (spec `fourier(k)`).
    pub fn fourier(&self, k: T) -> T {
        shapes::fourier(&self.shape, k, self.dx, self.half_width)
    }

    /// Real-space kernel value at physical offset `x` from the kernel's
    /// center, i.e. `shape(x / (M*dx))`. Exposed for direct sampling of the
    /// real-space window (e.g. to cross-check `fourier()` against a discrete
    /// transform of fine samples), bypassing the piecewise-polynomial fit.
    pub fn shape_at(&self, x: f64) -> f64 {
        let half_support = self.half_width as f64 * self.dx.to_f64().unwrap();
        let y = x / half_support;
        shapes::real_space_f64(&self.shape, y)
    }

    /// Fourier coefficients evaluated at every entry of `ks`, cached by
    /// wavenumber-set length. Re-binding to a different-length `ks`
    /// invalidates the cache (spec §4.2).
    pub fn fourier_coeffs(&self, ks: &[i64]) -> Arc<Vec<T>>
    where
        T: Send + Sync,
    {
        let mut guard = self.fourier_cache.lock().unwrap();
        if let Some((len, cached)) = guard.as_ref() {
            if *len == ks.len() {
                return cached.clone();
            }
        }
        let fresh: Vec<T> = ks
            .iter()
            .map(|&k| self.fourier(T::from(k).unwrap()))
            .collect();
        let arc = Arc::new(fresh);
        *guard = Some((ks.len(), arc.clone()));
        arc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bspline_evaluator_sums_to_one() {
        let dx = 0.1f64;
        let kernel = KernelDescriptor::optimal(KernelFamily::BSpline, 4, dx, 2.0).unwrap();
        for x in [0.0, 0.03, 0.07, 0.099, 3.0] {
            let (_, values) = kernel.evaluate(x, 63);
            let sum: f64 = values.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "x={x} sum={sum}");
        }
    }

    #[test]
    fn evaluate_returns_2m_values() {
        let kernel =
            KernelDescriptor::optimal(KernelFamily::KaiserBessel, 5, 0.2f64, 2.0).unwrap();
        let (_, values) = kernel.evaluate(1.23, 50);
        assert_eq!(values.len(), 10);
    }

    #[test]
    fn fourier_cache_invalidates_on_length_change() {
        let kernel = KernelDescriptor::optimal(KernelFamily::Gaussian, 4, 0.1f64, 2.0).unwrap();
        let a = kernel.fourier_coeffs(&[0, 1, 2]);
        assert_eq!(a.len(), 3);
        let b = kernel.fourier_coeffs(&[0, 1, 2, 3]);
        assert_eq!(b.len(), 4);
    }

    #[test]
    fn backwards_kb_evaluate_matches_its_natural_order_reversed() {
        let dx = 0.1f64;
        let m = 5;
        let bwd =
            KernelDescriptor::optimal(KernelFamily::KaiserBesselBackwards, m, dx, 2.0).unwrap();
        let x = 0.37;
        let n = 80;
        let i = index::cell_index(x, dx, n);
        let frac = x / dx - (i - 1) as f64;
        let big_x = frac / m as f64;

        let natural: Vec<f64> = (1..=2 * m)
            .map(|j| bwd.poly.eval(big_x - (m as f64 - j as f64) / m as f64))
            .collect();
        let (_, bv) = bwd.evaluate(x, n);

        let mut expected = natural;
        expected.reverse();
        assert_eq!(bv, expected);
    }
}
