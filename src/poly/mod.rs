//! Piecewise-polynomial approximation of a real function on `[-1, 1]`.
//!
//! Builds `L` independent degree-`(N-1)` polynomial pieces (one per
//! subinterval) that approximate a user function, each fit through `N`
//! Chebyshev nodes by a direct dense solve. Subintervals are numbered
//! right-to-left: subinterval 0 covers the region nearest `+1`.

mod vandermonde;

use num_traits::Float;

/// `L x N` table of per-subinterval polynomial coefficients.
///
/// Row `ell` holds the coefficients (low-to-high degree) of the polynomial
/// fit on subinterval `ell`, which spans `[h_ell - delta, h_ell + delta]`
/// with midpoint `h_ell = 1 - (2*ell+1)/L` and half-width `delta = 1/L`.
#[derive(Clone, Debug)]
pub struct PiecewisePoly<T> {
    l: usize,
    n: usize,
    /// Row-major, `l` rows of `n` coefficients each, low-to-high degree.
    coeffs: Vec<T>,
}

impl<T: Float> PiecewisePoly<T> {
    /// Fit `f` on `[-1, 1]` with `l` subintervals of degree `n - 1` each.
    ///
    /// `f` is evaluated in `f64` regardless of `T`; coefficients are cast
    /// down to `T` once the fit is complete.
    pub fn build<F: Fn(f64) -> f64>(f: F, l: usize, n: usize) -> Self {
        assert!(l >= 1 && n >= 1, "piecewise poly needs l>=1, n>=1");

        let nodes = chebyshev_nodes(n);
        let mut coeffs = Vec::with_capacity(l * n);

        for ell in 0..l {
            let h_ell = 1.0 - (2 * ell + 1) as f64 / l as f64;
            let delta = 1.0 / l as f64;
            let values: Vec<f64> = nodes.iter().map(|&x| f(h_ell + x * delta)).collect();
            let row = vandermonde::solve(&nodes, &values);
            coeffs.extend(row.into_iter().map(|c| T::from(c).unwrap()));
        }

        PiecewisePoly { l, n, coeffs }
    }

    pub fn l(&self) -> usize {
        self.l
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Locate the subinterval `ell` and local coordinate `x in [-1, 1]` for
    /// a global position `y in [-1, 1]`.
    fn locate(&self, y: T) -> (usize, T) {
        let one = T::one();
        let two = one + one;
        let l_t = T::from(self.l).unwrap();

        let raw = ((one - y) * l_t / two).floor();
        let ell = raw
            .to_isize()
            .unwrap_or(0)
            .clamp(0, self.l as isize - 1) as usize;

        let h_ell = one - T::from(2 * ell + 1).unwrap() / l_t;
        let x = (y - h_ell) * l_t;
        (ell, x)
    }

    /// Evaluate the fitted function at `y in [-1, 1]` via Horner.
    pub fn eval(&self, y: T) -> T {
        let (ell, x) = self.locate(y);
        self.eval_row(ell, x)
    }

    /// Evaluate subinterval `ell` directly at local coordinate `x in [-1,1]`,
    /// bypassing the locate step — used by kernel evaluators that already
    /// know which row a sample falls in by construction.
    pub fn eval_row(&self, ell: usize, x: T) -> T {
        let row = &self.coeffs[ell * self.n..(ell + 1) * self.n];
        let mut acc = T::zero();
        for &c in row.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }
}

/// Chebyshev nodes `x_k = cos(pi*(k - 1/2)/n)` for `k = 1..=n`, descending
/// (matching the order spec.md writes them in, `k` increasing from 1).
fn chebyshev_nodes(n: usize) -> Vec<f64> {
    (1..=n)
        .map(|k| (std::f64::consts::PI * (k as f64 - 0.5) / n as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_constant_exactly() {
        let poly = PiecewisePoly::<f64>::build(|_| 3.0, 4, 4);
        for y in [-0.9, -0.3, 0.0, 0.4, 0.99] {
            assert!((poly.eval(y) - 3.0).abs() < 1e-10);
        }
    }

    #[test]
    fn fits_smooth_function_to_tolerance() {
        let poly = PiecewisePoly::<f64>::build(|y| (y * 2.0).exp(), 8, 8);
        for i in 0..200 {
            let y = -1.0 + 2.0 * i as f64 / 199.0;
            let exact = (y * 2.0).exp();
            assert!(
                (poly.eval(y) - exact).abs() < 1e-8,
                "y={y} got={} exact={exact}",
                poly.eval(y)
            );
        }
    }

    #[test]
    fn locate_maps_plus_one_to_row_zero() {
        let poly = PiecewisePoly::<f64>::build(|y| y, 6, 4);
        let (ell, _) = poly.locate(0.999999);
        assert_eq!(ell, 0);
        let (ell, _) = poly.locate(-0.999999);
        assert_eq!(ell, 5);
    }
}
