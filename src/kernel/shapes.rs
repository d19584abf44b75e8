//! Real-space shape functions, optimal-parameter selection, and analytic
//! Fourier transforms for each kernel family (spec §4.2).
//!
//! Shape fitting always happens in `f64`; the analytic Fourier transform
//! used during deconvolution runs in the plan's native type `T`.

use num_traits::Float;

use super::bessel::bessel_i0;
use crate::error::{NufftError, Result};

/// Per-family shape parameters, generic over the plan's float type.
#[derive(Clone, Copy, Debug)]
pub enum Shape<T> {
    /// Cardinal B-spline of order `n = 2M`; no tunable shape.
    BSpline { order: usize },
    /// `exp(-c*y^2)`, `c` chosen to minimise aliasing at the requested sigma.
    Gaussian { c: T },
    /// `I0(beta*sqrt(1-y^2)) / I0(beta)`.
    KaiserBessel { beta: T },
    /// `exp(beta*(sqrt(1-y^2)-1))`, FINUFFT's "ES" fast approximation to
    /// true Kaiser-Bessel, evaluated with flipped per-axis offset order.
    KaiserBesselBackwards { beta: T },
}

/// Pick shape parameters for `family` given half-width `m` and oversampling
/// `sigma`. Mirrors spec.md's `optimal_kernel(M, dx, sigma) -> descriptor`.
pub fn optimal_shape<T: Float>(
    family: super::KernelFamily,
    m: usize,
    sigma: f64,
) -> Result<Shape<T>> {
    use super::KernelFamily::*;
    let m_f = m as f64;

    match family {
        BSpline => Ok(Shape::BSpline { order: 2 * m }),
        Gaussian => {
            // NFFT (Potts/Steidl/Fourmont) optimal Gaussian window width.
            let b = (2.0 * sigma * m_f) / ((2.0 * sigma - 1.0) * std::f64::consts::PI);
            if !(b.is_finite()) || b <= 0.0 {
                return Err(NufftError::KernelParameterOverflow {
                    m,
                    sigma,
                    reason: "Gaussian window width collapsed to a non-positive value".into(),
                });
            }
            let c = (m_f * m_f) / b;
            Ok(Shape::Gaussian {
                c: T::from(c).unwrap(),
            })
        }
        KaiserBessel => {
            // Jackson/Fessler/Beatty design formula.
            let arg = m_f * m_f * (sigma - 0.5).powi(2) / (sigma * sigma) - 0.8;
            if arg < 0.0 {
                return Err(NufftError::KernelParameterOverflow {
                    m,
                    sigma,
                    reason: "Kaiser-Bessel beta formula argument went negative".into(),
                });
            }
            let beta = std::f64::consts::PI * arg.sqrt();
            Ok(Shape::KaiserBessel {
                beta: T::from(beta).unwrap(),
            })
        }
        KaiserBesselBackwards => {
            // FINUFFT-style empirical ES kernel beta, scaled by half-width.
            let gamma = 0.98 * std::f64::consts::PI * (1.0 - 1.0 / (2.0 * sigma));
            let beta = gamma * m_f;
            if beta <= 0.0 || !beta.is_finite() {
                return Err(NufftError::KernelParameterOverflow {
                    m,
                    sigma,
                    reason: "backwards Kaiser-Bessel beta collapsed to a non-positive value"
                        .into(),
                });
            }
            Ok(Shape::KaiserBesselBackwards {
                beta: T::from(beta).unwrap(),
            })
        }
    }
}

/// Real-space shape value `f(y)` for `y in [-1, 1]`, always computed in
/// `f64` (this is what gets Chebyshev-fit into the piecewise-poly table).
pub fn real_space_f64<T: Float>(shape: &Shape<T>, y: f64) -> f64 {
    if !(-1.0..=1.0).contains(&y) {
        return 0.0;
    }
    match *shape {
        Shape::BSpline { order } => bspline_basis_centered(order, y),
        Shape::Gaussian { c } => {
            let c = c.to_f64().unwrap();
            (-c * y * y).exp()
        }
        Shape::KaiserBessel { beta } => {
            let beta = beta.to_f64().unwrap();
            bessel_i0(beta * (1.0 - y * y).max(0.0).sqrt()) / bessel_i0(beta)
        }
        Shape::KaiserBesselBackwards { beta } => {
            let beta = beta.to_f64().unwrap();
            (beta * ((1.0 - y * y).max(0.0).sqrt() - 1.0)).exp()
        }
    }
}

/// Analytic Fourier transform `fourier(k)` used for deconvolution, in the
/// plan's native type. `dx` is the oversampled grid step; `m` the
/// half-width (so the physical kernel half-width is `m*dx`).
pub fn fourier<T: Float>(shape: &Shape<T>, k: T, dx: T, m: usize) -> T {
    match *shape {
        Shape::BSpline { order } => bspline_fourier(order, k, dx),
        Shape::Gaussian { c } => gaussian_fourier(c, k, dx, m),
        Shape::KaiserBessel { beta } | Shape::KaiserBesselBackwards { beta } => {
            kaiser_bessel_fourier(beta, k, dx, m)
        }
    }
}

/// Cardinal B-spline of order `n` (support `[0, n]`), evaluated at the
/// centred argument `t = (y+1)/2 * n` so that `y in [-1, 1]` maps onto the
/// full support. Exact truncated-power-basis sum (no recursion blowup).
fn bspline_basis_centered(n: usize, y: f64) -> f64 {
    let t = (y + 1.0) / 2.0 * n as f64;
    if t <= 0.0 || t >= n as f64 {
        return 0.0;
    }
    let mut sum = 0.0;
    for k in 0..=n {
        let term = t - k as f64;
        if term > 0.0 {
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            sum += sign * binomial(n, k) * term.powi((n - 1) as i32);
        }
    }
    sum / factorial(n - 1)
}

fn binomial(n: usize, k: usize) -> f64 {
    let mut result = 1.0f64;
    for i in 0..k {
        result *= (n - i) as f64 / (i + 1) as f64;
    }
    result
}

fn factorial(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, v| acc * v as f64)
}

/// `(sinc(k*dt/2))^n * dt`, `sinc(t) = sin(t)/t` (unnormalised), continuous
/// at `k=0` by taking the limit `dt`.
fn bspline_fourier<T: Float>(n: usize, k: T, dt: T) -> T {
    let half = T::from(0.5).unwrap();
    let t = k * dt * half;
    let s = if t.abs() < T::from(1e-12).unwrap() {
        T::one()
    } else {
        t.sin() / t
    };
    s.powi(n as i32) * dt
}

fn gaussian_fourier<T: Float>(c: T, k: T, dx: T, m: usize) -> T {
    // Physical half-width w = m*dx; continuous-domain FT of exp(-c*y^2)
    // with y = z/w: w * sqrt(pi/c) * exp(-(k*w)^2 / (4*c)).
    let w = T::from(m).unwrap() * dx;
    let pi = T::from(std::f64::consts::PI).unwrap();
    let four = T::from(4.0).unwrap();
    w * (pi / c).sqrt() * (-(k * w).powi(2) / (four * c)).exp()
}

fn kaiser_bessel_fourier<T: Float>(beta: T, k: T, dx: T, m: usize) -> T {
    let w = T::from(m).unwrap() * dx;
    let two = T::from(2.0).unwrap();
    let arg = beta * beta - (k * w).powi(2);
    let i0_beta = T::from(bessel_i0(beta.to_f64().unwrap())).unwrap();
    if arg >= T::zero() {
        let s = arg.sqrt();
        if s < T::from(1e-9).unwrap() {
            two * w / i0_beta
        } else {
            two * w * s.sinh() / (s * i0_beta)
        }
    } else {
        let s = (-arg).sqrt();
        two * w * s.sin() / (s * i0_beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelFamily;

    #[test]
    fn bspline_partition_of_unity() {
        let order = 6; // M=3
        for t in [0.05, 0.5, 1.3, 2.9, 4.99] {
            let mut sum = 0.0;
            for shift in -1..=(order as isize) {
                sum += bspline_basis_centered_raw(order, t - shift as f64);
            }
            assert!((sum - 1.0).abs() < 1e-9, "t={t} sum={sum}");
        }
    }

    // Raw (uncentered) helper mirroring bspline_basis_centered's core formula
    // but operating directly on the knot-space argument, for the partition
    // of unity check above (which needs unshifted evaluation at arbitrary
    // real knot-space positions, not just y in [-1,1]).
    fn bspline_basis_centered_raw(n: usize, t: f64) -> f64 {
        if t <= 0.0 || t >= n as f64 {
            return 0.0;
        }
        let mut sum = 0.0;
        for k in 0..=n {
            let term = t - k as f64;
            if term > 0.0 {
                let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                sum += sign * binomial(n, k) * term.powi((n - 1) as i32);
            }
        }
        sum / factorial(n - 1)
    }

    #[test]
    fn gaussian_and_kb_peak_at_one() {
        let g: Shape<f64> = optimal_shape(KernelFamily::Gaussian, 4, 2.0).unwrap();
        assert!((real_space_f64(&g, 0.0) - 1.0).abs() < 1e-12);
        let kb: Shape<f64> = optimal_shape(KernelFamily::KaiserBessel, 4, 2.0).unwrap();
        assert!((real_space_f64(&kb, 0.0) - 1.0).abs() < 1e-12);
        let kbb: Shape<f64> = optimal_shape(KernelFamily::KaiserBesselBackwards, 4, 2.0).unwrap();
        assert!((real_space_f64(&kbb, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn shapes_are_small_at_boundary() {
        // Kaiser-Bessel windows are not exactly zero at y=+-1 (I0(0) != 0),
        // but with the design-formula beta they are small relative to the
        // peak value of 1.0 at y=0.
        let kb: Shape<f64> = optimal_shape(KernelFamily::KaiserBessel, 6, 2.0).unwrap();
        assert!(real_space_f64(&kb, 1.0).abs() < 1e-3);
        assert!(real_space_f64(&kb, -1.0).abs() < 1e-3);
    }
}
