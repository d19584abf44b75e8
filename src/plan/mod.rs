//! The planner/driver (spec §4.6): ties the kernel library, point-to-cell
//! indexing, spreading/interpolation, and the FFT backend into the public
//! type-1/type-2 transform API.
//!
//! A `Plan` owns its oversampled buffers and FFT plan objects for its whole
//! lifetime and reuses them across calls, exactly as the teacher's compute
//! backend owns its `FftPlanner` and scratch buffers for the life of an
//! alignment run.

use num_complex::Complex;
use num_traits::Float;
use rustfft::FftNum;
use tracing::info;

use crate::consts::{DEFAULT_HALF_WIDTH, DEFAULT_POLY_SIZE, DEFAULT_SIGMA};
use crate::error::{NufftError, Result};
use crate::fft::{strides_for, FftEngine};
use crate::grid::{sizing, wavenumbers};
use crate::interp;
use crate::kernel::{KernelDescriptor, KernelFamily};
use crate::points::PointSet;
use crate::spread;

/// Builds a [`Plan`]. Kernel family, half-width, oversampling factor, and
/// polynomial fit degree are plain constructor parameters rather than a
/// `serde`-backed config struct — there is no user-facing surface here to
/// (de)serialize.
pub struct PlanBuilder<T> {
    target_sizes: Vec<usize>,
    half_width: usize,
    sigma: f64,
    family: KernelFamily,
    poly_size: usize,
    complex: bool,
    _marker: std::marker::PhantomData<T>,
}

impl<T: FftNum + Float> PlanBuilder<T> {
    pub fn new(target_sizes: &[usize]) -> Self {
        PlanBuilder {
            target_sizes: target_sizes.to_vec(),
            half_width: DEFAULT_HALF_WIDTH,
            sigma: DEFAULT_SIGMA,
            family: KernelFamily::KaiserBesselBackwards,
            poly_size: DEFAULT_POLY_SIZE,
            complex: false,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn half_width(mut self, m: usize) -> Self {
        self.half_width = m;
        self
    }

    pub fn oversampling(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn kernel(mut self, family: KernelFamily) -> Self {
        self.family = family;
        self
    }

    pub fn poly_size(mut self, n: usize) -> Self {
        self.poly_size = n;
        self
    }

    /// Use the complex-to-complex transform pair instead of the default
    /// real half-spectrum pair.
    pub fn complex(mut self) -> Self {
        self.complex = true;
        self
    }

    pub fn build(self) -> Result<Plan<T>> {
        let d = self.target_sizes.len();
        if d == 0 || d > 3 {
            return Err(NufftError::DimensionMismatch {
                expected: 1,
                got: d,
            });
        }
        for (axis, &n) in self.target_sizes.iter().enumerate() {
            if n == 0 {
                return Err(NufftError::InvalidSize { axis, n });
            }
        }
        if self.half_width == 0 {
            return Err(NufftError::KernelParameterOverflow {
                m: self.half_width,
                sigma: self.sigma,
                reason: "half-width M must be >= 1".into(),
            });
        }
        if self.poly_size == 0 {
            return Err(NufftError::KernelParameterOverflow {
                m: self.half_width,
                sigma: self.sigma,
                reason: "polynomial fit size N must be >= 1".into(),
            });
        }

        let spatial_shape: Vec<usize> = self
            .target_sizes
            .iter()
            .map(|&n| sizing::oversampled_size(n, self.sigma))
            .collect();

        for (axis, &n) in spatial_shape.iter().enumerate() {
            if 2 * self.half_width >= n {
                return Err(NufftError::HalfWidthTooLarge {
                    axis,
                    m: self.half_width,
                    n,
                });
            }
        }

        let two_pi = T::from(std::f64::consts::TAU).unwrap();
        let mut kernels = Vec::with_capacity(d);
        for &n in &spatial_shape {
            let dx = two_pi / T::from(n).unwrap();
            kernels.push(KernelDescriptor::optimal_with_poly_size(
                self.family,
                self.half_width,
                dx,
                self.sigma,
                self.poly_size,
            )?);
        }

        info!(
            target_sizes = ?self.target_sizes,
            spatial_shape = ?spatial_shape,
            sigma = self.sigma,
            half_width = self.half_width,
            complex = self.complex,
            "built nufft plan"
        );

        Ok(Plan {
            target_sizes: self.target_sizes,
            spatial_shape,
            kernels,
            fft: FftEngine::new(),
            complex: self.complex,
            points: None,
        })
    }
}

/// A constructed transform plan: oversampled buffers and per-axis kernels,
/// ready to have points bound and transforms executed against it.
pub struct Plan<T> {
    target_sizes: Vec<usize>,
    spatial_shape: Vec<usize>,
    kernels: Vec<KernelDescriptor<T>>,
    fft: FftEngine<T>,
    complex: bool,
    points: Option<PointSet<T>>,
}

fn map_index(k: i64, n: usize) -> usize {
    if k >= 0 {
        k as usize
    } else {
        (n as i64 + k) as usize
    }
}

fn decode(idx: usize, shape: &[usize], strides: &[usize]) -> Vec<usize> {
    shape
        .iter()
        .enumerate()
        .map(|(d, &n)| (idx / strides[d]) % n)
        .collect()
}

impl<T: FftNum + Float + Send + Sync> Plan<T> {
    pub fn dims(&self) -> usize {
        self.target_sizes.len()
    }

    pub fn target_sizes(&self) -> &[usize] {
        &self.target_sizes
    }

    /// The logical Fourier-coefficient shape: full `target_sizes` in complex
    /// mode, axis 0 halved (`N0/2+1`) in real mode.
    pub fn coeff_shape(&self) -> Vec<usize> {
        let mut shape = self.target_sizes.clone();
        if !self.complex {
            shape[0] = shape[0] / 2 + 1;
        }
        shape
    }

    pub fn set_points(&mut self, points: PointSet<T>) -> Result<()> {
        points.validate(self.dims())?;
        info!(count = points.len(), "bound points to plan");
        self.points = Some(points);
        Ok(())
    }

    fn kernels_ref(&self) -> Vec<&KernelDescriptor<T>> {
        self.kernels.iter().collect()
    }

    fn deconvolve_factor(&self, ks: &[i64]) -> T {
        ks.iter()
            .zip(self.kernels.iter())
            .fold(T::one(), |acc, (&k, kernel)| {
                acc / kernel.fourier(T::from(k).unwrap())
            })
    }

    /// Type-1 (non-uniform to uniform), complex path: spread `values` onto
    /// the oversampled grid, FFT, deconvolve and truncate to `target_sizes`.
    pub fn exec_type1(
        &mut self,
        values: &[&[Complex<T>]],
        out: &mut [Vec<Complex<T>>],
    ) -> Result<()> {
        let points = self.points.as_ref().ok_or(NufftError::NoPointsBound)?;
        if values.len() != out.len() {
            return Err(NufftError::ChannelCountMismatch {
                expected: out.len(),
                got: values.len(),
            });
        }
        let target_total: usize = self.target_sizes.iter().product();
        for o in out.iter() {
            if o.len() != target_total {
                return Err(NufftError::OutputSizeMismatch {
                    expected: target_total,
                    got: o.len(),
                });
            }
        }

        let kernels_ref = self.kernels_ref();
        let grids = spread::spread(points, values, &kernels_ref, &self.spatial_shape);

        let target_strides = strides_for(&self.target_sizes);
        let spatial_strides = strides_for(&self.spatial_shape);
        let target_wavenumbers: Vec<Vec<i64>> = self
            .target_sizes
            .iter()
            .map(|&n| wavenumbers::signed(n))
            .collect();

        for (c, mut grid) in grids.into_iter().enumerate() {
            self.fft.forward_complex(&mut grid, &self.spatial_shape);
            for idx in 0..target_total {
                let axis_idx = decode(idx, &self.target_sizes, &target_strides);
                let ks: Vec<i64> = axis_idx
                    .iter()
                    .enumerate()
                    .map(|(d, &a)| target_wavenumbers[d][a])
                    .collect();
                let src_offset: usize = ks
                    .iter()
                    .enumerate()
                    .map(|(d, &k)| map_index(k, self.spatial_shape[d]) * spatial_strides[d])
                    .sum();
                let factor = self.deconvolve_factor(&ks);
                out[c][idx] = grid[src_offset] * Complex::new(factor, T::zero());
            }
        }
        Ok(())
    }

    /// Type-2 (uniform to non-uniform), complex path: deconvolve and embed
    /// `coeffs` into the oversampled grid, inverse FFT, interpolate at the
    /// bound points.
    pub fn exec_type2(
        &mut self,
        coeffs: &[&[Complex<T>]],
        out: &mut [Vec<Complex<T>>],
    ) -> Result<()> {
        let points = self.points.as_ref().ok_or(NufftError::NoPointsBound)?;
        if coeffs.len() != out.len() {
            return Err(NufftError::ChannelCountMismatch {
                expected: out.len(),
                got: coeffs.len(),
            });
        }
        let target_total: usize = self.target_sizes.iter().product();
        for c in coeffs.iter() {
            if c.len() != target_total {
                return Err(NufftError::OutputSizeMismatch {
                    expected: target_total,
                    got: c.len(),
                });
            }
        }
        let p = points.len();
        for o in out.iter() {
            if o.len() != p {
                return Err(NufftError::OutputSizeMismatch {
                    expected: p,
                    got: o.len(),
                });
            }
        }

        let target_strides = strides_for(&self.target_sizes);
        let spatial_strides = strides_for(&self.spatial_shape);
        let spatial_total: usize = self.spatial_shape.iter().product();
        let target_wavenumbers: Vec<Vec<i64>> = self
            .target_sizes
            .iter()
            .map(|&n| wavenumbers::signed(n))
            .collect();

        let kernels_ref = self.kernels_ref();

        for (c, coeff) in coeffs.iter().enumerate() {
            let mut grid = vec![Complex::new(T::zero(), T::zero()); spatial_total];
            for idx in 0..target_total {
                let axis_idx = decode(idx, &self.target_sizes, &target_strides);
                let ks: Vec<i64> = axis_idx
                    .iter()
                    .enumerate()
                    .map(|(d, &a)| target_wavenumbers[d][a])
                    .collect();
                let dest_offset: usize = ks
                    .iter()
                    .enumerate()
                    .map(|(d, &k)| map_index(k, self.spatial_shape[d]) * spatial_strides[d])
                    .sum();
                let factor = self.deconvolve_factor(&ks);
                grid[dest_offset] = coeff[idx] * Complex::new(factor, T::zero());
            }
            self.fft.inverse_complex(&mut grid, &self.spatial_shape);
            // `inverse_complex` normalizes by 1/spatial_total; undo that so the
            // grid pairs correctly with the Δx̃-weighted interpolation kernel
            // (spec §4.4/§4.5 — the quadrature weight and the FFT normalization
            // must agree on which side of the transform carries the 1/N factor).
            let spatial_total_t = T::from(spatial_total).unwrap();
            for v in grid.iter_mut() {
                *v = *v * Complex::new(spatial_total_t, T::zero());
            }
            let grids = [grid];
            let mut single_out = vec![vec![Complex::new(T::zero(), T::zero()); p]];
            interp::interpolate(points, &grids, &kernels_ref, &self.spatial_shape, &mut single_out);
            out[c] = std::mem::take(&mut single_out[0]);
        }
        Ok(())
    }

    /// Type-1, real path: spreads plain real `values`, uses the half-spectrum
    /// `realfft` backend, and returns coefficients over [`Plan::coeff_shape`].
    pub fn exec_type1_real(&mut self, values: &[&[T]], out: &mut [Vec<Complex<T>>]) -> Result<()> {
        let points = self.points.as_ref().ok_or(NufftError::NoPointsBound)?;
        if values.len() != out.len() {
            return Err(NufftError::ChannelCountMismatch {
                expected: out.len(),
                got: values.len(),
            });
        }
        let coeff_shape = self.coeff_shape();
        let coeff_total: usize = coeff_shape.iter().product();
        for o in out.iter() {
            if o.len() != coeff_total {
                return Err(NufftError::OutputSizeMismatch {
                    expected: coeff_total,
                    got: o.len(),
                });
            }
        }

        let complex_values: Vec<Vec<Complex<T>>> = values
            .iter()
            .map(|v| v.iter().map(|&x| Complex::new(x, T::zero())).collect())
            .collect();
        let complex_refs: Vec<&[Complex<T>]> = complex_values.iter().map(|v| v.as_slice()).collect();

        let kernels_ref = self.kernels_ref();
        let grids = spread::spread(points, &complex_refs, &kernels_ref, &self.spatial_shape);

        let coeff_strides = strides_for(&coeff_shape);
        let mut coeff_wavenumbers: Vec<Vec<i64>> = Vec::with_capacity(coeff_shape.len());
        coeff_wavenumbers.push(wavenumbers::real_half(self.target_sizes[0]));
        for &n in &self.target_sizes[1..] {
            coeff_wavenumbers.push(wavenumbers::signed(n));
        }

        for (c, grid) in grids.into_iter().enumerate() {
            let real_grid: Vec<T> = grid.iter().map(|v| v.re).collect();
            let (spectrum, fourier_shape) = self.fft.forward_real(&real_grid, &self.spatial_shape);
            let fourier_strides = strides_for(&fourier_shape);

            for idx in 0..coeff_total {
                let axis_idx = decode(idx, &coeff_shape, &coeff_strides);
                let ks: Vec<i64> = axis_idx
                    .iter()
                    .enumerate()
                    .map(|(d, &a)| coeff_wavenumbers[d][a])
                    .collect();
                let src_axis0 = ks[0] as usize; // real_half is already non-negative
                let mut src_offset = src_axis0 * fourier_strides[0];
                for d in 1..ks.len() {
                    src_offset += map_index(ks[d], fourier_shape[d]) * fourier_strides[d];
                }
                let factor = self.deconvolve_factor(&ks);
                out[c][idx] = spectrum[src_offset] * Complex::new(factor, T::zero());
            }
        }
        Ok(())
    }

    /// Type-2, real path: deconvolves and embeds half-spectrum `coeffs`,
    /// inverse real FFT, interpolates to real values at the bound points.
    pub fn exec_type2_real(&mut self, coeffs: &[&[Complex<T>]], out: &mut [Vec<T>]) -> Result<()> {
        let points = self.points.as_ref().ok_or(NufftError::NoPointsBound)?;
        if coeffs.len() != out.len() {
            return Err(NufftError::ChannelCountMismatch {
                expected: out.len(),
                got: coeffs.len(),
            });
        }
        let coeff_shape = self.coeff_shape();
        let coeff_total: usize = coeff_shape.iter().product();
        for c in coeffs.iter() {
            if c.len() != coeff_total {
                return Err(NufftError::OutputSizeMismatch {
                    expected: coeff_total,
                    got: c.len(),
                });
            }
        }
        let p = points.len();

        let coeff_strides = strides_for(&coeff_shape);
        let mut coeff_wavenumbers: Vec<Vec<i64>> = Vec::with_capacity(coeff_shape.len());
        coeff_wavenumbers.push(wavenumbers::real_half(self.target_sizes[0]));
        for &n in &self.target_sizes[1..] {
            coeff_wavenumbers.push(wavenumbers::signed(n));
        }

        let mut fourier_shape = self.spatial_shape.clone();
        fourier_shape[0] = self.spatial_shape[0] / 2 + 1;
        let fourier_strides = strides_for(&fourier_shape);
        let fourier_total: usize = fourier_shape.iter().product();

        let kernels_ref = self.kernels_ref();

        for (c, coeff) in coeffs.iter().enumerate() {
            let mut spectrum = vec![Complex::new(T::zero(), T::zero()); fourier_total];
            for idx in 0..coeff_total {
                let axis_idx = decode(idx, &coeff_shape, &coeff_strides);
                let ks: Vec<i64> = axis_idx
                    .iter()
                    .enumerate()
                    .map(|(d, &a)| coeff_wavenumbers[d][a])
                    .collect();
                let mut dest_offset = (ks[0] as usize) * fourier_strides[0];
                for d in 1..ks.len() {
                    dest_offset += map_index(ks[d], fourier_shape[d]) * fourier_strides[d];
                }
                let factor = self.deconvolve_factor(&ks);
                spectrum[dest_offset] = coeff[idx] * Complex::new(factor, T::zero());
            }

            let real_grid = self
                .fft
                .inverse_real(&spectrum, &fourier_shape, self.spatial_shape[0]);
            // `inverse_real` normalizes by 1/spatial_total; undo it for the same
            // reason as the complex path in `exec_type2`.
            let spatial_total: usize = self.spatial_shape.iter().product();
            let spatial_total_t = T::from(spatial_total).unwrap();
            let complex_grid: Vec<Complex<T>> = real_grid
                .iter()
                .map(|&v| Complex::new(v * spatial_total_t, T::zero()))
                .collect();
            let grids = [complex_grid];
            let mut single_out = vec![vec![Complex::new(T::zero(), T::zero()); p]];
            interp::interpolate(points, &grids, &kernels_ref, &self.spatial_shape, &mut single_out);
            out[c] = single_out[0].iter().map(|v| v.re).collect();
        }
        Ok(())
    }
}
