//! Non-uniform fast Fourier transform engine.
//!
//! The hard part lives in the spreading/interpolation layer and the kernel
//! library (see [`kernel`] and [`spread`]/[`interp`]); [`plan`] is the driver
//! that ties them to an FFT on an oversampled grid. The FFT itself is
//! delegated to `rustfft`/`realfft` (see [`fft`]), which this crate treats as
//! an external collaborator rather than something to reimplement.

pub mod consts;
pub mod error;
pub mod fft;
pub mod grid;
pub mod interp;
pub mod kernel;
pub mod plan;
pub mod points;
pub mod poly;
pub mod spread;

pub use error::{NufftError, Result};
pub use kernel::{KernelDescriptor, KernelFamily};
pub use plan::{Plan, PlanBuilder};
pub use points::PointSet;
