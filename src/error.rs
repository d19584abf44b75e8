use thiserror::Error;

/// All failure modes a plan or transform can surface.
///
/// Kinds follow spec §7: precondition errors are fatal to the current call
/// only (the plan remains valid afterwards); numerical errors come from
/// kernel-parameter construction; resource errors come from the FFT backend.
#[derive(Error, Debug)]
pub enum NufftError {
    #[error("dimension mismatch: expected {expected} axes, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid target size N={n} on axis {axis}")]
    InvalidSize { axis: usize, n: usize },

    #[error("half-width M={m} must satisfy M < N/2 (N={n}) on axis {axis}")]
    HalfWidthTooLarge { axis: usize, m: usize, n: usize },

    #[error("point set length mismatch: axis {axis} has {got} points, expected {expected}")]
    PointCountMismatch {
        axis: usize,
        expected: usize,
        got: usize,
    },

    #[error("no points bound to plan")]
    NoPointsBound,

    #[error("channel count mismatch: expected {expected}, got {got}")]
    ChannelCountMismatch { expected: usize, got: usize },

    #[error("output buffer size mismatch: expected {expected} coefficients, got {got}")]
    OutputSizeMismatch { expected: usize, got: usize },

    #[error("kernel shape parameter overflow (M={m}, sigma={sigma}): {reason}")]
    KernelParameterOverflow {
        m: usize,
        sigma: f64,
        reason: String,
    },

    #[error("FFT planner failed: {0}")]
    FftPlanner(String),
}

pub type Result<T> = std::result::Result<T, NufftError>;
