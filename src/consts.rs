/// Minimum number of non-uniform points to use point-level Rayon parallelism
/// for spreading and interpolation.
pub const PARALLEL_POINT_THRESHOLD: usize = 4_096;

/// Default polynomial degree + 1 (N in spec terms) used by piecewise-poly
/// kernel fits when the caller doesn't request a specific accuracy.
pub const DEFAULT_POLY_SIZE: usize = 8;

/// Default oversampling factor when the caller doesn't request one.
pub const DEFAULT_SIGMA: f64 = 2.0;

/// Default kernel half-width.
pub const DEFAULT_HALF_WIDTH: usize = 6;

/// Small epsilon used to guard divisions and near-boundary comparisons.
pub const EPSILON: f64 = 1e-13;
