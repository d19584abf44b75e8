//! Point-to-cell indexing (spec §4.3): mapping a periodic coordinate to its
//! owning grid cell, and expanding that central cell into its `2M` wrapped
//! neighbours.

use num_traits::Float;

/// Reduce `x` to the fundamental cell `[0, 2*pi)`.
pub fn to_unit_cell<T: Float>(x: T) -> T {
    let tau = T::from(std::f64::consts::TAU).unwrap();
    let y = x - tau * (x / tau).floor();
    // Guard the rare case where floating-point rounding leaves y == tau.
    if y >= tau {
        T::zero()
    } else {
        y
    }
}

/// 1-based index of the grid cell owning `x`, given cell step `dx` and axis
/// length `n`. `x` must already be canonicalised to `[0, 2*pi)`.
///
/// Implements spec §4.3's floor convention `i = floor(x/dx) + 1`, with the
/// floating-point drift guard `i += (i*dx <= x)` that repairs the rare case
/// where rounding leaves `x` at or past `i*dx` by a single ULP, so the
/// invariant `(i-1)*dx <= x < i*dx` holds exactly.
pub fn cell_index<T: Float>(x: T, dx: T, n: usize) -> usize {
    let mut i = (x / dx).floor().to_i64().unwrap_or(0) + 1;
    if T::from(i).unwrap() * dx <= x {
        i += 1;
    }
    i.clamp(1, n as i64) as usize
}

/// The `2M` periodic neighbour cell indices (1-based) around central cell
/// `i`, wrapped modulo axis length `n`.
///
/// Equals `{ ((i - M + j - 1) mod N) + 1 : j = 1..=2M }`, produced via a
/// single modulo to find the first neighbour and a branch-light ternary
/// wrap for the rest.
pub fn neighbours(i: usize, m: usize, n: usize) -> Vec<usize> {
    debug_assert!(2 * m < n, "half-width must satisfy M < N/2");
    let mut j = modn(i as isize - 1 - m as isize, n) + 1;
    let mut out = Vec::with_capacity(2 * m);
    for _ in 0..2 * m {
        out.push(j);
        j = if j == n { 1 } else { j + 1 };
    }
    out
}

/// Non-wrapping neighbour expansion for interior-block callers that have
/// already guaranteed `i - M + 1 ..= i + M` stays in range.
pub fn neighbours_no_wrap(i: usize, m: usize) -> Vec<usize> {
    ((i as isize - m as isize + 1)..=(i as isize + m as isize))
        .map(|v| v as usize)
        .collect()
}

fn modn(x: isize, n: usize) -> usize {
    let n_i = n as isize;
    (((x % n_i) + n_i) % n_i) as usize
}
