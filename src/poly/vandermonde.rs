//! Small dense Vandermonde solve: `A c = y` with `A_ij = x_i^(j-1)`.
//!
//! `N` is a small compile-time-ish constant (4-10 in practice), so a
//! hand-rolled Gaussian elimination with partial pivoting is plenty — no
//! need to reach for a linear-algebra crate for this.

/// Solve for polynomial coefficients `c[0..n]` (low-to-high degree) such
/// that `sum_j c[j] * x[i]^j == y[i]` for every node `x[i]`.
pub fn solve(nodes: &[f64], values: &[f64]) -> Vec<f64> {
    let n = nodes.len();
    assert_eq!(n, values.len());

    // Build the augmented Vandermonde matrix A | y, row i = [1, x_i, x_i^2, ...].
    let mut aug = vec![vec![0.0f64; n + 1]; n];
    for (i, &x) in nodes.iter().enumerate() {
        let mut p = 1.0;
        for j in 0..n {
            aug[i][j] = p;
            p *= x;
        }
        aug[i][n] = values[i];
    }

    // Gaussian elimination with partial pivoting.
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| aug[a][col].abs().partial_cmp(&aug[b][col].abs()).unwrap())
            .unwrap();
        aug.swap(col, pivot_row);

        let pivot = aug[col][col];
        assert!(pivot.abs() > 1e-300, "singular Vandermonde system");

        for row in (col + 1)..n {
            let factor = aug[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..=n {
                aug[row][k] -= factor * aug[col][k];
            }
        }
    }

    // Back-substitution.
    let mut c = vec![0.0f64; n];
    for row in (0..n).rev() {
        let mut rhs = aug[row][n];
        for k in (row + 1)..n {
            rhs -= aug[row][k] * c[k];
        }
        c[row] = rhs / aug[row][row];
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_known_linear_fit() {
        // y = 2 + 3x fit through two nodes.
        let nodes = [0.0, 1.0];
        let values = [2.0, 5.0];
        let c = solve(&nodes, &values);
        assert!((c[0] - 2.0).abs() < 1e-10);
        assert!((c[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn solves_quadratic_fit() {
        let nodes = [-1.0, 0.3, 0.9];
        let f = |x: f64| 1.0 - 2.0 * x + 4.0 * x * x;
        let values: Vec<f64> = nodes.iter().map(|&x| f(x)).collect();
        let c = solve(&nodes, &values);
        for &x in &nodes {
            let p = c[0] + c[1] * x + c[2] * x * x;
            assert!((p - f(x)).abs() < 1e-8);
        }
    }
}
