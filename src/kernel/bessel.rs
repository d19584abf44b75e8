//! Modified Bessel function `I0`, needed by the Kaiser-Bessel kernel family.
//!
//! Same texture as the teacher's `bessel_j1` (Abramowitz & Stegun rational
//! polynomial approximation, split at the `|x| = 3.75` boundary the A&S
//! tables use).

pub fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();

    if ax < 3.75 {
        let y = (x / 3.75) * (x / 3.75);
        1.0 + y
            * (3.5156229
                + y * (3.0899424
                    + y * (1.2067492 + y * (0.2659732 + y * (0.0360768 + y * 0.0045813)))))
    } else {
        let y = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.39894228
                + y * (0.01328592
                    + y * (0.00225319
                        + y * (-0.00157565
                            + y * (0.00916281
                                + y * (-0.02057706
                                    + y * (0.02635537 + y * (-0.01647633 + y * 0.00392377))))))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_values() {
        // Reference values from standard Bessel function tables.
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-8);
        assert!((bessel_i0(1.0) - 1.2660658777520084).abs() < 1e-7);
        assert!((bessel_i0(5.0) - 27.239871823604442).abs() < 1e-4);
        assert!((bessel_i0(10.0) - 2815.716628466254).abs() < 1.0);
    }

    #[test]
    fn is_even() {
        for x in [0.3, 1.7, 4.2, 9.9] {
            assert!((bessel_i0(x) - bessel_i0(-x)).abs() < 1e-9);
        }
    }
}
