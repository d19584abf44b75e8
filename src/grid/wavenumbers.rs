//! FFT-natural wavenumber layouts (spec §4.6/§6).

/// Signed wraparound layout `0, 1, ..., N/2-1, -N/2, ..., -1` used on every
/// axis for complex transforms, and on all but the first axis of a real
/// transform.
pub fn signed(n: usize) -> Vec<i64> {
    let half = (n as i64 + 1) / 2;
    (0..n as i64)
        .map(|k| if k < half { k } else { k - n as i64 })
        .collect()
}

/// Real-FFT half-spectrum layout `0, 1, ..., N/2` used on the first axis of
/// a real transform.
pub fn real_half(n: usize) -> Vec<i64> {
    (0..=(n / 2) as i64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_matches_fft_freq_convention_even() {
        assert_eq!(signed(8), vec![0, 1, 2, 3, -4, -3, -2, -1]);
    }

    #[test]
    fn signed_matches_fft_freq_convention_odd() {
        assert_eq!(signed(5), vec![0, 1, 2, -2, -1]);
    }

    #[test]
    fn real_half_covers_nyquist() {
        assert_eq!(real_half(8), vec![0, 1, 2, 3, 4]);
        assert_eq!(real_half(7), vec![0, 1, 2, 3]);
    }
}
