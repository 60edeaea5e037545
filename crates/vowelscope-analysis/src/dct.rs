//! Unnormalized DCT-II / DCT-III pair.
//!
//! Neither direction applies orthogonality scaling, so `idct(dct(x))` returns
//! `x` scaled by `N / 2`. Callers only rely on the relative shape.

use std::f32::consts::PI;

/// DCT-II of `input`, keeping the first `num_coeffs` coefficients.
///
/// ```text
/// X[k] = Σ_n x[n] · cos(π·k·(n + ½) / N)
/// ```
pub fn dct(input: &[f32], num_coeffs: usize) -> Vec<f32> {
    let n = input.len();
    if n == 0 {
        return vec![0.0; num_coeffs];
    }

    (0..num_coeffs)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(i, &x)| x * (PI * k as f32 * (i as f32 + 0.5) / n as f32).cos())
                .sum()
        })
        .collect()
}

/// DCT-III of `coeffs`, evaluated at `num_points` output points.
///
/// ```text
/// x[n] = X[0] / 2 + Σ_{k≥1} X[k] · cos(π·k·(n + ½) / N)
/// ```
pub fn idct(coeffs: &[f32], num_points: usize) -> Vec<f32> {
    if num_points == 0 {
        return Vec::new();
    }
    let dc = coeffs.first().copied().unwrap_or(0.0) * 0.5;

    (0..num_points)
        .map(|i| {
            let phase = (i as f32 + 0.5) / num_points as f32;
            dc + coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, &c)| c * (PI * k as f32 * phase).cos())
                .sum::<f32>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argmax(values: &[f32]) -> usize {
        values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn full_round_trip_scales_by_half_length() {
        let input: Vec<f32> = (0..16).map(|i| (i as f32 * 0.7).sin()).collect();
        let restored = idct(&dct(&input, 16), 16);
        for (a, b) in input.iter().zip(&restored) {
            assert!((a * 8.0 - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn truncated_round_trip_keeps_peak_position() {
        let input: Vec<f32> = (0..40)
            .map(|i| (-((i as f32 - 12.0) / 4.0).powi(2)).exp())
            .collect();
        let smooth = idct(&dct(&input, 13), 40);
        assert_eq!(argmax(&smooth), 12);
    }

    #[test]
    fn constant_input_has_only_dc() {
        let coeffs = dct(&[2.0; 8], 4);
        assert!((coeffs[0] - 16.0).abs() < 1e-4);
        for c in &coeffs[1..] {
            assert!(c.abs() < 1e-4);
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(dct(&[], 3), vec![0.0; 3]);
        assert!(idct(&[1.0], 0).is_empty());
    }
}
