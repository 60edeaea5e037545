//! YIN pitch detector.
//!
//! De Cheveigné & Kawahara (2002), "YIN, a fundamental frequency estimator
//! for speech and music", JASA 111(4).
//!
//! 1. Difference function over a window of `W = N/2` samples:
//!    `d(τ) = Σ_{i<W} (x[i] - x[i+τ])²`, `τ ∈ [0, W)`
//! 2. Cumulative mean normalization:
//!    `d'(0) = 1`, `d'(τ) = d(τ)·τ / Σ_{j=1..τ} d(j)`
//! 3. First `τ ≥ 2` with `d'(τ)` under the absolute threshold, walked
//!    forward to the bottom of its dip
//! 4. Parabolic refinement of `τ`
//!
//! When no dip crosses the threshold the global minimum is used if it sits
//! under a relaxed threshold; such estimates are flagged `borderline`.

use super::{PitchParams, rms};
use crate::spectrum::parabolic_interpolation;

/// A voiced YIN detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YinEstimate {
    /// Pitch in Hz.
    pub frequency: f32,
    /// Normalized difference at the chosen lag (0 = perfectly periodic).
    pub aperiodicity: f32,
    /// True when only the relaxed fallback threshold was met.
    pub borderline: bool,
}

/// Difference function `d(τ)` for `τ ∈ [0, N/2)`.
pub fn difference(samples: &[f32]) -> Vec<f32> {
    let window = samples.len() / 2;
    (0..window)
        .map(|tau| {
            samples[..window]
                .iter()
                .zip(&samples[tau..tau + window])
                .map(|(a, b)| {
                    let d = a - b;
                    d * d
                })
                .sum()
        })
        .collect()
}

/// Cumulative-mean-normalized difference `d'(τ)`.
pub fn cumulative_mean_normalized(diff: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(diff.len());
    let mut running = 0.0f32;
    for (tau, &d) in diff.iter().enumerate() {
        if tau == 0 {
            out.push(1.0);
            continue;
        }
        running += d;
        out.push(if running > 0.0 { d * tau as f32 / running } else { 1.0 });
    }
    out
}

/// Detect the pitch of `samples`, or `None` when silent or aperiodic.
pub fn detect(samples: &[f32], sample_rate: f32, params: &PitchParams) -> Option<YinEstimate> {
    if rms(samples) < params.silence_rms {
        return None;
    }

    let cmnd = cumulative_mean_normalized(&difference(samples));
    if cmnd.len() < 3 {
        return None;
    }

    let (tau, borderline) = match first_dip(&cmnd, params.yin_threshold) {
        Some(tau) => (tau, false),
        None => {
            let (tau, &value) = cmnd
                .iter()
                .enumerate()
                .skip(2)
                .min_by(|a, b| a.1.total_cmp(b.1))?;
            if value >= params.yin_fallback_threshold {
                return None;
            }
            (tau, true)
        }
    };

    let refined = parabolic_interpolation(&cmnd, tau);
    if refined <= 0.0 {
        return None;
    }

    Some(YinEstimate {
        frequency: sample_rate / refined,
        aperiodicity: cmnd[tau],
        borderline,
    })
}

/// First lag under `threshold`, advanced while `d'` keeps falling.
fn first_dip(cmnd: &[f32], threshold: f32) -> Option<usize> {
    let mut tau = (2..cmnd.len()).find(|&t| cmnd[t] < threshold)?;
    while tau + 1 < cmnd.len() && cmnd[tau + 1] < cmnd[tau] {
        tau += 1;
    }
    Some(tau)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(freqs: &[(f32, f32)], sample_rate: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate;
                freqs
                    .iter()
                    .map(|&(f, a)| a * (2.0 * PI * f * t).sin())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn difference_is_zero_at_lag_zero() {
        let signal = tone(&[(440.0, 0.5)], 44100.0, 512);
        let diff = difference(&signal);
        assert_eq!(diff.len(), 256);
        assert_eq!(diff[0], 0.0);
        assert!(diff[50] > 0.0);
    }

    #[test]
    fn normalization_starts_at_one() {
        let cmnd = cumulative_mean_normalized(&[0.0, 2.0, 2.0, 0.5]);
        assert_eq!(cmnd[0], 1.0);
        assert_eq!(cmnd[1], 1.0);
        assert_eq!(cmnd[2], 1.0);
        assert!((cmnd[3] - 0.5 * 3.0 / 4.5).abs() < 1e-6);
    }

    #[test]
    fn harmonic_tone_reports_fundamental() {
        let signal = tone(&[(150.0, 0.6), (300.0, 0.3), (450.0, 0.15)], 48000.0, 2048);
        let estimate = detect(&signal, 48000.0, &PitchParams::default()).unwrap();
        assert!((estimate.frequency - 150.0).abs() < 1.5, "{}", estimate.frequency);
        assert!(!estimate.borderline);
        assert!(estimate.aperiodicity < 0.15);
    }

    #[test]
    fn sub_sample_refinement() {
        // Period of 44100 / 233 ≈ 189.27 samples: integer lags alone would be off by ~0.3 Hz.
        let signal = tone(&[(233.0, 0.7)], 44100.0, 2048);
        let estimate = detect(&signal, 44100.0, &PitchParams::default()).unwrap();
        assert!((estimate.frequency - 233.0).abs() < 0.5, "{}", estimate.frequency);
    }

    #[test]
    fn relaxed_threshold_flags_borderline() {
        let signal = tone(&[(40.0, 0.8)], 8000.0, 512);
        let strict = PitchParams {
            yin_threshold: 0.0,
            ..PitchParams::default()
        };
        let estimate = detect(&signal, 8000.0, &strict).unwrap();
        assert!(estimate.borderline);
        assert!((estimate.frequency - 40.0).abs() < 1.0, "{}", estimate.frequency);

        let rejected = PitchParams {
            yin_fallback_threshold: 0.0,
            ..strict
        };
        assert_eq!(detect(&signal, 8000.0, &rejected), None);

        let normal = detect(&signal, 8000.0, &PitchParams::default()).unwrap();
        assert!(!normal.borderline);
    }

    #[test]
    fn first_dip_walks_to_bottom() {
        let cmnd = [1.0, 0.9, 0.8, 0.12, 0.08, 0.05, 0.09, 0.02];
        assert_eq!(first_dip(&cmnd, 0.15), Some(5));
        assert_eq!(first_dip(&cmnd, 0.01), None);
    }
}
