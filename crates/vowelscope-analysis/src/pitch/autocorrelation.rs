//! Raw autocorrelation pitch detector.
//!
//! ```text
//! R(τ) = Σ_{i < N-τ} x[i] · x[i+τ]
//! ```
//!
//! The lag maximising `R` over `[fs / max_hz, fs / min_hz)` is the period.
//! `R` is not normalized, so the acceptance threshold is an absolute level.

use super::{PitchParams, rms};

/// Detect the pitch of `samples` in Hz, or `None` when silent or unvoiced.
pub fn detect(samples: &[f32], sample_rate: f32, params: &PitchParams) -> Option<f32> {
    if rms(samples) < params.silence_rms {
        return None;
    }

    let n = samples.len();
    let min_lag = ((sample_rate / params.max_frequency) as usize).max(1);
    let max_lag = ((sample_rate / params.min_frequency) as usize).min(n);

    let mut best_lag = 0;
    let mut best = f32::NEG_INFINITY;
    for lag in min_lag..max_lag {
        let correlation: f32 = samples[..n - lag]
            .iter()
            .zip(&samples[lag..])
            .map(|(a, b)| a * b)
            .sum();
        if correlation > best {
            best = correlation;
            best_lag = lag;
        }
    }

    if best_lag == 0 || best <= params.autocorrelation_threshold {
        return None;
    }
    Some(sample_rate / best_lag as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn detects_tone_at_16k() {
        let sample_rate = 16000.0;
        let signal: Vec<f32> = (0..2048)
            .map(|i| 0.5 * (2.0 * PI * 300.0 * i as f32 / sample_rate).sin())
            .collect();
        let pitch = detect(&signal, sample_rate, &PitchParams::default()).unwrap();
        assert!((pitch - 300.0).abs() < 6.0, "{pitch}");
    }

    #[test]
    fn weak_correlation_is_rejected() {
        // Loud enough to pass the gate, too short to build a correlation above 0.5.
        let signal: Vec<f32> = (0..64).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        assert_eq!(detect(&signal, 8000.0, &PitchParams::default()), None);
    }

    #[test]
    fn lag_range_is_clamped_to_frame() {
        let signal = vec![0.5; 32];
        // Constant input correlates best at the shortest lag; the frame is far
        // shorter than the 50 Hz lag and must not index past its end.
        let pitch = detect(&signal, 44100.0, &PitchParams::default());
        assert_eq!(pitch, Some(44100.0 / 22.0));
    }
}
