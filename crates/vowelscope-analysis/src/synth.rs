//! Synthetic test signals
//!
//! Deterministic sources with known pitch and formants, used by the tests,
//! benches and the `generate` command of the CLI.

use std::f32::consts::PI;

/// Peak level of [`synthetic_vowel`] output
pub const VOWEL_PEAK: f32 = 0.5;

/// A vocal-tract resonance: centre frequency and -3 dB bandwidth in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resonance {
    /// Centre frequency in Hz
    pub frequency: f32,
    /// Bandwidth in Hz
    pub bandwidth: f32,
}

impl Resonance {
    /// Create a resonance
    pub const fn new(frequency: f32, bandwidth: f32) -> Self {
        Self {
            frequency,
            bandwidth,
        }
    }
}

/// Generate a sine tone of `num_samples` samples
pub fn sine(sample_rate: f32, frequency: f32, num_samples: usize, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Generate a vowel-like signal: an impulse train at `f0` through a cascade
/// of two-pole resonators.
///
/// Each resonator is `y[n] = x[n] + 2r·cos(θ)·y[n-1] - r²·y[n-2]` with
/// `r = e^{-πB/sr}` and `θ = 2πF/sr`. The output is scaled to a peak of
/// [`VOWEL_PEAK`].
pub fn synthetic_vowel(
    sample_rate: f32,
    f0: f32,
    formants: &[Resonance],
    num_samples: usize,
) -> Vec<f32> {
    let period = (sample_rate / f0.max(1.0)).round().max(1.0) as usize;
    let mut signal: Vec<f64> = (0..num_samples)
        .map(|i| if i % period == 0 { 1.0 } else { 0.0 })
        .collect();

    for resonance in formants {
        let r = (-std::f64::consts::PI * resonance.bandwidth as f64 / sample_rate as f64).exp();
        let theta = 2.0 * std::f64::consts::PI * resonance.frequency as f64 / sample_rate as f64;
        let (a1, a2) = (2.0 * r * theta.cos(), -r * r);
        let (mut y1, mut y2) = (0.0f64, 0.0f64);
        for x in signal.iter_mut() {
            let y = *x + a1 * y1 + a2 * y2;
            y2 = y1;
            y1 = y;
            *x = y;
        }
    }

    let peak = signal.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    let scale = if peak > 0.0 { VOWEL_PEAK as f64 / peak } else { 0.0 };
    signal.iter().map(|&x| (x * scale) as f32).collect()
}
