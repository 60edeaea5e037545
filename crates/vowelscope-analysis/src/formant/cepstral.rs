//! Cepstral envelope: liftered real cepstrum transformed back to a smooth
//! log-magnitude spectrum.

use rustfft::num_complex::Complex;

use super::{FormantParams, FormantSet, envelope_peaks};
use crate::fft::{Fft, hamming_windowed};
use crate::spectrum::bin_width;

const LOG_FLOOR: f32 = 1e-10;

/// Smoothed log-magnitude envelope over the first `N/2` bins.
pub(super) fn log_envelope(samples: &[f32], lifter: usize, fft: &Fft) -> Vec<f32> {
    let n = samples.len();
    let mut buffer: Vec<Complex<f32>> = hamming_windowed(samples)
        .into_iter()
        .map(|x| Complex::new(x, 0.0))
        .collect();

    fft.forward_complex(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex::new((c.norm() + LOG_FLOOR).ln(), 0.0);
    }

    fft.inverse_complex(&mut buffer);
    for (i, c) in buffer.iter_mut().enumerate() {
        if i >= lifter && i <= n - lifter.min(n) {
            *c = Complex::new(0.0, 0.0);
        }
    }

    fft.forward_complex(&mut buffer);
    buffer.iter().take(n / 2).map(|c| c.re).collect()
}

/// Cepstral bins below a quefrency of `cutoff_ms`, at least one and at most half the frame.
pub(super) fn lifter_bins(cutoff_ms: f32, sample_rate: f32, frame_len: usize) -> usize {
    let bins = (cutoff_ms * sample_rate / 1000.0).round().max(1.0) as usize;
    bins.min((frame_len / 2).max(1))
}

pub(super) fn estimate(
    samples: &[f32],
    sample_rate: f32,
    params: &FormantParams,
    fft: &Fft,
) -> FormantSet {
    let lifter = lifter_bins(params.cepstral_lifter_ms, sample_rate, samples.len());
    let envelope = log_envelope(samples, lifter, fft);
    envelope_peaks(&envelope, bin_width(sample_rate, envelope.len()), params)
}
