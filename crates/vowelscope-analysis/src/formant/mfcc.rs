//! Mel-cepstral envelope: log Mel energies smoothed by truncating their DCT.

use super::{FormantParams, FormantSet};
use crate::dct::{dct, idct};
use crate::fft::{Fft, hamming_windowed};
use crate::mel::MelFilterbank;
use crate::spectrum::{bin_width, local_maxima, parabolic_interpolation};

const LOG_FLOOR: f32 = 1e-10;

/// High-frequency attenuation `1 / (1 + (f/1000)^1.5)`.
fn de_emphasis(frequency: f32) -> f32 {
    1.0 / (1.0 + (frequency / 1000.0).powf(1.5))
}

pub(super) fn estimate(
    samples: &[f32],
    sample_rate: f32,
    params: &FormantParams,
    fft: &Fft,
    filterbank: &mut Option<MelFilterbank>,
) -> FormantSet {
    let n = samples.len();
    let num_bins = n / 2;
    let bin_hz = bin_width(sample_rate, num_bins);

    let power: Vec<f32> = fft
        .forward(&hamming_windowed(samples))
        .iter()
        .take(num_bins)
        .enumerate()
        .map(|(k, c)| c.norm_sqr() * de_emphasis(k as f32 * bin_hz))
        .collect();

    if filterbank
        .as_ref()
        .is_some_and(|fb| !fb.matches(params.mel_filters, n, sample_rate))
    {
        *filterbank = None;
    }
    let filterbank = filterbank.get_or_insert_with(|| {
        #[cfg(feature = "tracing")]
        tracing::debug!(filters = params.mel_filters, fft_size = n, sample_rate, "mfcc: building filterbank");
        MelFilterbank::new(params.mel_filters, n, sample_rate)
    });

    let log_energies: Vec<f32> = filterbank
        .apply(&power)
        .into_iter()
        .map(|e| (e + LOG_FLOOR).ln())
        .collect();
    let coeffs = dct(&log_energies, params.mfcc_coefficients);
    let envelope = idct(&coeffs, log_energies.len());

    FormantSet::from_frequencies(
        local_maxima(&envelope)
            .into_iter()
            .map(|i| filterbank.center_frequency(parabolic_interpolation(&envelope, i)))
            .filter(|&f| f > params.min_frequency && f < params.max_frequency),
    )
}
