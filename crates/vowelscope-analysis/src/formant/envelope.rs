//! Linear-prediction envelope over the magnitude spectrum (Burg or
//! pre-emphasized autocorrelation LPC), with a rolling-history fallback.
//!
//! The spectrum is treated as a sequence: normalized to its peak, modelled
//! by an all-pole predictor, and replaced by its centred prediction (the
//! mean of the forward and backward one-step predictions, which keeps peaks
//! in place). The autocorrelation-LPC variant models the pre-emphasized
//! sequence and de-emphasizes the prediction. After smoothing, the tallest
//! envelope maximum in each of the F1 and F2 bands gives the pair.

use super::{FormantAlgorithm, FormantParams, FormantSet, band_bins};
use crate::history::History;
use crate::lpc::{autocorrelation, burg, de_emphasis, levinson_durbin, pre_emphasis};
use crate::spectrum::{bin_width, local_maxima, parabolic_interpolation, smooth_spectrum};

pub(super) fn estimate(
    spectrum: &[f32],
    sample_rate: f32,
    algorithm: FormantAlgorithm,
    params: &FormantParams,
    history: &mut History<[f32; 2]>,
) -> FormantSet {
    let peak = spectrum.iter().copied().fold(0.0f32, f32::max);
    let normalized: Vec<f32> = if peak > 0.0 {
        spectrum.iter().map(|m| m / peak).collect()
    } else {
        spectrum.to_vec()
    };

    let autocorrelation_lpc = algorithm == FormantAlgorithm::AutocorrelationLpc;
    let signal = if autocorrelation_lpc {
        pre_emphasis(&normalized, params.pre_emphasis)
    } else {
        normalized
    };
    let model = if autocorrelation_lpc {
        levinson_durbin(&autocorrelation(&signal, params.autocorrelation_order))
    } else {
        burg(&signal, params.burg_order)
    };

    let model = match model {
        Ok(model) => model,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(algorithm = algorithm.name(), error = %_err, "formant: degenerate spectrum");
            return FormantSet::default();
        }
    };

    let predicted = model.predict_centered(&signal);
    let predicted = if autocorrelation_lpc {
        de_emphasis(&predicted, params.pre_emphasis)
    } else {
        predicted
    };
    let envelope = smooth_spectrum(&predicted, params.smoothing_window);
    let bin_hz = bin_width(sample_rate, spectrum.len());

    if let Some([f1, f2]) = pick_pair(&envelope, bin_hz, params) {
        history.push([f1, f2]);
        return FormantSet::from_frequencies([f1, f2]);
    }

    let [f1, f2] = history.mean().unwrap_or(params.fallback_formants);
    #[cfg(feature = "tracing")]
    tracing::debug!(f1, f2, history = history.len(), "formant: no valid pair, using fallback");
    FormantSet::from_frequencies([f1, f2])
}

/// Tallest envelope maximum in the F1 band, then in the F2 band at least
/// `min_formant_spacing` above it.
fn pick_pair(envelope: &[f32], bin_hz: f32, params: &FormantParams) -> Option<[f32; 2]> {
    let maxima = local_maxima(envelope);
    let tallest_in = |band: std::ops::Range<usize>, min_hz: f32| {
        maxima
            .iter()
            .copied()
            .filter(|i| band.contains(i))
            .map(|i| (parabolic_interpolation(envelope, i) * bin_hz, envelope[i]))
            .filter(|&(f, _)| f >= min_hz)
            .fold(None, |best: Option<(f32, f32)>, cand| match best {
                Some(b) if b.1 >= cand.1 => Some(b),
                _ => Some(cand),
            })
    };

    let (f1, _) = tallest_in(band_bins(params.envelope_f1_band, bin_hz, envelope.len()), 0.0)?;
    let (f2, _) = tallest_in(
        band_bins(params.envelope_f2_band, bin_hz, envelope.len()),
        f1 + params.min_formant_spacing,
    )?;
    Some([f1, f2])
}
