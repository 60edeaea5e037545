//! LPC peak picking over the Levinson-Durbin all-pole envelope.

use super::{FormantParams, FormantSet, envelope_peaks};
use crate::fft::hamming_windowed;
use crate::lpc::{autocorrelation, levinson_durbin};

pub(super) fn estimate(samples: &[f32], sample_rate: f32, params: &FormantParams) -> FormantSet {
    let windowed = hamming_windowed(samples);
    let autocorr = autocorrelation(&windowed, params.lpc_order);

    let model = match levinson_durbin(&autocorr) {
        Ok(model) => model,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_err, "lpc: degenerate frame");
            return FormantSet::default();
        }
    };

    let points = params.envelope_points.max(2);
    let envelope = model.envelope(points);
    let step_hz = sample_rate / 2.0 / (points - 1) as f32;
    envelope_peaks(&envelope, step_hz, params)
}
