//! Formant estimation.
//!
//! Seven interchangeable algorithms sit behind one [`FormantEstimator`]:
//!
//! | Algorithm | Input | Method |
//! |---|---|---|
//! | [`TwoPeak`](FormantAlgorithm::TwoPeak) | spectrum | tallest bins in an F1 and an F2 band |
//! | [`Lpc`](FormantAlgorithm::Lpc) | samples | Levinson-Durbin all-pole envelope peaks |
//! | [`Cepstral`](FormantAlgorithm::Cepstral) | samples | liftered real cepstrum |
//! | [`Mfcc`](FormantAlgorithm::Mfcc) | samples | Mel energies smoothed through DCT/IDCT |
//! | [`Burg`](FormantAlgorithm::Burg) | spectrum | Burg envelope with history fallback |
//! | [`AutocorrelationLpc`](FormantAlgorithm::AutocorrelationLpc) | spectrum | pre-emphasized Levinson-Durbin envelope with history fallback |
//! | [`Density`](FormantAlgorithm::Density) | spectrum | valley search with bandwidths |
//!
//! Silence, unvoiced frames and degenerate linear-prediction input give an
//! empty [`FormantSet`]. Errors are reserved for misuse, such as asking a
//! sample-based algorithm to run on a spectrum-only frame.

mod cepstral;
mod density;
mod envelope;
mod lpc;
mod mfcc;
mod two_peak;

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::{AnalysisError, BufferKind, Result};
use crate::fft::{Fft, planned};
use crate::frame::AudioFrame;
use crate::history::History;
use crate::mel::MelFilterbank;
use crate::pitch::rms;

/// Most formants any algorithm reports.
pub const MAX_FORMANTS: usize = 3;

/// Formant estimation algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum FormantAlgorithm {
    /// Tallest bins in fixed F1/F2 bands.
    TwoPeak,
    /// Levinson-Durbin LPC envelope peak picking.
    #[default]
    Lpc,
    /// Liftered cepstral envelope.
    Cepstral,
    /// Mel-cepstral envelope.
    Mfcc,
    /// Burg envelope over the spectrum.
    Burg,
    /// Pre-emphasized autocorrelation LPC envelope over the spectrum.
    AutocorrelationLpc,
    /// Density / valley search.
    Density,
}

impl FormantAlgorithm {
    /// Every algorithm, in declaration order.
    pub const ALL: [FormantAlgorithm; 7] = [
        FormantAlgorithm::TwoPeak,
        FormantAlgorithm::Lpc,
        FormantAlgorithm::Cepstral,
        FormantAlgorithm::Mfcc,
        FormantAlgorithm::Burg,
        FormantAlgorithm::AutocorrelationLpc,
        FormantAlgorithm::Density,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            FormantAlgorithm::TwoPeak => "twoPeak",
            FormantAlgorithm::Lpc => "lpc",
            FormantAlgorithm::Cepstral => "cepstral",
            FormantAlgorithm::Mfcc => "mfcc",
            FormantAlgorithm::Burg => "burg",
            FormantAlgorithm::AutocorrelationLpc => "autocorrelationLPC",
            FormantAlgorithm::Density => "density",
        }
    }

    /// Buffer this algorithm reads from a frame.
    pub fn input(self) -> BufferKind {
        match self {
            FormantAlgorithm::Lpc | FormantAlgorithm::Cepstral | FormantAlgorithm::Mfcc => {
                BufferKind::Samples
            }
            FormantAlgorithm::TwoPeak
            | FormantAlgorithm::Burg
            | FormantAlgorithm::AutocorrelationLpc
            | FormantAlgorithm::Density => BufferKind::Spectrum,
        }
    }
}

impl fmt::Display for FormantAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormantAlgorithm {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        FormantAlgorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(&key))
            .ok_or_else(|| AnalysisError::UnknownAlgorithm {
                kind: "formant",
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for FormantAlgorithm {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FormantAlgorithm> for String {
    fn from(value: FormantAlgorithm) -> Self {
        value.name().to_string()
    }
}

/// Lower and upper edge of a formant in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bandwidth {
    /// Lower edge.
    pub low_hz: f32,
    /// Upper edge.
    pub high_hz: f32,
}

impl Bandwidth {
    /// Width in Hz.
    pub fn width(&self) -> f32 {
        self.high_hz - self.low_hz
    }
}

/// One resonance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Formant {
    /// Centre frequency in Hz.
    pub frequency_hz: f32,
    /// Band edges, for algorithms that measure them.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bandwidth: Option<Bandwidth>,
}

impl Formant {
    /// Formant without bandwidth.
    pub fn new(frequency_hz: f32) -> Self {
        Self {
            frequency_hz,
            bandwidth: None,
        }
    }

    /// Formant with bandwidth.
    pub fn with_bandwidth(frequency_hz: f32, bandwidth: Bandwidth) -> Self {
        Self {
            frequency_hz,
            bandwidth: Some(bandwidth),
        }
    }
}

/// Up to [`MAX_FORMANTS`] formants, F1 first. Empty means nothing was detected.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct FormantSet {
    formants: Vec<Formant>,
}

impl FormantSet {
    /// Collect formants, keeping the first [`MAX_FORMANTS`].
    pub fn new(formants: impl IntoIterator<Item = Formant>) -> Self {
        Self {
            formants: formants.into_iter().take(MAX_FORMANTS).collect(),
        }
    }

    /// Formants without bandwidths from bare frequencies.
    pub fn from_frequencies(frequencies: impl IntoIterator<Item = f32>) -> Self {
        Self::new(frequencies.into_iter().map(Formant::new))
    }

    /// First formant.
    pub fn f1(&self) -> Option<&Formant> {
        self.formants.first()
    }

    /// Second formant.
    pub fn f2(&self) -> Option<&Formant> {
        self.formants.get(1)
    }

    /// Third formant.
    pub fn f3(&self) -> Option<&Formant> {
        self.formants.get(2)
    }

    /// Centre frequencies in order.
    pub fn frequencies(&self) -> Vec<f32> {
        self.formants.iter().map(|f| f.frequency_hz).collect()
    }

    /// Iterate the formants.
    pub fn iter(&self) -> std::slice::Iter<'_, Formant> {
        self.formants.iter()
    }

    /// Number of formants.
    pub fn len(&self) -> usize {
        self.formants.len()
    }

    /// True when nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.formants.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormantSet {
    type Item = &'a Formant;
    type IntoIter = std::slice::Iter<'a, Formant>;

    fn into_iter(self) -> Self::IntoIter {
        self.formants.iter()
    }
}

/// Tunables for every formant algorithm.
///
/// Bands are `[low, high)` in Hz.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FormantParams {
    /// Sample-based frames with RMS below this are silent.
    pub silence_rms: f32,
    /// Lower bound (exclusive) of reported peaks for envelope peak pickers.
    pub min_frequency: f32,
    /// Upper bound (exclusive) of reported peaks for envelope peak pickers.
    pub max_frequency: f32,

    /// Levinson-Durbin order of the `lpc` algorithm.
    pub lpc_order: usize,
    /// Envelope evaluation points from DC to Nyquist.
    pub envelope_points: usize,
    /// Quefrency in milliseconds below which the cepstral lifter keeps bins.
    pub cepstral_lifter_ms: f32,
    /// Mel filters of the `mfcc` algorithm.
    pub mel_filters: usize,
    /// Cepstral coefficients kept by the `mfcc` algorithm.
    pub mfcc_coefficients: usize,

    /// F1 band of the two-peak heuristic.
    pub two_peak_f1_band: [f32; 2],
    /// F2 band of the two-peak heuristic.
    pub two_peak_f2_band: [f32; 2],
    /// Bins F2 must sit above F1 in the two-peak heuristic.
    pub min_peak_separation_bins: usize,
    /// Smallest peak magnitude the two-peak heuristic accepts.
    pub min_peak_magnitude: f32,

    /// Burg model order.
    pub burg_order: usize,
    /// Levinson-Durbin order of the `autocorrelationLPC` algorithm.
    pub autocorrelation_order: usize,
    /// First-difference coefficient applied before `autocorrelationLPC`.
    pub pre_emphasis: f32,
    /// Moving-average width applied to envelopes, in bins.
    pub smoothing_window: usize,
    /// F1 band of the envelope algorithms.
    pub envelope_f1_band: [f32; 2],
    /// F2 band of the envelope algorithms.
    pub envelope_f2_band: [f32; 2],
    /// Minimum F2 - F1 distance for the envelope algorithms.
    pub min_formant_spacing: f32,
    /// F1/F2 reported by the envelope algorithms before any history exists.
    pub fallback_formants: [f32; 2],
    /// Accepted F1/F2 pairs kept for fallback.
    pub history_len: usize,

    /// F1 band of the density search.
    pub density_f1_band: [f32; 2],
    /// Fraction of the peak that ends a valley walk.
    pub valley_ratio: f32,
    /// Valley width beyond which a fixed window is slid across the band, in Hz.
    pub max_valley_width: f32,
    /// Width of that sliding window, in Hz.
    pub density_window: f32,
    /// Distance above F1 where the F2 search starts, in Hz.
    pub f2_search_offset: f32,
    /// Highest start of an F2 window, in Hz.
    pub f2_search_ceiling: f32,
    /// Share of F1's window energy an F2 window must reach.
    pub f2_energy_ratio: f32,
    /// Smallest F1 peak the density search accepts.
    pub density_floor: f32,
}

impl Default for FormantParams {
    fn default() -> Self {
        Self {
            silence_rms: 0.001,
            min_frequency: 200.0,
            max_frequency: 5000.0,

            lpc_order: 12,
            envelope_points: 512,
            cepstral_lifter_ms: 1.1,
            mel_filters: 40,
            mfcc_coefficients: 13,

            two_peak_f1_band: [300.0, 1000.0],
            two_peak_f2_band: [700.0, 2560.0],
            min_peak_separation_bins: 5,
            min_peak_magnitude: 1.0,

            burg_order: 16,
            autocorrelation_order: 20,
            pre_emphasis: 0.95,
            smoothing_window: 5,
            envelope_f1_band: [250.0, 1000.0],
            envelope_f2_band: [800.0, 3000.0],
            min_formant_spacing: 150.0,
            fallback_formants: [400.0, 1200.0],
            history_len: 5,

            density_f1_band: [300.0, 1000.0],
            valley_ratio: 0.41,
            max_valley_width: 400.0,
            density_window: 200.0,
            f2_search_offset: 120.0,
            f2_search_ceiling: 3000.0,
            f2_energy_ratio: 2.0 / 3.0,
            density_floor: 1.0,
        }
    }
}

/// Estimate formants of one frame with a fresh estimator.
pub fn estimate_formants(frame: &AudioFrame, algorithm: FormantAlgorithm) -> Result<FormantSet> {
    FormantEstimator::new(algorithm).estimate(frame)
}

/// Formant estimator owning the per-session state some algorithms keep.
///
/// The Burg and autocorrelation-LPC algorithms remember recently accepted
/// F1/F2 pairs and report their mean when a frame yields no valid pair. The
/// MFCC algorithm caches its filterbank. [`reset`](Self::reset) forgets the
/// history when a new session starts.
#[derive(Debug)]
pub struct FormantEstimator {
    algorithm: FormantAlgorithm,
    params: FormantParams,
    fft: Option<Fft>,
    filterbank: Option<MelFilterbank>,
    history: History<[f32; 2]>,
}

impl FormantEstimator {
    /// Estimator with default parameters.
    pub fn new(algorithm: FormantAlgorithm) -> Self {
        Self::with_params(algorithm, FormantParams::default())
    }

    /// Estimator with explicit parameters.
    pub fn with_params(algorithm: FormantAlgorithm, params: FormantParams) -> Self {
        let history = History::new(params.history_len);
        Self {
            algorithm,
            params,
            fft: None,
            filterbank: None,
            history,
        }
    }

    /// Selected algorithm.
    pub fn algorithm(&self) -> FormantAlgorithm {
        self.algorithm
    }

    /// Active parameters.
    pub fn params(&self) -> &FormantParams {
        &self.params
    }

    /// Accepted F1/F2 pairs, oldest first.
    pub fn history(&self) -> &History<[f32; 2]> {
        &self.history
    }

    /// Estimate the formants of one frame.
    pub fn estimate(&mut self, frame: &AudioFrame) -> Result<FormantSet> {
        let Self {
            algorithm,
            params,
            fft,
            filterbank,
            history,
        } = self;
        let algorithm = *algorithm;
        let sample_rate = frame.sample_rate() as f32;

        if algorithm.input() == BufferKind::Samples
            && let Some(samples) = frame.samples()
            && rms(samples) < params.silence_rms
        {
            return Ok(FormantSet::default());
        }

        let set = match algorithm {
            FormantAlgorithm::TwoPeak => {
                two_peak::estimate(&magnitudes_of(frame, algorithm)?, sample_rate, params)
            }
            FormantAlgorithm::Lpc => lpc::estimate(samples_of(frame, algorithm)?, sample_rate, params),
            FormantAlgorithm::Cepstral => {
                let samples = samples_of(frame, algorithm)?;
                let fft = planned(fft, samples.len());
                cepstral::estimate(samples, sample_rate, params, fft)
            }
            FormantAlgorithm::Mfcc => {
                let samples = samples_of(frame, algorithm)?;
                let fft = planned(fft, samples.len());
                mfcc::estimate(samples, sample_rate, params, fft, filterbank)
            }
            FormantAlgorithm::Burg | FormantAlgorithm::AutocorrelationLpc => {
                let spectrum = magnitudes_of(frame, algorithm)?;
                envelope::estimate(&spectrum, sample_rate, algorithm, params, history)
            }
            FormantAlgorithm::Density => {
                density::estimate(&magnitudes_of(frame, algorithm)?, sample_rate, params)
            }
        };

        #[cfg(feature = "tracing")]
        if set.is_empty() {
            tracing::debug!(algorithm = algorithm.name(), "formant: no formants detected");
        }

        Ok(set)
    }

    /// Forget the history. The filterbank cache is kept.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

fn samples_of(frame: &AudioFrame, algorithm: FormantAlgorithm) -> Result<&[f32]> {
    frame.samples().ok_or(AnalysisError::MissingBuffer {
        algorithm: algorithm.name(),
        buffer: BufferKind::Samples,
    })
}

fn magnitudes_of(frame: &AudioFrame, algorithm: FormantAlgorithm) -> Result<Cow<'_, [f32]>> {
    frame
        .spectrum()
        .map(|s| s.magnitudes())
        .ok_or(AnalysisError::MissingBuffer {
            algorithm: algorithm.name(),
            buffer: BufferKind::Spectrum,
        })
}

/// Bins whose centre frequency lies in `[band[0], band[1])`, clamped to `len`.
pub(crate) fn band_bins(band: [f32; 2], bin_hz: f32, len: usize) -> Range<usize> {
    let start = ((band[0] / bin_hz).ceil().max(0.0) as usize).min(len);
    let end = ((band[1] / bin_hz).ceil().max(0.0) as usize).min(len);
    start..end.max(start)
}

/// Index and value of the tallest bin in `range` (first one on ties).
pub(crate) fn tallest(values: &[f32], range: Range<usize>) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for i in range {
        let v = values[i];
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best
}

/// Local maxima of an envelope sampled every `step_hz`, strictly inside
/// `(min_frequency, max_frequency)`, in scan order.
pub(crate) fn envelope_peaks(envelope: &[f32], step_hz: f32, params: &FormantParams) -> FormantSet {
    FormantSet::from_frequencies(
        crate::spectrum::local_maxima(envelope)
            .into_iter()
            .map(|i| i as f32 * step_hz)
            .filter(|&f| f > params.min_frequency && f < params.max_frequency),
    )
}
