//! Fundamental frequency estimation.
//!
//! Two detectors share one silence gate:
//!
//! - [`autocorrelation`] - raw autocorrelation peak over the 50-2000 Hz lag range
//! - [`yin`] - cumulative-mean-normalized difference function (de Cheveigné & Kawahara, 2002)
//!
//! [`estimate_pitch`] is the stateless entry point. [`PitchTracker`] wraps a
//! detector with a short history that vetoes borderline YIN estimates which
//! jump away from the recent pitch.

pub mod autocorrelation;
pub mod yin;

use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, BufferKind, Result};
use crate::history::History;

/// Pitch detection algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum PitchAlgorithm {
    /// Raw autocorrelation peak picking.
    Autocorrelation,
    /// YIN difference-function method.
    #[default]
    Yin,
}

impl PitchAlgorithm {
    /// Every algorithm, in declaration order.
    pub const ALL: [PitchAlgorithm; 2] = [PitchAlgorithm::Autocorrelation, PitchAlgorithm::Yin];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            PitchAlgorithm::Autocorrelation => "autocorrelation",
            PitchAlgorithm::Yin => "yin",
        }
    }
}

impl fmt::Display for PitchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchAlgorithm {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "autocorrelation" | "acf" => Ok(PitchAlgorithm::Autocorrelation),
            "yin" => Ok(PitchAlgorithm::Yin),
            _ => Err(AnalysisError::UnknownAlgorithm {
                kind: "pitch",
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PitchAlgorithm {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PitchAlgorithm> for String {
    fn from(value: PitchAlgorithm) -> Self {
        value.name().to_string()
    }
}

/// Tunables shared by both pitch detectors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PitchParams {
    /// Frames with RMS below this are silent.
    pub silence_rms: f32,
    /// Lowest reported pitch in Hz (longest autocorrelation lag).
    pub min_frequency: f32,
    /// Highest reported pitch in Hz (shortest autocorrelation lag).
    pub max_frequency: f32,
    /// Minimum raw autocorrelation peak accepted as voiced.
    pub autocorrelation_threshold: f32,
    /// YIN absolute threshold on the normalized difference function.
    pub yin_threshold: f32,
    /// Relaxed threshold applied to the global minimum when no dip crosses `yin_threshold`.
    pub yin_fallback_threshold: f32,
    /// Estimates kept by [`PitchTracker`].
    pub history_len: usize,
    /// Relative distance from the history median beyond which a borderline estimate is dropped.
    pub max_borderline_deviation: f32,
}

impl Default for PitchParams {
    fn default() -> Self {
        Self {
            silence_rms: 0.001,
            min_frequency: 50.0,
            max_frequency: 2000.0,
            autocorrelation_threshold: 0.5,
            yin_threshold: 0.15,
            yin_fallback_threshold: 0.5,
            history_len: 5,
            max_borderline_deviation: 0.2,
        }
    }
}

/// Root-mean-square level of a buffer (0 for an empty one).
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Estimate the pitch of one frame with default parameters.
///
/// Returns `Ok(None)` for silent or unvoiced frames. Fails only on misuse:
/// a zero sample rate or an empty buffer.
pub fn estimate_pitch(
    samples: &[f32],
    sample_rate: u32,
    algorithm: PitchAlgorithm,
) -> Result<Option<f32>> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate(sample_rate));
    }
    if samples.is_empty() {
        return Err(AnalysisError::EmptyBuffer(BufferKind::Samples));
    }
    let params = PitchParams::default();
    let sample_rate = sample_rate as f32;
    Ok(match algorithm {
        PitchAlgorithm::Autocorrelation => autocorrelation::detect(samples, sample_rate, &params),
        PitchAlgorithm::Yin => yin::detect(samples, sample_rate, &params).map(|e| e.frequency),
    })
}

/// Pitch detector with a short memory of accepted estimates.
///
/// The history only biases borderline decisions: a YIN estimate that came
/// from the relaxed fallback threshold is dropped when at least three
/// accepted estimates exist and it strays further than
/// `max_borderline_deviation` from their median. Call [`reset`](Self::reset)
/// when a new analysis session starts.
#[derive(Debug, Clone)]
pub struct PitchTracker {
    algorithm: PitchAlgorithm,
    params: PitchParams,
    history: History<f32>,
}

impl PitchTracker {
    /// Tracker with default parameters.
    pub fn new(algorithm: PitchAlgorithm) -> Self {
        Self::with_params(algorithm, PitchParams::default())
    }

    /// Tracker with explicit parameters.
    pub fn with_params(algorithm: PitchAlgorithm, params: PitchParams) -> Self {
        let history = History::new(params.history_len);
        Self {
            algorithm,
            params,
            history,
        }
    }

    /// Selected algorithm.
    pub fn algorithm(&self) -> PitchAlgorithm {
        self.algorithm
    }

    /// Active parameters.
    pub fn params(&self) -> &PitchParams {
        &self.params
    }

    /// Accepted estimates, oldest first.
    pub fn history(&self) -> &History<f32> {
        &self.history
    }

    /// Estimate the pitch of one frame.
    pub fn estimate(&mut self, samples: &[f32], sample_rate: f32) -> Option<f32> {
        let (frequency, borderline) = match self.algorithm {
            PitchAlgorithm::Autocorrelation => {
                (autocorrelation::detect(samples, sample_rate, &self.params)?, false)
            }
            PitchAlgorithm::Yin => {
                let estimate = yin::detect(samples, sample_rate, &self.params)?;
                (estimate.frequency, estimate.borderline)
            }
        };

        if borderline
            && self.history.len() >= 3
            && let Some(median) = self.history.median()
            && (frequency - median).abs() / median > self.params.max_borderline_deviation
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(frequency, median, "pitch: borderline estimate rejected");
            return None;
        }

        self.history.push(frequency);
        Some(frequency)
    }

    /// Forget the history.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| 0.8 * (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("YIN".parse::<PitchAlgorithm>(), Ok(PitchAlgorithm::Yin));
        assert_eq!(
            "autocorrelation".parse::<PitchAlgorithm>(),
            Ok(PitchAlgorithm::Autocorrelation)
        );
        assert!(matches!(
            "cepstrum".parse::<PitchAlgorithm>(),
            Err(AnalysisError::UnknownAlgorithm { kind: "pitch", .. })
        ));
        for algorithm in PitchAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<PitchAlgorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn rejects_misuse() {
        assert_eq!(
            estimate_pitch(&[0.0; 16], 0, PitchAlgorithm::Yin),
            Err(AnalysisError::InvalidSampleRate(0))
        );
        assert_eq!(
            estimate_pitch(&[], 44100, PitchAlgorithm::Yin),
            Err(AnalysisError::EmptyBuffer(BufferKind::Samples))
        );
    }

    #[test]
    fn silence_has_no_pitch() {
        for algorithm in PitchAlgorithm::ALL {
            assert_eq!(estimate_pitch(&[0.0; 2048], 44100, algorithm), Ok(None));
            assert_eq!(estimate_pitch(&[0.0005; 2048], 44100, algorithm), Ok(None));
        }
    }

    #[test]
    fn sine_within_two_percent() {
        let signal = sine(220.0, 44100.0, 2048);
        for algorithm in PitchAlgorithm::ALL {
            let pitch = estimate_pitch(&signal, 44100, algorithm).unwrap().unwrap();
            assert!(
                (pitch - 220.0).abs() / 220.0 < 0.02,
                "{algorithm}: {pitch} Hz"
            );
        }
    }

    #[test]
    fn tracker_records_and_resets() {
        let mut tracker = PitchTracker::new(PitchAlgorithm::Yin);
        let signal = sine(180.0, 48000.0, 2048);
        for _ in 0..7 {
            assert!(tracker.estimate(&signal, 48000.0).is_some());
        }
        assert_eq!(tracker.history().len(), 5);
        tracker.reset();
        assert!(tracker.history().is_empty());
    }

    /// Parameters under which every YIN estimate comes from the relaxed threshold.
    fn fallback_only() -> PitchParams {
        PitchParams {
            yin_threshold: 0.0,
            ..PitchParams::default()
        }
    }

    // At 8 kHz with 512 samples the lag range ends at 255, so 40 Hz and
    // 55 Hz tones each show a single dip and no sub-harmonic.

    #[test]
    fn borderline_accepted_without_history() {
        let mut tracker = PitchTracker::with_params(PitchAlgorithm::Yin, fallback_only());
        let pitch = tracker.estimate(&sine(55.0, 8000.0, 512), 8000.0).unwrap();
        assert!((pitch - 55.0).abs() < 1.0, "{pitch}");
        assert_eq!(tracker.history().len(), 1);
    }

    #[test]
    fn borderline_outlier_vetoed_then_reset() {
        let mut tracker = PitchTracker::with_params(PitchAlgorithm::Yin, fallback_only());
        let steady = sine(40.0, 8000.0, 512);
        let outlier = sine(55.0, 8000.0, 512);

        for _ in 0..3 {
            assert!(tracker.estimate(&steady, 8000.0).is_some());
        }
        assert_eq!(tracker.estimate(&outlier, 8000.0), None);
        assert_eq!(tracker.history().len(), 3);

        // A borderline estimate close to the median still passes.
        assert!(tracker.estimate(&steady, 8000.0).is_some());
        assert_eq!(tracker.history().len(), 4);

        tracker.reset();
        assert!(tracker.estimate(&outlier, 8000.0).is_some());
    }

    #[test]
    fn confident_estimates_are_never_vetoed() {
        let mut tracker = PitchTracker::new(PitchAlgorithm::Yin);
        for _ in 0..3 {
            assert!(tracker.estimate(&sine(40.0, 8000.0, 512), 8000.0).is_some());
        }
        let pitch = tracker.estimate(&sine(55.0, 8000.0, 512), 8000.0).unwrap();
        assert!((pitch - 55.0).abs() < 1.0, "{pitch}");
    }

    #[test]
    fn rms_of_constant() {
        assert!((rms(&[0.5; 8]) - 0.5).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }
}
