//! Per-frame pipeline bundling pitch, formants and vowel classification.

use crate::error::{AnalysisError, BufferKind, Result};
use crate::formant::{FormantAlgorithm, FormantEstimator, FormantParams, FormantSet};
use crate::frame::AudioFrame;
use crate::pitch::{PitchAlgorithm, PitchParams, PitchTracker};
use crate::vowel::{MAX_MATCH_DISTANCE, VowelMatch, VowelTable};

/// Result of analysing one frame.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameAnalysis {
    /// Fundamental frequency in Hz, `None` when silent or unvoiced.
    pub pitch: Option<f32>,
    /// Detected formants.
    pub formants: FormantSet,
    /// Nearest vowel to (F1, F2), when both exist and one is close enough.
    pub vowel: Option<VowelMatch>,
}

/// Stateful analyzer for one session.
///
/// Pitch and formant estimation are independent; the vowel lookup uses the
/// first two formants. Call [`reset`](Self::reset) between sessions.
///
/// ```rust
/// use vowelscope_analysis::{AudioFrame, FormantAlgorithm, FrameAnalyzer, PitchAlgorithm};
/// use vowelscope_analysis::synth::{Resonance, synthetic_vowel};
///
/// let samples = synthetic_vowel(
///     44100.0,
///     120.0,
///     &[Resonance::new(700.0, 90.0), Resonance::new(1200.0, 110.0)],
///     2048,
/// );
/// let frame = AudioFrame::from_samples(samples, 44100).unwrap();
///
/// let mut analyzer = FrameAnalyzer::new(PitchAlgorithm::Yin, FormantAlgorithm::Lpc);
/// let analysis = analyzer.analyze(&frame).unwrap();
/// assert!(analysis.pitch.is_some());
/// ```
#[derive(Debug)]
pub struct FrameAnalyzer {
    pitch: PitchTracker,
    formants: FormantEstimator,
    vowels: VowelTable,
    max_vowel_distance: f32,
}

impl FrameAnalyzer {
    /// Analyzer with default parameters.
    pub fn new(pitch: PitchAlgorithm, formant: FormantAlgorithm) -> Self {
        Self::with_params(pitch, PitchParams::default(), formant, FormantParams::default())
    }

    /// Analyzer with explicit parameters.
    pub fn with_params(
        pitch: PitchAlgorithm,
        pitch_params: PitchParams,
        formant: FormantAlgorithm,
        formant_params: FormantParams,
    ) -> Self {
        Self {
            pitch: PitchTracker::with_params(pitch, pitch_params),
            formants: FormantEstimator::with_params(formant, formant_params),
            vowels: VowelTable::ipa(),
            max_vowel_distance: MAX_MATCH_DISTANCE,
        }
    }

    /// Replace the vowel table.
    pub fn with_vowel_table(mut self, table: VowelTable) -> Self {
        self.vowels = table;
        self
    }

    /// Set the vowel match threshold in Hz.
    pub fn with_max_vowel_distance(mut self, distance: f32) -> Self {
        self.max_vowel_distance = distance;
        self
    }

    /// Pitch tracker.
    pub fn pitch_tracker(&self) -> &PitchTracker {
        &self.pitch
    }

    /// Formant estimator.
    pub fn formant_estimator(&self) -> &FormantEstimator {
        &self.formants
    }

    /// Analyse one frame.
    ///
    /// The frame must carry samples (for pitch) and whatever buffer the
    /// formant algorithm reads.
    pub fn analyze(&mut self, frame: &AudioFrame) -> Result<FrameAnalysis> {
        let samples = frame.samples().ok_or(AnalysisError::MissingBuffer {
            algorithm: self.pitch.algorithm().name(),
            buffer: BufferKind::Samples,
        })?;

        let pitch = self.pitch.estimate(samples, frame.sample_rate() as f32);
        let formants = self.formants.estimate(frame)?;
        let vowel = match (formants.f1(), formants.f2()) {
            (Some(f1), Some(f2)) => {
                self.vowels
                    .nearest_within(f1.frequency_hz, f2.frequency_hz, self.max_vowel_distance)
            }
            _ => None,
        };

        Ok(FrameAnalysis {
            pitch,
            formants,
            vowel,
        })
    }

    /// Forget pitch and formant history.
    pub fn reset(&mut self) {
        self.pitch.reset();
        self.formants.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Spectrum;
    use crate::synth::{Resonance, synthetic_vowel};

    #[test]
    fn silent_frame() {
        let frame = AudioFrame::from_samples(vec![0.0; 2048], 44100).unwrap();
        let mut analyzer = FrameAnalyzer::new(PitchAlgorithm::Yin, FormantAlgorithm::Lpc);
        assert_eq!(analyzer.analyze(&frame).unwrap(), FrameAnalysis::default());
    }

    #[test]
    fn needs_samples_for_pitch() {
        let frame = AudioFrame::from_spectrum(Spectrum::Bytes(vec![0; 1024]), 44100).unwrap();
        let mut analyzer = FrameAnalyzer::new(PitchAlgorithm::Yin, FormantAlgorithm::TwoPeak);
        assert_eq!(
            analyzer.analyze(&frame),
            Err(AnalysisError::MissingBuffer {
                algorithm: "yin",
                buffer: BufferKind::Samples,
            })
        );
    }

    #[test]
    fn voiced_frame_reports_pitch_and_formants() {
        let samples = synthetic_vowel(
            44100.0,
            100.0,
            &[Resonance::new(500.0, 80.0), Resonance::new(1500.0, 80.0)],
            2048,
        );
        let frame = AudioFrame::from_samples(samples, 44100).unwrap();
        let mut analyzer = FrameAnalyzer::new(PitchAlgorithm::Yin, FormantAlgorithm::Lpc);
        let analysis = analyzer.analyze(&frame).unwrap();

        let pitch = analysis.pitch.unwrap();
        assert!((pitch - 100.0).abs() < 3.0, "pitch = {pitch}");
        assert!(analysis.formants.len() >= 2);
        assert!(analysis.vowel.is_some());

        analyzer.reset();
        assert!(analyzer.pitch_tracker().history().is_empty());
    }
}
