//! Property-based tests for vowelscope-analysis primitives.
//!
//! Checks numeric laws (Mel and FFT round trips) and that every estimator
//! stays finite and bounded on arbitrary input.

use proptest::prelude::*;
use vowelscope_analysis::history::History;
use vowelscope_analysis::lpc::autocorrelation;
use vowelscope_analysis::{
    AudioFrame, FormantAlgorithm, PitchAlgorithm, Spectrum, burg, detect_vowel,
    estimate_formants, estimate_pitch, fft, hz_to_mel, ifft, levinson_durbin, mel_to_hz,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Mel conversion inverts over the audible range.
    #[test]
    fn mel_roundtrip(hz in 0.0f32..=20000.0f32) {
        let back = mel_to_hz(hz_to_mel(hz));
        prop_assert!(
            (back - hz).abs() <= 1e-3 * hz.max(1.0),
            "{} Hz came back as {}", hz, back
        );
    }

    /// Mel scale is monotonic.
    #[test]
    fn mel_monotonic(a in 0.0f32..20000.0f32, delta in 1.0f32..1000.0f32) {
        prop_assert!(hz_to_mel(a + delta) > hz_to_mel(a));
    }

    /// FFT followed by IFFT reconstructs any real power-of-two signal.
    #[test]
    fn fft_roundtrip(
        log_len in 1u32..=10,
        seed in prop::collection::vec(-1.0f32..=1.0f32, 1024),
    ) {
        let n = 1usize << log_len;
        let signal = &seed[..n];
        let spectrum = fft(signal, None);
        prop_assert_eq!(spectrum.im[0], 0.0);

        let back = ifft(&spectrum);
        for (i, (a, b)) in signal.iter().zip(&back.re).enumerate() {
            prop_assert!((a - b).abs() < 1e-4, "sample {}: {} vs {}", i, a, b);
        }
    }

    /// Pitch estimates are finite and positive whenever reported.
    #[test]
    fn pitch_is_finite(samples in prop::collection::vec(-1.0f32..=1.0f32, 1024)) {
        for algorithm in PitchAlgorithm::ALL {
            if let Some(pitch) = estimate_pitch(&samples, 16000, algorithm).unwrap() {
                prop_assert!(pitch.is_finite() && pitch > 0.0, "{}: {}", algorithm, pitch);
            }
        }
    }

    /// Every formant algorithm returns at most three finite formants.
    #[test]
    fn formants_are_bounded(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 512),
        bytes in prop::collection::vec(any::<u8>(), 256),
    ) {
        let frame = AudioFrame::from_samples(samples, 22050)
            .unwrap()
            .with_spectrum(Spectrum::Bytes(bytes))
            .unwrap();
        for algorithm in FormantAlgorithm::ALL {
            let set = estimate_formants(&frame, algorithm).unwrap();
            prop_assert!(set.len() <= 3);
            for formant in &set {
                prop_assert!(
                    formant.frequency_hz.is_finite() && formant.frequency_hz > 0.0,
                    "{}: {:?}", algorithm, set.frequencies()
                );
            }
        }
    }

    /// Linear prediction never leaks NaN: it either fails or yields finite coefficients.
    #[test]
    fn lp_models_are_finite(
        signal in prop::collection::vec(-1.0f32..=1.0f32, 16..256),
        order in 1usize..12,
    ) {
        let models = [
            levinson_durbin(&autocorrelation(&signal, order)),
            burg(&signal, order),
        ];
        for model in models.into_iter().flatten() {
            prop_assert!(model.coefficients().iter().all(|a| a.is_finite()));
            prop_assert!(model.error().is_finite() && model.error() >= 0.0);
        }
    }

    /// A vowel match is always within the threshold.
    #[test]
    fn vowel_matches_are_close(f1 in 0.0f32..3000.0f32, f2 in 0.0f32..5000.0f32) {
        if let Some(m) = detect_vowel(f1, f2) {
            prop_assert!(m.distance >= 0.0 && m.distance < 400.0);
        }
    }

    /// History length never exceeds its capacity.
    #[test]
    fn history_is_bounded(capacity in 0usize..8, pushes in 0usize..32) {
        let mut history = History::new(capacity);
        for i in 0..pushes {
            history.push(i as f32);
        }
        prop_assert_eq!(history.len(), pushes.min(capacity));
    }
}
