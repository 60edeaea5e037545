//! Vowelscope Analysis - pitch, formant and vowel analysis of speech frames
//!
//! This crate turns fixed-size audio frames into fundamental frequency,
//! formant and vowel estimates:
//!
//! - [`fft`] - FFT/IFFT over split complex frames, analysis windows
//! - [`dct`] - Unnormalized DCT-II / DCT-III pair
//! - [`mel`] - Mel scale conversions and triangular filterbank
//! - [`spectrum`] - Analyser-style magnitude buffers, smoothing, peak picking
//! - [`lpc`] - Autocorrelation, Levinson-Durbin and Burg linear prediction
//! - [`pitch`] - Autocorrelation and YIN pitch detection, [`PitchTracker`]
//! - [`formant`] - Seven formant algorithms behind [`FormantEstimator`]
//! - [`vowel`] - Nearest IPA vowel in the F1/F2 plane
//! - [`analyzer`] - [`FrameAnalyzer`] running all of the above per frame
//! - [`synth`] - Synthetic test signals with known pitch and formants
//!
//! ## Example
//!
//! ```rust
//! use vowelscope_analysis::{
//!     AudioFrame, FormantAlgorithm, PitchAlgorithm, detect_vowel, estimate_formants,
//!     estimate_pitch,
//! };
//! use vowelscope_analysis::synth::{Resonance, synthetic_vowel};
//!
//! let samples = synthetic_vowel(
//!     44100.0,
//!     110.0,
//!     &[Resonance::new(730.0, 90.0), Resonance::new(1090.0, 110.0)],
//!     2048,
//! );
//!
//! let pitch = estimate_pitch(&samples, 44100, PitchAlgorithm::Yin).unwrap();
//! assert!(pitch.is_some());
//!
//! let frame = AudioFrame::from_samples(samples, 44100).unwrap();
//! let formants = estimate_formants(&frame, FormantAlgorithm::Lpc).unwrap();
//! if let (Some(f1), Some(f2)) = (formants.f1(), formants.f2()) {
//!     println!("{:?}", detect_vowel(f1.frequency_hz, f2.frequency_hz));
//! }
//! ```
//!
//! ## Frames
//!
//! Sample-based algorithms (pitch, `lpc`, `cepstral`, `mfcc`) read the
//! time-domain buffer; the others read a half spectrum. Browser-style
//! byte spectra can be derived from the samples:
//!
//! ```rust
//! use vowelscope_analysis::{AudioFrame, FormantAlgorithm, estimate_formants};
//!
//! let frame = AudioFrame::from_samples(vec![0.0; 1024], 48000)
//!     .unwrap()
//!     .with_byte_spectrum();
//! let formants = estimate_formants(&frame, FormantAlgorithm::Density).unwrap();
//! assert!(formants.is_empty());
//! ```

pub mod analyzer;
pub mod dct;
pub mod error;
pub mod fft;
pub mod formant;
pub mod frame;
pub mod history;
pub mod lpc;
pub mod mel;
pub mod pitch;
pub mod spectrum;
pub mod synth;
pub mod vowel;

// Re-export main types
pub use analyzer::{FrameAnalysis, FrameAnalyzer};
pub use error::{AnalysisError, BufferKind, Result};
pub use fft::{Fft, SpectralFrame, fft, hamming, hamming_windowed, ifft};
pub use formant::{
    Bandwidth, Formant, FormantAlgorithm, FormantEstimator, FormantParams, FormantSet,
    estimate_formants,
};
pub use frame::{AudioFrame, Spectrum, SpectrumKind};
pub use lpc::{LpError, LpModel, burg, levinson_durbin};
pub use mel::{MelFilterbank, hz_to_mel, mel_to_hz};
pub use pitch::{PitchAlgorithm, PitchParams, PitchTracker, estimate_pitch};
pub use spectrum::{byte_spectrum, magnitude_spectrum, smooth_spectrum};
pub use vowel::{VowelMatch, VowelTable, detect_vowel};
