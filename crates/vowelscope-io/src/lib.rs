//! Audio I/O layer for vowelscope.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] decodes any PCM or float file to a mono
//!   signal, [`write_wav`] saves one in a chosen [`Encoding`]
//! - **Framing**: [`FrameReader`] cutting a signal into overlapping [`AudioFrame`]s
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vowelscope_analysis::{FormantAlgorithm, FrameAnalyzer, PitchAlgorithm};
//! use vowelscope_io::{FrameReader, read_wav};
//!
//! let (samples, info) = read_wav("vowel.wav")?;
//! let mut analyzer = FrameAnalyzer::new(PitchAlgorithm::Yin, FormantAlgorithm::Lpc);
//!
//! for timed in FrameReader::new(&samples, info.sample_rate, 2048, 1024)? {
//!     let timed = timed?;
//!     let analysis = analyzer.analyze(&timed.frame)?;
//!     println!("{:.3}s {:?}", timed.time_secs, analysis.pitch);
//! }
//! ```
//!
//! [`AudioFrame`]: vowelscope_analysis::AudioFrame

mod frames;
mod wav;

pub use frames::{FrameReader, TimedFrame, frame_count};
pub use wav::{Encoding, WavInfo, mix_to_mono, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Frame size, hop or sample rate unusable for framing.
    #[error("Invalid framing: {0}")]
    InvalidFraming(String),

    /// A frame could not be built.
    #[error("Analysis frame error: {0}")]
    Frame(#[from] vowelscope_analysis::AnalysisError),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
