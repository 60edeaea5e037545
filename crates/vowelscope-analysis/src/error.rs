//! Error types for analysis calls.

use std::fmt;
use thiserror::Error;

/// The two kinds of buffer an [`AudioFrame`](crate::AudioFrame) can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Time-domain samples.
    Samples,
    /// Frequency-domain magnitudes.
    Spectrum,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Samples => f.write_str("time-domain"),
            BufferKind::Spectrum => f.write_str("frequency-domain"),
        }
    }
}

/// Errors raised when an analysis call is misused.
///
/// Silence and unvoiced input are not errors. They come back as `None`
/// pitch or an empty [`FormantSet`](crate::FormantSet).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// The sample rate is zero.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// A buffer length is not a power of two.
    #[error("buffer length {0} is not a power of two")]
    InvalidFrameLength(usize),

    /// A buffer was supplied but holds no data.
    #[error("empty {0} buffer")]
    EmptyBuffer(BufferKind),

    /// The sample buffer and magnitude buffer describe different transform sizes.
    #[error("{samples} samples do not match {bins} magnitude bins (expected {expected} bins)")]
    MismatchedBuffers {
        /// Length of the time-domain buffer.
        samples: usize,
        /// Length of the frequency-domain buffer.
        bins: usize,
        /// Bin count implied by the sample buffer.
        expected: usize,
    },

    /// The selected algorithm needs a buffer the frame does not carry.
    #[error("{algorithm} needs a {buffer} buffer")]
    MissingBuffer {
        /// Name of the algorithm.
        algorithm: &'static str,
        /// Buffer the algorithm reads.
        buffer: BufferKind,
    },

    /// An algorithm name did not parse.
    #[error("unknown {kind} algorithm: {name}")]
    UnknownAlgorithm {
        /// Algorithm family ("pitch" or "formant").
        kind: &'static str,
        /// The name that was given.
        name: String,
    },
}

/// Convenience result type for analysis calls.
pub type Result<T> = std::result::Result<T, AnalysisError>;
