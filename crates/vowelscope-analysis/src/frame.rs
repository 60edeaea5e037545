//! Analysis frame: a validated snapshot of time- and/or frequency-domain data.

use std::borrow::Cow;

use crate::error::{AnalysisError, BufferKind, Result};
use crate::spectrum::{DEFAULT_MAX_DB, DEFAULT_MIN_DB, bin_width, byte_spectrum, magnitude_spectrum};

/// Frequency-domain magnitudes of one frame.
///
/// Holds `fft_size / 2` bins, bin `k` centred at `k * sample_rate / fft_size`.
#[derive(Debug, Clone, PartialEq)]
pub enum Spectrum {
    /// Linear magnitude (or power) values.
    Magnitude(Vec<f32>),
    /// Quantized 0-255 magnitudes, see [`byte_spectrum`].
    Bytes(Vec<u8>),
}

impl Spectrum {
    /// Number of bins.
    pub fn len(&self) -> usize {
        match self {
            Spectrum::Magnitude(m) => m.len(),
            Spectrum::Bytes(b) => b.len(),
        }
    }

    /// True when there are no bins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bins as `f32`, borrowing when they already are.
    pub fn magnitudes(&self) -> Cow<'_, [f32]> {
        match self {
            Spectrum::Magnitude(m) => Cow::Borrowed(m),
            Spectrum::Bytes(b) => Cow::Owned(b.iter().map(|&v| f32::from(v)).collect()),
        }
    }
}

/// Which spectrum to derive from a frame's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SpectrumKind {
    /// Linear magnitudes from [`magnitude_spectrum`].
    #[default]
    Magnitude,
    /// Analyser-node bytes from [`byte_spectrum`].
    ///
    /// The dB scale flattens the contrast between formant regions; the
    /// density search tends to place F2 just above F1 on these.
    Bytes,
}

/// One analysis frame.
///
/// Carries a power-of-two sample buffer, a half-spectrum, or both, plus the
/// sample rate they were captured at. Constructors reject zero sample
/// rates, empty buffers and non-power-of-two lengths, so every estimator
/// can rely on a well-formed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    samples: Option<Vec<f32>>,
    spectrum: Option<Spectrum>,
    sample_rate: u32,
}

impl AudioFrame {
    /// Frame holding time-domain samples only.
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        check_length(samples.len(), BufferKind::Samples)?;
        Ok(Self {
            samples: Some(samples),
            spectrum: None,
            sample_rate,
        })
    }

    /// Frame holding a magnitude spectrum only.
    pub fn from_spectrum(spectrum: Spectrum, sample_rate: u32) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        check_length(spectrum.len(), BufferKind::Spectrum)?;
        Ok(Self {
            samples: None,
            spectrum: Some(spectrum),
            sample_rate,
        })
    }

    /// Attach a spectrum, which must hold exactly half as many bins as there are samples.
    pub fn with_spectrum(mut self, spectrum: Spectrum) -> Result<Self> {
        check_length(spectrum.len(), BufferKind::Spectrum)?;
        if let Some(samples) = &self.samples
            && samples.len() / 2 != spectrum.len()
        {
            return Err(AnalysisError::MismatchedBuffers {
                samples: samples.len(),
                bins: spectrum.len(),
                expected: samples.len() / 2,
            });
        }
        self.spectrum = Some(spectrum);
        Ok(self)
    }

    /// Attach the byte spectrum an analyser node would report for these samples.
    ///
    /// A frame without samples is returned unchanged.
    pub fn with_byte_spectrum(mut self) -> Self {
        if let Some(samples) = &self.samples
            && samples.len() >= 2
        {
            let bytes = byte_spectrum(samples, DEFAULT_MIN_DB, DEFAULT_MAX_DB);
            self.spectrum = Some(Spectrum::Bytes(bytes));
        }
        self
    }

    /// Attach the Hamming-windowed magnitude spectrum of the samples.
    ///
    /// A frame without samples is returned unchanged.
    pub fn with_magnitude_spectrum(mut self) -> Self {
        if let Some(samples) = &self.samples
            && samples.len() >= 2
        {
            self.spectrum = Some(Spectrum::Magnitude(magnitude_spectrum(samples)));
        }
        self
    }

    /// Attach a spectrum of the given kind derived from the samples.
    pub fn with_derived_spectrum(self, kind: SpectrumKind) -> Self {
        match kind {
            SpectrumKind::Magnitude => self.with_magnitude_spectrum(),
            SpectrumKind::Bytes => self.with_byte_spectrum(),
        }
    }

    /// Time-domain samples, if present.
    pub fn samples(&self) -> Option<&[f32]> {
        self.samples.as_deref()
    }

    /// Frequency-domain magnitudes, if present.
    pub fn spectrum(&self) -> Option<&Spectrum> {
        self.spectrum.as_ref()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Transform length the frame describes.
    pub fn fft_size(&self) -> usize {
        match (&self.samples, &self.spectrum) {
            (Some(samples), _) => samples.len(),
            (None, Some(spectrum)) => spectrum.len() * 2,
            (None, None) => 0,
        }
    }

    /// Spacing between spectrum bins in Hz.
    pub fn bin_width(&self) -> f32 {
        bin_width(self.sample_rate as f32, self.fft_size() / 2)
    }
}

fn check_sample_rate(sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate(sample_rate));
    }
    Ok(())
}

fn check_length(len: usize, kind: BufferKind) -> Result<()> {
    if len == 0 {
        return Err(AnalysisError::EmptyBuffer(kind));
    }
    if !len.is_power_of_two() {
        return Err(AnalysisError::InvalidFrameLength(len));
    }
    Ok(())
}
