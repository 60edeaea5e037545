//! Slicing a signal into overlapping analysis frames.

use vowelscope_analysis::{AudioFrame, SpectrumKind};

use crate::{Error, Result};

/// One frame cut from a longer signal.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedFrame {
    /// Position in the frame sequence.
    pub index: usize,
    /// First sample of the frame in the source signal.
    pub offset: usize,
    /// `offset` in seconds.
    pub time_secs: f64,
    /// The frame itself.
    pub frame: AudioFrame,
}

/// Iterator over fixed-size frames of a signal.
///
/// Frames start every `hop_size` samples. The last frame is the first one
/// reaching the end of the signal and is zero-padded to `fft_size`; an empty
/// signal yields no frames.
///
/// ```rust
/// use vowelscope_io::FrameReader;
///
/// let signal = vec![0.1f32; 5000];
/// let reader = FrameReader::new(&signal, 16000, 2048, 1024).unwrap();
/// assert_eq!(reader.frame_count(), 4);
/// for frame in reader {
///     assert_eq!(frame.unwrap().frame.fft_size(), 2048);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    signal: &'a [f32],
    sample_rate: u32,
    fft_size: usize,
    hop_size: usize,
    spectrum: Option<SpectrumKind>,
    index: usize,
    count: usize,
}

impl<'a> FrameReader<'a> {
    /// Frames of `fft_size` samples, `hop_size` apart.
    pub fn new(
        signal: &'a [f32],
        sample_rate: u32,
        fft_size: usize,
        hop_size: usize,
    ) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidFraming(
                "sample rate must be positive".to_string(),
            ));
        }
        if fft_size == 0 || !fft_size.is_power_of_two() {
            return Err(Error::InvalidFraming(format!(
                "frame size {fft_size} is not a power of two"
            )));
        }
        if hop_size == 0 || hop_size > fft_size {
            return Err(Error::InvalidFraming(format!(
                "hop size {hop_size} must be in 1..={fft_size}"
            )));
        }

        Ok(Self {
            signal,
            sample_rate,
            fft_size,
            hop_size,
            spectrum: None,
            index: 0,
            count: frame_count(signal.len(), fft_size, hop_size),
        })
    }

    /// Attach a spectrum of this kind to every frame.
    pub fn with_spectrum(mut self, kind: SpectrumKind) -> Self {
        self.spectrum = Some(kind);
        self
    }

    /// Total number of frames the reader produces.
    pub fn frame_count(&self) -> usize {
        self.count
    }

    /// Samples per frame.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Samples between frame starts.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    fn frame_at(&self, index: usize) -> Result<TimedFrame> {
        let offset = index * self.hop_size;
        let end = (offset + self.fft_size).min(self.signal.len());
        let mut samples = Vec::with_capacity(self.fft_size);
        samples.extend_from_slice(&self.signal[offset..end]);
        samples.resize(self.fft_size, 0.0);

        let mut frame = AudioFrame::from_samples(samples, self.sample_rate)?;
        if let Some(kind) = self.spectrum {
            frame = frame.with_derived_spectrum(kind);
        }

        Ok(TimedFrame {
            index,
            offset,
            time_secs: offset as f64 / f64::from(self.sample_rate),
            frame,
        })
    }
}

impl Iterator for FrameReader<'_> {
    type Item = Result<TimedFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let frame = self.frame_at(self.index);
        self.index += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameReader<'_> {}

/// Number of frames needed to cover `len` samples.
pub fn frame_count(len: usize, fft_size: usize, hop_size: usize) -> usize {
    if len == 0 || hop_size == 0 {
        0
    } else if len <= fft_size {
        1
    } else {
        1 + (len - fft_size).div_ceil(hop_size)
    }
}
