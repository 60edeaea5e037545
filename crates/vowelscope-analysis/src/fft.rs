//! FFT wrapper, complex spectral frames and analysis windows

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Symmetric Hamming window coefficient for index `i` of an `n`-point window.
///
/// `0.54 - 0.46 * cos(2πi / (n - 1))`. A one-point window is `1.0`.
#[inline]
pub fn hamming(n: usize, i: usize) -> f32 {
    if n <= 1 {
        return 1.0;
    }
    0.54 - 0.46 * (2.0 * PI * i as f32 / (n - 1) as f32).cos()
}

/// Copy of `signal` multiplied by a Hamming window of the same length.
pub fn hamming_windowed(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    signal
        .iter()
        .enumerate()
        .map(|(i, &x)| x * hamming(n, i))
        .collect()
}

/// Complex spectrum stored as split real/imaginary parts.
///
/// Produced by [`fft`] and [`ifft`]. The length is a power of two, and for
/// real input `im[0]` is exactly zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralFrame {
    /// Real parts
    pub re: Vec<f32>,
    /// Imaginary parts
    pub im: Vec<f32>,
}

impl SpectralFrame {
    /// Number of bins
    pub fn len(&self) -> usize {
        self.re.len()
    }

    /// True when the frame holds no bins
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Magnitude of every bin
    pub fn magnitudes(&self) -> Vec<f32> {
        self.re
            .iter()
            .zip(&self.im)
            .map(|(re, im)| (re * re + im * im).sqrt())
            .collect()
    }

    fn to_complex(&self) -> Vec<Complex<f32>> {
        self.re
            .iter()
            .enumerate()
            .map(|(i, &re)| Complex::new(re, self.im.get(i).copied().unwrap_or(0.0)))
            .collect()
    }

    fn from_complex(buffer: &[Complex<f32>]) -> Self {
        Self {
            re: buffer.iter().map(|c| c.re).collect(),
            im: buffer.iter().map(|c| c.im).collect(),
        }
    }
}

/// Forward DFT of `real` (+ optional `imag`) with twiddle `e^{-2πik/n}`.
///
/// The length must be a power of two; other lengths trip a debug assertion
/// and are unspecified in release builds. Lengths of 0 or 1 are returned
/// unchanged. A missing or short `imag` is treated as zeros.
pub fn fft(real: &[f32], imag: Option<&[f32]>) -> SpectralFrame {
    let n = real.len();
    debug_assert!(n <= 1 || n.is_power_of_two(), "fft length {n} is not a power of two");

    let mut buffer: Vec<Complex<f32>> = real
        .iter()
        .enumerate()
        .map(|(i, &re)| Complex::new(re, imag.and_then(|im| im.get(i)).copied().unwrap_or(0.0)))
        .collect();

    if n > 1 {
        FftPlanner::new().plan_fft_forward(n).process(&mut buffer);
    }

    let mut frame = SpectralFrame::from_complex(&buffer);
    if imag.is_none() && !frame.im.is_empty() {
        frame.im[0] = 0.0;
    }
    frame
}

/// Inverse DFT, scaled by `1/n`.
pub fn ifft(spectrum: &SpectralFrame) -> SpectralFrame {
    let n = spectrum.len();
    debug_assert!(n <= 1 || n.is_power_of_two(), "ifft length {n} is not a power of two");

    let mut buffer = spectrum.to_complex();
    if n > 1 {
        FftPlanner::new().plan_fft_inverse(n).process(&mut buffer);
        let scale = 1.0 / n as f32;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
    SpectralFrame::from_complex(&buffer)
}

/// FFT processor with caching
pub struct Fft {
    planner: FftPlanner<f32>,
    fft: Arc<dyn rustfft::Fft<f32>>,
    ifft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl fmt::Debug for Fft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish_non_exhaustive()
    }
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self {
            planner,
            fft,
            ifft,
            size,
        }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Resize the FFT (creates new plan if needed)
    pub fn resize(&mut self, size: usize) {
        if size != self.size {
            self.fft = self.planner.plan_fft_forward(size);
            self.ifft = self.planner.plan_fft_inverse(size);
            self.size = size;
        }
    }

    /// Perform forward FFT on real input
    ///
    /// Returns complex spectrum (size/2 + 1 bins for positive frequencies)
    pub fn forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .collect();

        // Pad or truncate to FFT size
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        // Return only positive frequencies (DC to Nyquist)
        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Perform forward FFT on complex input (in-place)
    pub fn forward_complex(&self, buffer: &mut [Complex<f32>]) {
        self.fft.process(buffer);
    }

    /// Perform inverse FFT on complex buffer (in-place)
    pub fn inverse_complex(&self, buffer: &mut [Complex<f32>]) {
        self.ifft.process(buffer);

        // Normalize
        let scale = 1.0 / self.size as f32;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}

/// Reuse `slot` when it already plans `size`, otherwise replan it.
pub(crate) fn planned(slot: &mut Option<Fft>, size: usize) -> &Fft {
    let fft = slot.get_or_insert_with(|| Fft::new(size));
    fft.resize(size);
    fft
}
