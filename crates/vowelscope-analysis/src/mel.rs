//! Mel scale conversions and triangular Mel filterbank.

/// Convert Hz to Mel scale
#[inline]
pub fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert Mel to Hz
#[inline]
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Mel filterbank over a half spectrum of `fft_size / 2` bins.
///
/// Filter `m` is a triangle spanning mel grid points `m`, `m + 1` and
/// `m + 2` on a linear Mel grid from 0 Hz to Nyquist, ramping 0 → 1 → 0 in
/// FFT-bin space.
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    filters: Vec<Vec<f32>>,
    mel_points: Vec<f32>,
    fft_size: usize,
    sample_rate: f32,
}

impl MelFilterbank {
    /// Create a mel filterbank
    ///
    /// # Arguments
    /// * `num_filters` - Number of triangular filters
    /// * `fft_size` - Transform length the spectra come from
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(num_filters: usize, fft_size: usize, sample_rate: f32) -> Self {
        let num_bins = fft_size / 2;
        let mel_max = hz_to_mel(sample_rate / 2.0);

        let mel_points: Vec<f32> = (0..num_filters + 2)
            .map(|i| mel_max * i as f32 / (num_filters + 1) as f32)
            .collect();

        let bin_points: Vec<usize> = mel_points
            .iter()
            .map(|&m| ((fft_size as f32 + 1.0) * mel_to_hz(m) / sample_rate).floor() as usize)
            .collect();

        let mut filters = vec![vec![0.0; num_bins]; num_filters];

        for (m, filter) in filters.iter_mut().enumerate() {
            let left = bin_points[m];
            let center = bin_points[m + 1];
            let right = bin_points[m + 2];

            // Rising edge
            if center > left {
                for (k, val) in filter
                    .iter_mut()
                    .enumerate()
                    .take(center.min(num_bins))
                    .skip(left)
                {
                    *val = (k - left) as f32 / (center - left) as f32;
                }
            }

            // Falling edge
            if right > center {
                for (k, val) in filter
                    .iter_mut()
                    .enumerate()
                    .take(right.min(num_bins))
                    .skip(center)
                {
                    *val = (right - k) as f32 / (right - center) as f32;
                }
            }
        }

        Self {
            filters,
            mel_points,
            fft_size,
            sample_rate,
        }
    }

    /// True when this filterbank was built for the given layout
    pub fn matches(&self, num_filters: usize, fft_size: usize, sample_rate: f32) -> bool {
        self.filters.len() == num_filters
            && self.fft_size == fft_size
            && self.sample_rate == sample_rate
    }

    /// Integrate a power (or magnitude) spectrum through every filter
    pub fn apply(&self, spectrum: &[f32]) -> Vec<f32> {
        self.filters
            .iter()
            .map(|filter| {
                filter
                    .iter()
                    .zip(spectrum.iter())
                    .map(|(&f, &s)| f * s)
                    .sum()
            })
            .collect()
    }

    /// Centre frequency in Hz of a (possibly fractional) filter index
    pub fn center_frequency(&self, index: f32) -> f32 {
        let step = self.mel_points.get(1).copied().unwrap_or(0.0);
        mel_to_hz((index + 1.0) * step)
    }

    /// Number of filters
    pub fn num_filters(&self) -> usize {
        self.filters.len()
    }

    /// Transform length the filterbank was built for
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Weights of one filter over the half-spectrum bins
    pub fn filter(&self, index: usize) -> Option<&[f32]> {
        self.filters.get(index).map(Vec::as_slice)
    }
}
