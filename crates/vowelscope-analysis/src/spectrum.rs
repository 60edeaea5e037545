//! Spectral utilities: analyser-style magnitude buffers, smoothing and peak picking

use crate::fft::{Fft, hamming_windowed};

/// Lower bound of the dB range mapped onto byte magnitudes
pub const DEFAULT_MIN_DB: f32 = -100.0;

/// Upper bound of the dB range mapped onto byte magnitudes
pub const DEFAULT_MAX_DB: f32 = -30.0;

/// Frequency spacing in Hz between bins of a half spectrum holding `num_bins` bins.
///
/// A half spectrum of `n` bins comes from a `2n`-point transform, so bin `k`
/// sits at `k * sample_rate / 2n`.
#[inline]
pub fn bin_width(sample_rate: f32, num_bins: usize) -> f32 {
    sample_rate / (2 * num_bins.max(1)) as f32
}

/// Hamming-windowed magnitude spectrum of `samples`.
///
/// Returns `samples.len() / 2` raw (unscaled) magnitudes, DC first.
pub fn magnitude_spectrum(samples: &[f32]) -> Vec<f32> {
    let n = samples.len();
    if n < 2 {
        return Vec::new();
    }
    let fft = Fft::new(n);
    let windowed = hamming_windowed(samples);
    fft.forward(&windowed)
        .iter()
        .take(n / 2)
        .map(|c| c.norm())
        .collect()
}

/// Quantized magnitude spectrum in the 0-255 range.
///
/// Magnitudes are scaled by `1/N`, converted to dB and mapped linearly so
/// that `min_db` lands on 0 and `max_db` on 255 (clamped). This is the
/// layout browser analyser nodes hand out.
pub fn byte_spectrum(samples: &[f32], min_db: f32, max_db: f32) -> Vec<u8> {
    let n = samples.len().max(1) as f32;
    let range = (max_db - min_db).max(f32::EPSILON);
    magnitude_spectrum(samples)
        .iter()
        .map(|&m| {
            let db = 20.0 * (m / n).max(1e-10).log10();
            (255.0 * (db - min_db) / range).clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// Centred moving average.
///
/// Each output bin averages the input over `[i - w/2, i + w/2]`. Near the
/// edges the window shrinks to the in-range bins instead of zero padding.
pub fn smooth_spectrum(spectrum: &[f32], window_size: usize) -> Vec<f32> {
    let len = spectrum.len();
    let half = window_size / 2;
    if half == 0 {
        return spectrum.to_vec();
    }

    (0..len)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(len - 1);
            let window = &spectrum[lo..=hi];
            window.iter().sum::<f32>() / window.len() as f32
        })
        .collect()
}

/// Indices where the slope turns from rising to falling.
///
/// Bin `i` qualifies when `v[i] > v[i-1]` and `v[i] >= v[i+1]`, so a flat
/// top reports its first bin. The end bins never qualify.
pub fn local_maxima(values: &[f32]) -> Vec<usize> {
    if values.len() < 3 {
        return Vec::new();
    }
    (1..values.len() - 1)
        .filter(|&i| values[i] > values[i - 1] && values[i] >= values[i + 1])
        .collect()
}

/// Refine an extremum at `index` by fitting a parabola through its neighbours.
///
/// ```text
/// x' = x + (s2 - s0) / (2 · (2·s1 - s2 - s0))
/// ```
///
/// Neighbours past the array edges clamp to the edge sample. A flat
/// neighbourhood returns `index` unchanged.
pub fn parabolic_interpolation(values: &[f32], index: usize) -> f32 {
    if values.is_empty() {
        return index as f32;
    }
    let last = values.len() - 1;
    let x = index.min(last);
    let s0 = values[x.saturating_sub(1)];
    let s1 = values[x];
    let s2 = values[(x + 1).min(last)];

    let denom = 2.0 * (2.0 * s1 - s2 - s0);
    if denom.abs() <= f32::EPSILON {
        return x as f32;
    }
    x as f32 + (s2 - s0) / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_magnitude_spectrum_peak_bin() {
        let sample_rate = 44100.0;
        let signal = sine(1000.0, sample_rate, 2048);
        let spectrum = magnitude_spectrum(&signal);
        assert_eq!(spectrum.len(), 1024);

        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        let peak_hz = peak as f32 * bin_width(sample_rate, spectrum.len());
        assert!((peak_hz - 1000.0).abs() < 25.0, "peak at {peak_hz} Hz");
    }

    #[test]
    fn test_byte_spectrum_range() {
        let signal = sine(440.0, 48000.0, 1024);
        let bytes = byte_spectrum(&signal, DEFAULT_MIN_DB, DEFAULT_MAX_DB);
        assert_eq!(bytes.len(), 512);
        assert_eq!(*bytes.iter().max().unwrap(), 255);

        let silent = byte_spectrum(&[0.0; 1024], DEFAULT_MIN_DB, DEFAULT_MAX_DB);
        assert!(silent.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_smooth_spectrum_shrinks_at_edges() {
        let smoothed = smooth_spectrum(&[3.0, 0.0, 0.0, 0.0, 6.0], 3);
        assert_eq!(smoothed, vec![1.5, 1.0, 0.0, 2.0, 3.0]);
    }

    #[test]
    fn test_smooth_spectrum_identity_for_small_window() {
        let input = [1.0, 2.0, 3.0];
        assert_eq!(smooth_spectrum(&input, 1), input.to_vec());
        assert!(smooth_spectrum(&[], 5).is_empty());
    }

    #[test]
    fn test_local_maxima() {
        let values = [0.0, 2.0, 1.0, 1.0, 3.0, 3.0, 0.0, 5.0];
        assert_eq!(local_maxima(&values), vec![1, 4]);
        assert!(local_maxima(&[1.0, 2.0]).is_empty());
    }

    #[test]
    fn test_parabolic_interpolation_recovers_vertex() {
        // y = -(x - 5.3)^2
        let values: Vec<f32> = (0..10).map(|x| -((x as f32 - 5.3).powi(2))).collect();
        let refined = parabolic_interpolation(&values, 5);
        assert!((refined - 5.3).abs() < 1e-4, "refined {refined}");
    }

    #[test]
    fn test_parabolic_interpolation_edges_and_flat() {
        let flat = [1.0; 4];
        assert_eq!(parabolic_interpolation(&flat, 2), 2.0);

        let values = [0.0, 1.0, 4.0];
        let refined = parabolic_interpolation(&values, 2);
        assert!(refined.is_finite());
    }
}
