//! Two-peak heuristic: tallest bin in an F1 band, tallest sufficiently
//! higher bin in an F2 band.

use super::{FormantParams, FormantSet, band_bins, tallest};
use crate::spectrum::bin_width;

pub(super) fn estimate(spectrum: &[f32], sample_rate: f32, params: &FormantParams) -> FormantSet {
    let bin_hz = bin_width(sample_rate, spectrum.len());

    let Some((f1_bin, f1_mag)) = tallest(spectrum, band_bins(params.two_peak_f1_band, bin_hz, spectrum.len()))
    else {
        return FormantSet::default();
    };

    let f2_range = band_bins(params.two_peak_f2_band, bin_hz, spectrum.len());
    let f2_start = f2_range.start.max(f1_bin + params.min_peak_separation_bins);
    let Some((f2_bin, f2_mag)) = tallest(spectrum, f2_start..f2_range.end.max(f2_start)) else {
        return FormantSet::default();
    };

    if f1_mag < params.min_peak_magnitude || f2_mag < params.min_peak_magnitude || f2_bin <= f1_bin
    {
        return FormantSet::default();
    }

    FormantSet::from_frequencies([f1_bin as f32 * bin_hz, f2_bin as f32 * bin_hz])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1024 bins at 20 Hz spacing with bumps at the given bins.
    fn spectrum_with(peaks: &[(usize, f32)]) -> Vec<f32> {
        let mut spectrum = vec![0.5; 1024];
        for &(bin, height) in peaks {
            spectrum[bin] = height;
        }
        spectrum
    }

    #[test]
    fn picks_tallest_bins_per_band() {
        // 40960 Hz / 2048 = 20 Hz per bin
        let spectrum = spectrum_with(&[(25, 80.0), (30, 120.0), (75, 90.0), (100, 60.0)]);
        let set = estimate(&spectrum, 40960.0, &FormantParams::default());
        assert_eq!(set.frequencies(), vec![600.0, 1500.0]);
    }

    #[test]
    fn f2_must_clear_separation() {
        // F1 at bin 45 (900 Hz); bin 48 sits inside the F2 band but too close.
        let spectrum = spectrum_with(&[(45, 200.0), (48, 150.0), (60, 50.0)]);
        let set = estimate(&spectrum, 40960.0, &FormantParams::default());
        assert_eq!(set.frequencies(), vec![900.0, 1200.0]);
    }

    #[test]
    fn weak_peaks_are_rejected() {
        let spectrum = vec![0.5; 1024];
        assert!(estimate(&spectrum, 40960.0, &FormantParams::default()).is_empty());
    }
}
