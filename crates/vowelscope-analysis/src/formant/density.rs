//! Density / valley search.
//!
//! F1 is the tallest bin of its band, widened outward until the spectrum
//! falls below `valley_ratio` of the peak. An overly wide valley is replaced
//! by the most energetic fixed-width window inside the band. F2 is the
//! lowest window of the same width above F1 holding at least
//! `f2_energy_ratio` of F1's energy, or the most energetic one.
//!
//! F1 windows must fit inside the F1 band. F2 windows may start anywhere up
//! to `f2_search_ceiling` and run past it.

use std::ops::{Range, RangeInclusive};

use super::{Bandwidth, Formant, FormantParams, FormantSet, band_bins, tallest};
use crate::spectrum::bin_width;

pub(super) fn estimate(spectrum: &[f32], sample_rate: f32, params: &FormantParams) -> FormantSet {
    let len = spectrum.len();
    let bin_hz = bin_width(sample_rate, len);
    let f1_band = band_bins(params.density_f1_band, bin_hz, len);

    let Some((peak_bin, peak)) = tallest(spectrum, f1_band.clone()) else {
        return FormantSet::default();
    };
    if peak < params.density_floor {
        return FormantSet::default();
    }

    let valley = valley_bounds(spectrum, peak_bin, params.valley_ratio, &f1_band);
    let width_hz = (valley.end() - valley.start()) as f32 * bin_hz;
    let (f1_window, f1_hz) = if width_hz > params.max_valley_width {
        let width = ((params.density_window / bin_hz).round() as usize).max(1);
        let last_start = f1_band.end.saturating_sub(width);
        match max_energy_window(spectrum, f1_band.start..last_start + 1, width) {
            Some(window) => {
                let centre = centre_hz(&window, bin_hz);
                (window, centre)
            }
            None => (valley, peak_bin as f32 * bin_hz),
        }
    } else {
        (valley, peak_bin as f32 * bin_hz)
    };

    let width = f1_window.end() - f1_window.start() + 1;
    let f1_energy = window_energy(spectrum, &f1_window);

    let search_start = ((f1_hz + params.f2_search_offset) / bin_hz).ceil() as usize;
    let search_end = ((params.f2_search_ceiling / bin_hz).floor() as usize).min(len.saturating_sub(1));
    if search_start > search_end {
        return FormantSet::default();
    }
    let starts = search_start..search_end + 1;
    let target = params.f2_energy_ratio * f1_energy;

    let f2_window = starts
        .clone()
        .map(|start| clamped_window(start, width, len))
        .find(|window| window_energy(spectrum, window) >= target)
        .or_else(|| max_energy_window(spectrum, starts, width));
    let Some(f2_window) = f2_window else {
        return FormantSet::default();
    };
    let f2_hz = centre_hz(&f2_window, bin_hz);

    if f2_hz <= f1_hz {
        return FormantSet::default();
    }

    let f2_peak = tallest(spectrum, *f2_window.start()..f2_window.end() + 1)
        .map_or(*f2_window.start(), |(bin, _)| bin);
    let f2_bounds = valley_bounds(spectrum, f2_peak, params.valley_ratio, &(search_start..len));

    FormantSet::new([
        Formant::with_bandwidth(f1_hz, bandwidth(&f1_window, bin_hz)),
        Formant::with_bandwidth(f2_hz, bandwidth(&f2_bounds, bin_hz)),
    ])
}

/// Walk outward from `peak` while bins stay at or above `ratio * spectrum[peak]`,
/// never leaving `bounds`.
pub(crate) fn valley_bounds(
    spectrum: &[f32],
    peak: usize,
    ratio: f32,
    bounds: &Range<usize>,
) -> RangeInclusive<usize> {
    let floor = ratio * spectrum[peak];
    let mut lo = peak;
    while lo > bounds.start && spectrum[lo - 1] >= floor {
        lo -= 1;
    }
    let mut hi = peak;
    while hi + 1 < bounds.end && spectrum[hi + 1] >= floor {
        hi += 1;
    }
    lo..=hi
}

/// Sum of the bins in `window`.
pub(crate) fn window_energy(spectrum: &[f32], window: &RangeInclusive<usize>) -> f32 {
    spectrum[window.clone()].iter().sum()
}

/// Most energetic `width`-bin window among `starts` (first on ties).
pub(crate) fn max_energy_window(
    spectrum: &[f32],
    starts: Range<usize>,
    width: usize,
) -> Option<RangeInclusive<usize>> {
    let len = spectrum.len();
    let mut best: Option<(RangeInclusive<usize>, f32)> = None;
    for start in starts.filter(|&s| s < len) {
        let window = clamped_window(start, width, len);
        let energy = window_energy(spectrum, &window);
        if best.as_ref().is_none_or(|(_, e)| energy > *e) {
            best = Some((window, energy));
        }
    }
    best.map(|(window, _)| window)
}

fn clamped_window(start: usize, width: usize, len: usize) -> RangeInclusive<usize> {
    start..=(start + width.max(1) - 1).min(len - 1)
}

fn centre_hz(window: &RangeInclusive<usize>, bin_hz: f32) -> f32 {
    (window.start() + window.end()) as f32 / 2.0 * bin_hz
}

fn bandwidth(window: &RangeInclusive<usize>, bin_hz: f32) -> Bandwidth {
    Bandwidth {
        low_hz: *window.start() as f32 * bin_hz,
        high_hz: *window.end() as f32 * bin_hz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1024 bins at 20 Hz with a Gaussian bump per `(centre_hz, height, sigma_hz)`.
    fn bumps(peaks: &[(f32, f32, f32)]) -> Vec<f32> {
        (0..1024)
            .map(|k| {
                let f = k as f32 * 20.0;
                peaks
                    .iter()
                    .map(|&(c, h, s)| h * (-((f - c) / s).powi(2) / 2.0).exp())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn two_bumps_with_bandwidths() {
        let spectrum = bumps(&[(500.0, 100.0, 60.0), (1500.0, 80.0, 60.0)]);
        let set = estimate(&spectrum, 40960.0, &FormantParams::default());
        assert_eq!(set.len(), 2);

        let f1 = set.f1().unwrap();
        assert_eq!(f1.frequency_hz, 500.0);
        let bw1 = f1.bandwidth.unwrap();
        assert!(bw1.low_hz < 500.0 && bw1.high_hz > 500.0);
        assert!(bw1.width() < 400.0);

        // The first window reaching two thirds of F1's energy sits on the
        // rising edge of the second bump.
        let f2 = set.f2().unwrap();
        assert!(f2.frequency_hz > 1350.0 && f2.frequency_hz <= 1500.0, "F2 = {}", f2.frequency_hz);
        let bw2 = f2.bandwidth.unwrap();
        assert!(bw2.low_hz < 1500.0 && bw2.high_hz > 1500.0);
    }

    #[test]
    fn wide_valley_uses_sliding_window() {
        let spectrum = bumps(&[(650.0, 100.0, 400.0)]);
        let set = estimate(&spectrum, 40960.0, &FormantParams::default());
        let f1 = set.f1().unwrap();
        assert!((f1.frequency_hz - 650.0).abs() <= 60.0, "F1 = {}", f1.frequency_hz);
        assert!(f1.bandwidth.unwrap().width() <= 220.0);
    }

    #[test]
    fn f2_window_may_run_past_ceiling() {
        // Energy only just above the 3000 Hz ceiling: a window starting
        // below it still reaches the bump, so F2 lands above the ceiling.
        let spectrum = bumps(&[(500.0, 100.0, 60.0), (3100.0, 100.0, 60.0)]);
        let set = estimate(&spectrum, 40960.0, &FormantParams::default());
        let f2 = set.f2().unwrap().frequency_hz;
        assert!(f2 > 3000.0 && f2 < 3200.0, "F2 = {f2}");
    }

    #[test]
    fn weak_peak_is_rejected() {
        let spectrum = vec![0.9; 1024];
        assert!(estimate(&spectrum, 40960.0, &FormantParams::default()).is_empty());
    }

    #[test]
    fn valley_walk_respects_bounds() {
        let spectrum = [1.0, 5.0, 8.0, 10.0, 6.0, 3.0, 9.0];
        assert_eq!(valley_bounds(&spectrum, 3, 0.5, &(0..7)), 1..=4);
        assert_eq!(valley_bounds(&spectrum, 3, 0.5, &(2..4)), 2..=3);
    }

    #[test]
    fn max_energy_window_prefers_first() {
        let spectrum = [0.0, 1.0, 1.0, 0.0, 1.0, 1.0];
        assert_eq!(max_energy_window(&spectrum, 0..5, 2), Some(1..=2));
        assert_eq!(max_energy_window(&spectrum, 10..12, 2), None);
    }
}
