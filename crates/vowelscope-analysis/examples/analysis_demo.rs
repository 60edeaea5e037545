//! Analysis demo: pitch, formants and vowel of synthetic vowels under every
//! formant algorithm.
//!
//! Run with: cargo run -p vowelscope-analysis --example analysis_demo

use vowelscope_analysis::synth::{Resonance, synthetic_vowel};
use vowelscope_analysis::{AudioFrame, FormantAlgorithm, FrameAnalyzer, PitchAlgorithm, VowelTable};

fn main() {
    let sample_rate = 44100;
    let fft_size = 2048;
    let f0 = 130.0;

    for symbol in ["i", "a", "u"] {
        let Some(reference) = VowelTable::ipa().get(symbol) else {
            continue;
        };
        println!(
            "=== /{}/  F0 {} Hz, F1 {} Hz, F2 {} Hz ===\n",
            symbol, f0, reference.f1, reference.f2
        );

        let samples = synthetic_vowel(
            sample_rate as f32,
            f0,
            &[
                Resonance::new(reference.f1, 80.0),
                Resonance::new(reference.f2, 100.0),
                Resonance::new(2500.0_f32.max(reference.f2 + 300.0), 120.0),
            ],
            fft_size,
        );
        let frame = match AudioFrame::from_samples(samples, sample_rate) {
            Ok(frame) => frame.with_magnitude_spectrum(),
            Err(e) => {
                eprintln!("bad frame: {e}");
                return;
            }
        };

        println!(
            "  {:<20} {:>8} {:>8} {:>8} {:>8}  vowel",
            "algorithm", "pitch", "F1", "F2", "F3"
        );
        for algorithm in FormantAlgorithm::ALL {
            let mut analyzer = FrameAnalyzer::new(PitchAlgorithm::Yin, algorithm);
            match analyzer.analyze(&frame) {
                Ok(analysis) => {
                    let cell = |hz: Option<f32>| hz.map_or("-".to_string(), |hz| format!("{hz:.0}"));
                    let formants = &analysis.formants;
                    println!(
                        "  {:<20} {:>8} {:>8} {:>8} {:>8}  {}",
                        algorithm.name(),
                        cell(analysis.pitch),
                        cell(formants.f1().map(|f| f.frequency_hz)),
                        cell(formants.f2().map(|f| f.frequency_hz)),
                        cell(formants.f3().map(|f| f.frequency_hz)),
                        analysis.vowel.map_or("-", |v| v.symbol),
                    );
                }
                Err(e) => println!("  {:<20} error: {e}", algorithm.name()),
            }
        }
        println!();
    }
}
