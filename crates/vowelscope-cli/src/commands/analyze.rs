//! Frame-by-frame pitch, formant and vowel analysis of a WAV file.

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use vowelscope_analysis::{
    Formant, FormantAlgorithm, FrameAnalysis, PitchAlgorithm, SpectrumKind,
};
use vowelscope_config::{AnalysisConfig, get_profile};
use vowelscope_io::{FrameReader, read_wav};

/// Spectrum attached to frames for spectrum-based formant algorithms
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliSpectrum {
    /// Linear magnitudes
    Magnitude,
    /// Analyser-style 0-255 bytes
    Bytes,
}

impl From<CliSpectrum> for SpectrumKind {
    fn from(s: CliSpectrum) -> Self {
        match s {
            CliSpectrum::Magnitude => SpectrumKind::Magnitude,
            CliSpectrum::Bytes => SpectrumKind::Bytes,
        }
    }
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Analysis config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in profile (see `vowelscope config profiles`)
    #[arg(long, conflicts_with = "config")]
    profile: Option<String>,

    /// Pitch algorithm: autocorrelation, yin
    #[arg(long)]
    pitch: Option<PitchAlgorithm>,

    /// Formant algorithm: twoPeak, lpc, cepstral, mfcc, burg, autocorrelationLPC, density
    #[arg(long)]
    formant: Option<FormantAlgorithm>,

    /// Samples per frame (power of two)
    #[arg(long)]
    fft_size: Option<usize>,

    /// Samples between frame starts
    #[arg(long)]
    hop_size: Option<usize>,

    /// Spectrum derived for each frame
    #[arg(long, value_enum)]
    spectrum: Option<CliSpectrum>,

    /// Print the full report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Print one line per frame
    #[arg(long, conflicts_with = "json")]
    frames: bool,

    /// Write per-frame results to a file (.json for JSON, CSV otherwise)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Analysis of one frame with its position.
#[derive(Debug, Serialize)]
struct FrameRecord {
    index: usize,
    time_s: f64,
    #[serde(flatten)]
    analysis: FrameAnalysis,
}

/// Pitch range over voiced frames.
#[derive(Debug, Serialize, PartialEq)]
struct PitchStats {
    mean_hz: f32,
    min_hz: f32,
    max_hz: f32,
}

/// Aggregate over all frames.
#[derive(Debug, Serialize, PartialEq)]
struct Summary {
    frames: usize,
    voiced_frames: usize,
    pitch: Option<PitchStats>,
    formant_frames: usize,
    mean_f1_hz: Option<f32>,
    mean_f2_hz: Option<f32>,
    vowels: BTreeMap<&'static str, usize>,
}

impl Summary {
    fn from_records(records: &[FrameRecord]) -> Self {
        let pitches: Vec<f32> = records.iter().filter_map(|r| r.analysis.pitch).collect();
        let pitch = (!pitches.is_empty()).then(|| PitchStats {
            mean_hz: pitches.iter().sum::<f32>() / pitches.len() as f32,
            min_hz: pitches.iter().copied().fold(f32::INFINITY, f32::min),
            max_hz: pitches.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        });

        let pairs: Vec<(f32, f32)> = records
            .iter()
            .filter_map(|r| {
                let formants = &r.analysis.formants;
                Some((formants.f1()?.frequency_hz, formants.f2()?.frequency_hz))
            })
            .collect();
        let mean = |values: Vec<f32>| {
            (!values.is_empty()).then(|| values.iter().sum::<f32>() / values.len() as f32)
        };

        let mut vowels = BTreeMap::new();
        for vowel in records.iter().filter_map(|r| r.analysis.vowel) {
            *vowels.entry(vowel.symbol).or_insert(0) += 1;
        }

        Self {
            frames: records.len(),
            voiced_frames: pitches.len(),
            pitch,
            formant_frames: pairs.len(),
            mean_f1_hz: mean(pairs.iter().map(|p| p.0).collect()),
            mean_f2_hz: mean(pairs.iter().map(|p| p.1).collect()),
            vowels,
        }
    }
}

/// Everything written by `--json` and `.json` outputs.
#[derive(Serialize)]
struct Report<'a> {
    file: String,
    sample_rate: u32,
    duration_s: f64,
    config: &'a AnalysisConfig,
    summary: &'a Summary,
    frames: &'a [FrameRecord],
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let mut analyzer = config.build_analyzer()?;

    let (samples, info) =
        read_wav(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let reader = FrameReader::new(&samples, info.sample_rate, config.fft_size, config.hop_size)?
        .with_spectrum(config.spectrum);
    let duration_s = samples.len() as f64 / f64::from(info.sample_rate);

    tracing::info!(
        file = %args.input.display(),
        sample_rate = info.sample_rate,
        frames = reader.frame_count(),
        pitch = %config.pitch.algorithm,
        formant = %config.formant.algorithm,
        "analyzing"
    );

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(reader.frame_count() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")?
            .progress_chars("##-"),
    );

    let mut records = Vec::with_capacity(reader.frame_count());
    for timed in reader {
        let timed = timed?;
        let analysis = analyzer.analyze(&timed.frame)?;
        tracing::trace!(index = timed.index, pitch = ?analysis.pitch, "frame");
        records.push(FrameRecord {
            index: timed.index,
            time_s: timed.time_secs,
            analysis,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    let summary = Summary::from_records(&records);
    let report = Report {
        file: args.input.display().to_string(),
        sample_rate: info.sample_rate,
        duration_s,
        config: &config,
        summary: &summary,
        frames: &records,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human(&report, args.frames);
    }

    if let Some(output) = &args.output {
        write_output(output, &report)?;
        if !args.json {
            println!("\nWrote {} frames to {}", records.len(), output.display());
        }
    }

    Ok(())
}

fn resolve_config(args: &AnalyzeArgs) -> anyhow::Result<AnalysisConfig> {
    let mut config = match (&args.config, &args.profile) {
        (Some(path), _) => AnalysisConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        (None, Some(name)) => get_profile(name)?,
        (None, None) => AnalysisConfig::default(),
    };

    if let Some(pitch) = args.pitch {
        config.pitch.algorithm = pitch;
    }
    if let Some(formant) = args.formant {
        config.formant.algorithm = formant;
    }
    if let Some(fft_size) = args.fft_size {
        config.fft_size = fft_size;
        if args.hop_size.is_none() && config.hop_size > fft_size {
            config.hop_size = (fft_size / 2).max(1);
        }
    }
    if let Some(hop_size) = args.hop_size {
        config.hop_size = hop_size;
    }
    if let Some(spectrum) = args.spectrum {
        config.spectrum = spectrum.into();
    }
    Ok(config)
}

fn print_human(report: &Report<'_>, per_frame: bool) {
    let config = report.config;
    let summary = report.summary;

    println!(
        "Analyzed {}: {} Hz, {:.2}s, {} frames ({} / {})",
        report.file,
        report.sample_rate,
        report.duration_s,
        summary.frames,
        config.fft_size,
        config.hop_size
    );
    println!("  Pitch:    {}", config.pitch.algorithm);
    println!("  Formants: {}", config.formant.algorithm);

    if per_frame {
        println!(
            "\n  {:>6}  {:>8}  {:>8}  {:>7}  {:>7}  {:>7}  {:<5}",
            "Frame", "Time (s)", "F0 (Hz)", "F1", "F2", "F3", "Vowel"
        );
        for record in report.frames {
            let cells = csv_cells(record);
            println!(
                "  {:>6}  {:>8.3}  {:>8}  {:>7}  {:>7}  {:>7}  {:<5}",
                record.index, record.time_s, cells[0], cells[1], cells[2], cells[3], cells[4]
            );
        }
    }

    println!("\nVoiced frames: {} / {}", summary.voiced_frames, summary.frames);
    if let Some(pitch) = &summary.pitch {
        println!(
            "Pitch:         mean {:.1} Hz ({:.1} - {:.1})",
            pitch.mean_hz, pitch.min_hz, pitch.max_hz
        );
    }
    if let (Some(f1), Some(f2)) = (summary.mean_f1_hz, summary.mean_f2_hz) {
        println!(
            "Formants:      mean F1 {:.0} Hz, F2 {:.0} Hz ({} frames)",
            f1, f2, summary.formant_frames
        );
    }
    if !summary.vowels.is_empty() {
        let mut counts: Vec<(&&str, &usize)> = summary.vowels.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        let line = counts
            .iter()
            .map(|(symbol, count)| format!("{symbol} {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Vowels:        {line}");
    }
}

/// Pitch, F1-F3 and vowel as text cells, empty when absent.
fn csv_cells(record: &FrameRecord) -> [String; 6] {
    let analysis = &record.analysis;
    let hz = |value: Option<f32>| value.map(|v| format!("{v:.1}")).unwrap_or_default();
    let formants = &analysis.formants;
    let frequency = |formant: Option<&Formant>| hz(formant.map(|f| f.frequency_hz));
    [
        hz(analysis.pitch),
        frequency(formants.f1()),
        frequency(formants.f2()),
        frequency(formants.f3()),
        analysis
            .vowel
            .map(|v| v.symbol.to_string())
            .unwrap_or_default(),
        hz(analysis.vowel.map(|v| v.distance)),
    ]
}

fn to_csv(records: &[FrameRecord]) -> String {
    let mut csv =
        String::from("index,time_s,pitch_hz,f1_hz,f2_hz,f3_hz,vowel,vowel_distance_hz\n");
    for record in records {
        let cells = csv_cells(record);
        // Writing to a String cannot fail.
        let _ = writeln!(
            csv,
            "{},{:.4},{}",
            record.index,
            record.time_s,
            cells.join(",")
        );
    }
    csv
}

fn write_output(path: &Path, report: &Report<'_>) -> anyhow::Result<()> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let content = if is_json {
        serde_json::to_string_pretty(report)?
    } else {
        to_csv(report.frames)
    };
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
