//! Display WAV file metadata and how it will be framed.

use clap::Args;
use std::path::PathBuf;
use vowelscope_config::{DEFAULT_FFT_SIZE, DEFAULT_HOP_SIZE};
use vowelscope_io::{frame_count, read_wav_info};

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: PathBuf,

    /// Frame size used for the frame count
    #[arg(long, default_value_t = DEFAULT_FFT_SIZE)]
    pub fft_size: usize,

    /// Hop size used for the frame count
    #[arg(long, default_value_t = DEFAULT_HOP_SIZE)]
    pub hop_size: usize,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Format:      {}", info.encoding);
    if info.channels > 1 {
        println!("Channels:    {} (mixed to mono for analysis)", info.channels);
    } else {
        println!("Channels:    {}", info.channels);
    }
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} samples)",
        info.duration_secs(),
        info.frames
    );

    let frames = frame_count(usize::try_from(info.frames)?, args.fft_size, args.hop_size);
    let resolution = f64::from(info.sample_rate) / args.fft_size.max(1) as f64;
    println!(
        "Frames:      {} of {} samples, hop {} ({:.1} Hz per bin)",
        frames, args.fft_size, args.hop_size, resolution
    );

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
