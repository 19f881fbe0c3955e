use anyhow::{Context, Result};
use block_spectrum::{
    block_peaks, write_peaks, AnalysisConfig, Mp3Decoder, WaveformSource, BLOCK_SIZE, STEP_SIZE,
};
use clap::Parser;
use std::io::{self, BufWriter};
use std::path::PathBuf;

/// Print the peak FFT magnitude of every overlapping block of an MP3 file
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// MP3 file to analyze
    #[arg(default_value = "input.mp3")]
    input: PathBuf,

    /// Block length in samples (power of two)
    #[arg(long, default_value_t = BLOCK_SIZE)]
    block_size: usize,

    /// Distance between successive block starts in samples
    #[arg(long, default_value_t = STEP_SIZE)]
    step_size: usize,

    /// Analyze blocks in parallel
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (defaults to one per core)
    #[arg(long, requires = "parallel")]
    jobs: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = AnalysisConfig::new(cli.block_size, cli.step_size).with_parallel(cli.parallel);
    config.validate().context("invalid block geometry")?;

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    let waveform = Mp3Decoder::new()
        .decode(&cli.input)
        .with_context(|| format!("failed to decode {}", cli.input.display()))?;

    if waveform.channels > 1 {
        log::warn!(
            "{} channels are interleaved; blocks span samples from all channels",
            waveform.channels
        );
    }

    let peaks = block_peaks(&waveform.samples, &config)?;
    log::debug!("Computed {} block peaks", peaks.len());

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    write_peaks(&mut writer, &peaks).context("failed to write results")?;

    Ok(())
}
