use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use fft_oracle::{Domain, Harness, Layout, RustFftEngine, SweepConfig, Thresholds};

/// Verify an FFT engine with single-tone signals across sizes, domains and
/// spectrum layouts. Exits with status 0 only if every case passes.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Smallest transform length (power of two)
    #[arg(long, default_value_t = 32)]
    min_size: usize,

    /// Largest transform length (power of two)
    #[arg(long, default_value_t = 65536)]
    max_size: usize,

    /// Tones are placed every `size / tone-divisor` bins
    #[arg(long, default_value_t = 16)]
    tone_divisor: usize,

    /// Only test this input domain
    #[arg(long, value_enum)]
    domain: Option<Domain>,

    /// Only test this spectrum path
    #[arg(long, value_enum)]
    layout: Option<Layout>,

    /// Print every bin's power for every case
    #[arg(long)]
    print_spectrum: bool,

    /// Minimum carrier to spur ratio in dB
    #[arg(long, default_value_t = 140.0)]
    min_dynamic_range_db: f64,

    /// Maximum phase error at the tone bin in degrees
    #[arg(long, default_value_t = 1e-4)]
    max_phase_error_deg: f64,

    /// Maximum error of the normalized tone magnitude
    #[arg(long, default_value_t = 1e-6)]
    max_magnitude_error: f64,

    /// Allowed summed squared round-trip error per transform point
    #[arg(long, default_value_t = 1e-7)]
    round_trip_error_per_sample: f64,
}

impl Args {
    fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            min_len: self.min_size,
            max_len: self.max_size,
            tone_divisor: self.tone_divisor,
            domains: self.domain.map_or_else(|| Domain::ALL.to_vec(), |d| vec![d]),
            paths: self.layout.map_or_else(|| Layout::ALL.to_vec(), |l| vec![l]),
            print_spectrum: self.print_spectrum,
            thresholds: Thresholds {
                min_dynamic_range_db: self.min_dynamic_range_db,
                max_phase_error_deg: self.max_phase_error_deg,
                max_magnitude_error: self.max_magnitude_error,
                round_trip_error_per_sample: self.round_trip_error_per_sample,
            },
        }
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let config = args.sweep_config();
    config.validate().context("rejecting command line")?;
    let stdout = io::stdout().lock();
    let mut harness = Harness::new(RustFftEngine::new(), config, stdout);
    let outcome = harness.run().context("sweep aborted")?;
    harness.into_output().flush()?;
    Ok(!outcome.failed())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
