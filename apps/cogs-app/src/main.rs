//! Gear-chain task generation CLI.
//!
//! Two modes of operation:
//! - `generate`: Produce N samples, printing summaries or writing JSON files
//! - `info`: Print workspace crate versions and the effective config defaults

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cogs_core::config::GenerationConfig;
use cogs_task::SampleGenerator;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Gear chain layout and meshing-rotation engine.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate task samples and print summaries or write JSON files.
    Generate {
        /// Number of samples to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,

        /// Run seed (overrides the config file's seed).
        #[arg(short, long)]
        seed: Option<u64>,

        /// Path to a TOML generation config.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for per-sample JSON output. Summaries only when omitted.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print crate information and config defaults.
    Info,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_generate(
    count: u64,
    seed: Option<u64>,
    config_path: Option<&Path>,
    out_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => GenerationConfig::from_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let generator = SampleGenerator::new(config)?;

    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir)?;
    }

    for index in 0..count {
        let sample = generator.generate(index)?;
        println!(
            "sample {index}: gears={}, axis={:?}, first={}, last={}, stop={:.3}s, frames={}",
            sample.facts.gear_count,
            sample.facts.axis,
            sample.facts.root_direction,
            sample.facts.last_direction,
            sample.stop_time_secs,
            sample.frames.len()
        );
        if let Some(dir) = out_dir {
            let path = dir.join(format!("sample_{index:05}.json"));
            let json = serde_json::to_string_pretty(&sample)?;
            std::fs::write(&path, json)?;
        }
    }

    if let Some(dir) = out_dir {
        println!("\nwrote {count} samples to {}", dir.display());
    }
    Ok(())
}

fn run_info() {
    println!("cogs v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  cogs-core   {}", env!("CARGO_PKG_VERSION"));
    println!("  cogs-layout {}", env!("CARGO_PKG_VERSION"));
    println!("  cogs-sim    {}", env!("CARGO_PKG_VERSION"));
    println!("  cogs-task   {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("config defaults:");
    match toml::to_string(&GenerationConfig::default()) {
        Ok(toml) => {
            for line in toml.lines() {
                println!("  {line}");
            }
        }
        Err(e) => eprintln!("  <serialization error: {e}>"),
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Generate {
            count,
            seed,
            config,
            out,
        }) => run_generate(count, seed, config.as_deref(), out.as_deref()),
        Some(Commands::Info) => {
            run_info();
            Ok(())
        }
        None => {
            // Default: one sample with config defaults.
            run_generate(1, None, None, None)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
