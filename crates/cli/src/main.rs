mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::PolicyArgs;

#[derive(Parser)]
#[command(
    name = "chip-sampling",
    about = "Monte Carlo estimate of how well sampling detects bad chip batches"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate, analyze and report each scenario in order
    Run {
        /// Scenario files with five integers: batches, batch size, bad batch %, bad chip %, samples
        #[arg(required = true)]
        configs: Vec<PathBuf>,
        /// Seed for the generator shared by every scenario in the run
        #[arg(long, default_value = "0")]
        seed: u64,
        /// Write ds{i}.txt label files under DIR/sim{n} and analyze the reloaded copies
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Write one scenario's label files without analyzing them
    Generate {
        /// Scenario file
        config: PathBuf,
        /// Directory that receives ds1.txt .. dsN.txt
        #[arg(long, default_value = "output_files")]
        output_dir: PathBuf,
        #[arg(long, default_value = "0")]
        seed: u64,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Print the closed-form detection probabilities
    Theory {
        /// Percentage of bad chips inside a bad batch
        #[arg(long)]
        bad_chip_percentage: u32,
        /// Chips sampled per batch
        #[arg(long)]
        samples: u32,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CHIP_SAMPLING_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            configs,
            seed,
            output_dir,
            policy,
        } => commands::run::run(&configs, seed, output_dir.as_deref(), policy.into()),
        Commands::Generate {
            config,
            output_dir,
            seed,
            policy,
        } => commands::generate::run(&config, &output_dir, seed, policy.into()),
        Commands::Theory {
            bad_chip_percentage,
            samples,
        } => commands::theory::run(bad_chip_percentage, samples),
    }
}
