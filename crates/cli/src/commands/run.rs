use std::path::{Path, PathBuf};

use chip_sampling_shared::config::{seeded_rng, SimulationPolicy};
use chip_sampling_sim::runner;

use crate::output;

pub fn run(
    configs: &[PathBuf],
    seed: u64,
    output_dir: Option<&Path>,
    policy: SimulationPolicy,
) -> anyhow::Result<()> {
    let mut rng = seeded_rng(seed);
    let start = std::time::Instant::now();
    let outcomes = runner::run_scenarios(configs, &policy, output_dir, &mut rng);
    let elapsed = start.elapsed();

    let mut failed = 0;
    for (i, outcome) in outcomes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("Simulation #{}", i + 1);
        match &outcome.result {
            Ok(report) => output::print_report(report),
            Err(err) => {
                failed += 1;
                eprintln!("  {}: {}", outcome.source.display(), err);
            }
        }
    }
    tracing::info!(scenarios = outcomes.len(), failed, elapsed_ms = elapsed.as_millis() as u64, "run complete");

    if failed > 0 {
        anyhow::bail!("{} of {} scenarios failed", failed, outcomes.len());
    }
    Ok(())
}
