use std::path::Path;

use anyhow::Context;

use chip_sampling_shared::config::{seeded_rng, SimulationConfig, SimulationPolicy};
use chip_sampling_sim::dataset::DatasetStore;
use chip_sampling_sim::generator::DatasetGenerator;

pub fn run(config_path: &Path, output_dir: &Path, seed: u64, policy: SimulationPolicy) -> anyhow::Result<()> {
    let config = SimulationConfig::from_file(config_path)
        .with_context(|| format!("Unable to load scenario {}", config_path.display()))?;
    let mut rng = seeded_rng(seed);

    let generator = DatasetGenerator::new(&config, policy.defect_assignment);
    let batches = generator.generate(config.batch_count, &mut rng);
    DatasetStore::new(output_dir).write_all(&batches)?;

    let defective = batches.iter().filter(|b| b.is_defective()).count();
    println!(
        "Wrote {} data sets ({} defective) to {}",
        batches.len(),
        defective,
        output_dir.display()
    );
    Ok(())
}
