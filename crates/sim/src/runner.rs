use std::path::{Path, PathBuf};

use rand::Rng;

use chip_sampling_shared::config::{SimulationConfig, SimulationPolicy};

use crate::dataset::DatasetStore;
use crate::engine::{self, ScenarioError, ScenarioReport};

pub struct ScenarioOutcome {
    pub source: PathBuf,
    pub result: Result<ScenarioReport, ScenarioError>,
}

impl ScenarioOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-scenario dataset directory under the run's output root.
pub fn scenario_dir(root: &Path, scenario: usize) -> PathBuf {
    root.join(format!("sim{}", scenario))
}

fn run_one<R: Rng + ?Sized>(
    source: &Path,
    scenario: usize,
    policy: &SimulationPolicy,
    output_root: Option<&Path>,
    rng: &mut R,
) -> Result<ScenarioReport, ScenarioError> {
    let config = SimulationConfig::from_file(source)?;
    let store = output_root.map(|root| DatasetStore::new(scenario_dir(root, scenario)));
    engine::run_scenario(&config, policy, store.as_ref(), rng)
}

/// Runs every scenario in order against one shared generator. A failed scenario
/// is recorded and the run moves on to the next one.
pub fn run_scenarios<R: Rng + ?Sized>(
    sources: &[PathBuf],
    policy: &SimulationPolicy,
    output_root: Option<&Path>,
    rng: &mut R,
) -> Vec<ScenarioOutcome> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let span = tracing::info_span!("scenario", number = i + 1, source = %source.display());
            let _enter = span.enter();
            let result = run_one(source, i + 1, policy, output_root, rng);
            match &result {
                Ok(report) => tracing::info!(
                    defective = report.stats.defective_batches,
                    detected = report.stats.detected,
                    "scenario finished"
                ),
                Err(err) => tracing::warn!(error = %err, "scenario failed"),
            }
            ScenarioOutcome {
                source: source.clone(),
                result,
            }
        })
        .collect()
}
