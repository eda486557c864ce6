use rand::Rng;

use chip_sampling_shared::config::{ConfigError, SimulationConfig, SimulationPolicy};
use chip_sampling_shared::result::AggregateStats;

use crate::dataset::{DatasetError, DatasetStore};
use crate::detector::Detector;
use crate::generator::DatasetGenerator;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub config: SimulationConfig,
    pub policy: SimulationPolicy,
    pub stats: AggregateStats,
}

/// Generate, optionally round-trip through `store`, then analyze one scenario.
pub fn run_scenario<R: Rng + ?Sized>(
    config: &SimulationConfig,
    policy: &SimulationPolicy,
    store: Option<&DatasetStore>,
    rng: &mut R,
) -> Result<ScenarioReport, ScenarioError> {
    let detector = Detector::new(config, policy)?;
    let generator = DatasetGenerator::new(config, policy.defect_assignment);

    let generated = generator.generate(config.batch_count, rng);
    let batches = match store {
        Some(store) => {
            let reloaded = store.persist_and_reload(&generated)?;
            debug_assert_eq!(reloaded, generated);
            reloaded
        }
        None => generated,
    };

    let stats = detector.analyze(&batches, rng);
    Ok(ScenarioReport {
        config: *config,
        policy: *policy,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip_sampling_shared::config::seeded_rng;

    #[test]
    fn test_same_seed_same_report() {
        let config = SimulationConfig {
            batch_count: 60,
            batch_size: 200,
            ..SimulationConfig::default()
        };
        let policy = SimulationPolicy::default();
        let a = run_scenario(&config, &policy, None, &mut seeded_rng(42)).unwrap();
        let b = run_scenario(&config, &policy, None, &mut seeded_rng(42)).unwrap();
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_store_round_trip_matches_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path());
        let config = SimulationConfig {
            batch_count: 20,
            batch_size: 50,
            ..SimulationConfig::default()
        };
        let policy = SimulationPolicy::default();
        let on_disk = run_scenario(&config, &policy, Some(&store), &mut seeded_rng(3)).unwrap();
        let in_memory = run_scenario(&config, &policy, None, &mut seeded_rng(3)).unwrap();
        assert_eq!(on_disk.stats, in_memory.stats);
        assert!(store.batch_path(20).exists());
    }

    #[test]
    fn test_huge_sample_size_reports_valid_probabilities() {
        let config = SimulationConfig::parse("0 10 10 10 3000000000").unwrap();
        let report = run_scenario(&config, &SimulationPolicy::default(), None, &mut seeded_rng(1)).unwrap();
        assert_eq!(report.stats.failure_probability, 0.0);
        assert_eq!(report.stats.detection_probability, 1.0);
        assert_eq!(report.stats.detection_percentage(), None);
    }

    #[test]
    fn test_invalid_policy_is_scenario_error() {
        let config = SimulationConfig {
            batch_size: 5,
            sample_size: 6,
            ..SimulationConfig::default()
        };
        let policy = SimulationPolicy {
            sampling: chip_sampling_shared::config::SamplingMode::WithoutReplacement,
            ..SimulationPolicy::default()
        };
        let err = run_scenario(&config, &policy, None, &mut seeded_rng(0)).unwrap_err();
        assert!(matches!(err, ScenarioError::Config(_)));
    }
}
