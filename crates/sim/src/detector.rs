use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use chip_sampling_shared::config::{
    ConfigError, DetectionRule, SamplingMode, SimulationConfig, SimulationPolicy,
};
use chip_sampling_shared::label::Batch;
use chip_sampling_shared::probability::failure_to_detect_probability;
use chip_sampling_shared::result::{AggregateStats, DetectionResult};

/// Monte Carlo inspector: samples chips from each batch and flags it.
pub struct Detector {
    config: SimulationConfig,
    sampling: SamplingMode,
    rule: DetectionRule,
    failure_probability: f64,
}

impl Detector {
    pub fn new(config: &SimulationConfig, policy: &SimulationPolicy) -> Result<Self, ConfigError> {
        config.validate()?;
        policy.check(config)?;
        Ok(Self {
            config: *config,
            sampling: policy.sampling,
            rule: policy.detection_rule,
            failure_probability: failure_to_detect_probability(
                config.bad_chip_percentage,
                config.sample_size,
            ),
        })
    }

    /// Number of bad chips among `sample_size` sampled positions.
    fn count_sampled_defects<R: Rng + ?Sized>(&self, batch: &Batch, rng: &mut R) -> u32 {
        let n = self.config.sample_size as usize;
        if n == 0 || batch.is_empty() {
            return 0;
        }

        match self.sampling {
            SamplingMode::WithReplacement => {
                let dist = Uniform::new(0, batch.len());
                (0..n)
                    .filter(|_| batch.label(dist.sample(rng)).is_bad())
                    .count() as u32
            }
            SamplingMode::WithoutReplacement => {
                let amount = n.min(batch.len());
                index::sample(rng, batch.len(), amount)
                    .iter()
                    .filter(|&i| batch.label(i).is_bad())
                    .count() as u32
            }
        }
    }

    fn is_flagged(&self, bad_in_sample: u32) -> bool {
        match self.rule {
            DetectionRule::AnyDefect => bad_in_sample > 0,
            DetectionRule::ExceedsFailureProbability => {
                if self.config.sample_size == 0 {
                    return false;
                }
                let observed = f64::from(bad_in_sample) / f64::from(self.config.sample_size);
                observed > self.failure_probability
            }
        }
    }

    pub fn inspect<R: Rng + ?Sized>(&self, batch: &Batch, rng: &mut R) -> DetectionResult {
        let bad_in_sample = self.count_sampled_defects(batch, rng);
        DetectionResult {
            defect_count: batch.defect_count(),
            bad_in_sample,
            flagged: self.is_flagged(bad_in_sample),
        }
    }

    pub fn analyze<R: Rng + ?Sized>(&self, batches: &[Batch], rng: &mut R) -> AggregateStats {
        let results: Vec<DetectionResult> = batches.iter().map(|b| self.inspect(b, rng)).collect();
        let stats = AggregateStats::from_results(&self.config, &results);
        tracing::debug!(
            defective = stats.defective_batches,
            detected = stats.detected,
            rule = ?self.rule,
            sampling = ?self.sampling,
            "analyzed datasets"
        );
        stats
    }
}
