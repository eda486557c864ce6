use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use chip_sampling_shared::config::{DefectAssignment, SimulationConfig};
use chip_sampling_shared::label::{Batch, ChipLabel};

/// Synthesizes labeled batches for one scenario.
pub struct DatasetGenerator {
    batch_size: usize,
    bad_batch_percentage: u32,
    bad_chip_percentage: u32,
    defect_cap: u32,
    assignment: DefectAssignment,
    percent_roll: Uniform<u32>,
}

impl DatasetGenerator {
    pub fn new(config: &SimulationConfig, assignment: DefectAssignment) -> Self {
        Self {
            batch_size: config.batch_size as usize,
            bad_batch_percentage: config.bad_batch_percentage,
            bad_chip_percentage: config.bad_chip_percentage,
            defect_cap: config.defect_cap(),
            assignment,
            percent_roll: Uniform::new(0, 100),
        }
    }

    /// Draws one batch. A batch rolled as bad may still come out with zero bad
    /// chips when the defect cap truncates to 0 or every per-chip roll passes.
    pub fn generate_batch<R: Rng + ?Sized>(&self, rng: &mut R) -> Batch {
        let is_bad_batch = self.percent_roll.sample(rng) < self.bad_batch_percentage;
        if !is_bad_batch {
            return Batch::all_good(self.batch_size);
        }

        match self.assignment {
            DefectAssignment::CappedShuffle => {
                let k = Uniform::new_inclusive(0, self.defect_cap).sample(rng) as usize;
                let mut labels = vec![ChipLabel::Good; self.batch_size];
                let mut indices: Vec<usize> = (0..self.batch_size).collect();
                let (chosen, _) = indices.partial_shuffle(rng, k);
                for &i in chosen.iter() {
                    labels[i] = ChipLabel::Bad;
                }
                Batch::new(labels)
            }
            DefectAssignment::PerChipBernoulli => {
                let labels = (0..self.batch_size)
                    .map(|_| {
                        if self.percent_roll.sample(rng) < self.bad_chip_percentage {
                            ChipLabel::Bad
                        } else {
                            ChipLabel::Good
                        }
                    })
                    .collect();
                Batch::new(labels)
            }
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, batch_count: u32, rng: &mut R) -> Vec<Batch> {
        let batches: Vec<Batch> = (0..batch_count).map(|_| self.generate_batch(rng)).collect();
        tracing::debug!(
            batch_count,
            defective = batches.iter().filter(|b| b.is_defective()).count(),
            assignment = ?self.assignment,
            "generated datasets"
        );
        batches
    }
}
