use crate::config::SimulationConfig;
use crate::probability::{detection_probability, failure_to_detect_probability};

/// Outcome of inspecting one batch. Never mutates the batch it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionResult {
    pub defect_count: u32,
    pub bad_in_sample: u32,
    pub flagged: bool,
}

impl DetectionResult {
    #[inline]
    pub fn is_defective(&self) -> bool {
        self.defect_count > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    pub batch_count: u32,
    pub defective_batches: u32,
    pub detected: u32,
    pub min_defects: Option<u32>,
    pub max_defects: Option<u32>,
    pub total_defects: u64,
    pub failure_probability: f64,
    pub detection_probability: f64,
}

impl AggregateStats {
    pub fn from_results(config: &SimulationConfig, results: &[DetectionResult]) -> Self {
        let mut stats = Self {
            batch_count: results.len() as u32,
            defective_batches: 0,
            detected: 0,
            min_defects: None,
            max_defects: None,
            total_defects: 0,
            failure_probability: failure_to_detect_probability(
                config.bad_chip_percentage,
                config.sample_size,
            ),
            detection_probability: detection_probability(
                config.bad_chip_percentage,
                config.sample_size,
            ),
        };

        for result in results {
            if !result.is_defective() {
                continue;
            }
            stats.defective_batches += 1;
            if result.flagged {
                stats.detected += 1;
            }
            let k = result.defect_count;
            stats.min_defects = Some(stats.min_defects.map_or(k, |m| m.min(k)));
            stats.max_defects = Some(stats.max_defects.map_or(k, |m| m.max(k)));
            stats.total_defects += u64::from(k);
        }
        stats
    }

    /// Mean bad chips per defective batch; `None` when nothing was defective.
    pub fn avg_defects(&self) -> Option<f64> {
        if self.defective_batches == 0 {
            None
        } else {
            Some(self.total_defects as f64 / f64::from(self.defective_batches))
        }
    }

    /// `detected / defective_batches * 100`, undefined without defective batches.
    pub fn detection_percentage(&self) -> Option<f64> {
        if self.defective_batches == 0 {
            None
        } else {
            Some(f64::from(self.detected) / f64::from(self.defective_batches) * 100.0)
        }
    }

    pub fn expected_detection_percentage(&self) -> f64 {
        self.detection_probability * 100.0
    }
}
