use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::SeedableRng;
use rand_pcg::Pcg64;

// Baseline scenario parameters
pub const BASELINE_BATCH_COUNT: u32 = 200;
pub const BASELINE_BATCH_SIZE: u32 = 1_000;
pub const BASELINE_BAD_BATCH_PERCENTAGE: u32 = 25;
pub const BASELINE_BAD_CHIP_PERCENTAGE: u32 = 15;
pub const BASELINE_SAMPLE_SIZE: u32 = 50;

const FIELD_NAMES: [&str; 5] = [
    "batch_count",
    "batch_size",
    "bad_batch_percentage",
    "bad_chip_percentage",
    "sample_size",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing value for {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {token:?} is not a non-negative integer")]
    InvalidNumber { field: &'static str, token: String },
    #[error("unexpected trailing input: {token:?}")]
    TrailingInput { token: String },
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentageOutOfRange { field: &'static str, value: u32 },
    #[error("cannot sample {sample_size} chips from empty batches")]
    EmptyBatch { sample_size: u32 },
    #[error("sampling without replacement needs sample_size ({sample_size}) <= batch_size ({batch_size})")]
    SampleExceedsBatch { sample_size: u32, batch_size: u32 },
}

/// One scenario: five integers, immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub batch_count: u32,
    pub batch_size: u32,
    pub bad_batch_percentage: u32,
    pub bad_chip_percentage: u32,
    pub sample_size: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            batch_count: BASELINE_BATCH_COUNT,
            batch_size: BASELINE_BATCH_SIZE,
            bad_batch_percentage: BASELINE_BAD_BATCH_PERCENTAGE,
            bad_chip_percentage: BASELINE_BAD_CHIP_PERCENTAGE,
            sample_size: BASELINE_SAMPLE_SIZE,
        }
    }
}

impl SimulationConfig {
    /// Parses `batch_count batch_size bad_batch_% bad_chip_% sample_size`,
    /// separated by any whitespace.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut tokens = text.split_whitespace();
        let mut values = [0u32; 5];
        for (value, field) in values.iter_mut().zip(FIELD_NAMES) {
            let token = tokens.next().ok_or(ConfigError::MissingField { field })?;
            *value = token.parse().map_err(|_| ConfigError::InvalidNumber {
                field,
                token: token.to_string(),
            })?;
        }
        if let Some(token) = tokens.next() {
            return Err(ConfigError::TrailingInput {
                token: token.to_string(),
            });
        }

        let config = Self {
            batch_count: values[0],
            batch_size: values[1],
            bad_batch_percentage: values[2],
            bad_chip_percentage: values[3],
            sample_size: values[4],
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("bad_batch_percentage", self.bad_batch_percentage),
            ("bad_chip_percentage", self.bad_chip_percentage),
        ] {
            if value > 100 {
                return Err(ConfigError::PercentageOutOfRange { field, value });
            }
        }
        if self.batch_size == 0 && self.sample_size > 0 {
            return Err(ConfigError::EmptyBatch {
                sample_size: self.sample_size,
            });
        }
        Ok(())
    }

    /// Upper bound on defective chips in a bad batch under capped assignment.
    /// Integer truncation may make this zero.
    pub fn defect_cap(&self) -> u32 {
        (u64::from(self.bad_chip_percentage) * u64::from(self.batch_size) / 100) as u32
    }
}

impl FromStr for SimulationConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How defective chips are placed inside a bad batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefectAssignment {
    /// Uniform count in `[0, defect_cap]`, placed at distinct shuffled indices.
    CappedShuffle,
    /// Each chip independently bad with probability `bad_chip_percentage / 100`.
    #[default]
    PerChipBernoulli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    #[default]
    WithReplacement,
    WithoutReplacement,
}

/// When a sampled batch is flagged as bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionRule {
    /// At least one sampled chip is bad.
    #[default]
    AnyDefect,
    /// Observed sample defect rate exceeds `(1 - p)^n`.
    ExceedsFailureProbability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationPolicy {
    pub defect_assignment: DefectAssignment,
    pub sampling: SamplingMode,
    pub detection_rule: DetectionRule,
}

impl SimulationPolicy {
    /// Checks constraints that depend on both the policy and the scenario.
    pub fn check(&self, config: &SimulationConfig) -> Result<(), ConfigError> {
        if self.sampling == SamplingMode::WithoutReplacement
            && config.sample_size > config.batch_size
        {
            return Err(ConfigError::SampleExceedsBatch {
                sample_size: config.sample_size,
                batch_size: config.batch_size,
            });
        }
        Ok(())
    }
}

/// The one generator a run shares across all of its scenarios.
pub fn seeded_rng(seed: u64) -> Pcg64 {
    Pcg64::seed_from_u64(seed)
}
