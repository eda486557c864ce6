pub mod generate;
pub mod run;
pub mod theory;

use clap::{Args, ValueEnum};

use chip_sampling_shared::config::{
    DefectAssignment, DetectionRule, SamplingMode, SimulationPolicy,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AssignmentArg {
    /// Every chip of a bad batch independently bad at the bad chip rate
    PerChip,
    /// Uniform defect count up to the bad chip rate, at shuffled positions
    CappedShuffle,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SamplingArg {
    WithReplacement,
    WithoutReplacement,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RuleArg {
    /// Flag a batch when any sampled chip is bad
    AnyDefect,
    /// Flag when the sampled bad fraction exceeds (1 - p)^n
    ExceedsFailureProbability,
}

#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// How defective chips are placed in a bad batch
    #[arg(long, value_enum, default_value = "per-chip")]
    assignment: AssignmentArg,
    /// Whether sampled chips are drawn with replacement
    #[arg(long, value_enum, default_value = "with-replacement")]
    sampling: SamplingArg,
    /// Rule that flags a sampled batch as bad
    #[arg(long, value_enum, default_value = "any-defect")]
    rule: RuleArg,
}

impl From<PolicyArgs> for SimulationPolicy {
    fn from(args: PolicyArgs) -> Self {
        SimulationPolicy {
            defect_assignment: match args.assignment {
                AssignmentArg::PerChip => DefectAssignment::PerChipBernoulli,
                AssignmentArg::CappedShuffle => DefectAssignment::CappedShuffle,
            },
            sampling: match args.sampling {
                SamplingArg::WithReplacement => SamplingMode::WithReplacement,
                SamplingArg::WithoutReplacement => SamplingMode::WithoutReplacement,
            },
            detection_rule: match args.rule {
                RuleArg::AnyDefect => DetectionRule::AnyDefect,
                RuleArg::ExceedsFailureProbability => DetectionRule::ExceedsFailureProbability,
            },
        }
    }
}
