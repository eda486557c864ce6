use chip_sampling_shared::config::{DefectAssignment, DetectionRule, SamplingMode};
use chip_sampling_sim::engine::ScenarioReport;

const UNDEFINED: &str = "undefined";

fn or_undefined<T>(value: Option<T>, fmt: impl FnOnce(T) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| UNDEFINED.to_string())
}

pub fn render_report(report: &ScenarioReport) -> String {
    let config = &report.config;
    let policy = &report.policy;
    let stats = &report.stats;

    let assignment = match policy.defect_assignment {
        DefectAssignment::PerChipBernoulli => "per-chip",
        DefectAssignment::CappedShuffle => "capped-shuffle",
    };
    let sampling = match policy.sampling {
        SamplingMode::WithReplacement => "with replacement",
        SamplingMode::WithoutReplacement => "without replacement",
    };
    let rule = match policy.detection_rule {
        DetectionRule::AnyDefect => "any defect",
        DetectionRule::ExceedsFailureProbability => "exceeds P(failure)",
    };

    let max_defects = or_undefined(stats.max_defects, |v| v.to_string());
    let min_defects = or_undefined(stats.min_defects, |v| v.to_string());
    let avg_defects = or_undefined(stats.avg_defects(), |v| format!("{:.2}", v));
    let detected_pct = or_undefined(stats.detection_percentage(), |v| format!("{:.2}%", v));

    format!(
        "Generating data sets:\n\
         \tNumber of batches of items:\t\t\t{batch_count}\n\
         \tNumber of items in each batch:\t\t\t{batch_size}\n\
         \tPercentage of batches containing bad items:\t{bad_batch}%\n\
         \tPercentage of items that are bad in a bad set:\t{bad_chip}%\n\
         \tItems sampled from each set:\t\t\t{samples}\n\
         \tPolicy: {assignment} / {sampling} / {rule}\n\
         \n\
         \tTotal bad sets = {defective}\n\
         \tMax number of bad items in a bad set = {max_defects}\n\
         \tMin number of bad items in a bad set = {min_defects}\n\
         \tAverage number of bad items in a bad set = {avg_defects}\n\
         \n\
         Analyzing Data Sets\n\
         \tP(failure to detect bad item) = {failure:.4}\n\
         \tP(detect bad batch)           = {detection:.4}\n\
         \tBad batches detected = {detected} of {defective}\n\
         \tPercentage of bad batches detected = {detected_pct} (expected {expected:.2}%)\n",
        batch_count = config.batch_count,
        batch_size = config.batch_size,
        bad_batch = config.bad_batch_percentage,
        bad_chip = config.bad_chip_percentage,
        samples = config.sample_size,
        defective = stats.defective_batches,
        failure = stats.failure_probability,
        detection = stats.detection_probability,
        detected = stats.detected,
        expected = stats.expected_detection_percentage(),
    )
}

pub fn print_report(report: &ScenarioReport) {
    print!("{}", render_report(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip_sampling_shared::config::{SimulationConfig, SimulationPolicy};
    use chip_sampling_shared::result::{AggregateStats, DetectionResult};

    fn report(results: &[DetectionResult]) -> ScenarioReport {
        let config = SimulationConfig {
            batch_count: results.len() as u32,
            batch_size: 20,
            bad_batch_percentage: 50,
            bad_chip_percentage: 1,
            sample_size: 20,
        };
        ScenarioReport {
            config,
            policy: SimulationPolicy::default(),
            stats: AggregateStats::from_results(&config, results),
        }
    }

    #[test]
    fn test_renders_fixed_precision() {
        let results = [
            DetectionResult { defect_count: 2, bad_in_sample: 1, flagged: true },
            DetectionResult { defect_count: 1, bad_in_sample: 0, flagged: false },
            DetectionResult { defect_count: 0, bad_in_sample: 0, flagged: false },
        ];
        let text = render_report(&report(&results));
        assert!(text.contains("Total bad sets = 2"));
        assert!(text.contains("Max number of bad items in a bad set = 2"));
        assert!(text.contains("Min number of bad items in a bad set = 1"));
        assert!(text.contains("Average number of bad items in a bad set = 1.50"));
        assert!(text.contains("Percentage of bad batches detected = 50.00% (expected 18.21%)"));
        assert!(text.contains("P(failure to detect bad item) = 0.8179"));
        assert!(text.contains("Policy: per-chip / with replacement / any defect"));
    }

    #[test]
    fn test_report_layout() {
        let results = [DetectionResult { defect_count: 4, bad_in_sample: 2, flagged: true }];
        let text = render_report(&report(&results));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 18);
        assert!(text.ends_with('\n'));
        assert_eq!(lines[0], "Generating data sets:");
        assert_eq!(lines[1], "\tNumber of batches of items:\t\t\t1");
        assert_eq!(lines[5], "\tItems sampled from each set:\t\t\t20");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "\tTotal bad sets = 1");
        assert_eq!(lines[12], "");
        assert_eq!(lines[13], "Analyzing Data Sets");
        assert_eq!(lines[16], "\tBad batches detected = 1 of 1");
        assert_eq!(
            lines[17],
            "\tPercentage of bad batches detected = 100.00% (expected 18.21%)"
        );
    }

    #[test]
    fn test_zero_defective_batches_render_undefined() {
        let results = [DetectionResult { defect_count: 0, bad_in_sample: 0, flagged: false }; 3];
        let text = render_report(&report(&results));
        assert!(text.contains("Total bad sets = 0"));
        assert!(text.contains("Average number of bad items in a bad set = undefined"));
        assert!(text.contains("Percentage of bad batches detected = undefined"));
        assert!(!text.contains("NaN"));
    }
}
