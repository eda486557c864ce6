use chip_sampling_shared::probability::{detection_probability, failure_to_detect_probability};

pub fn run(bad_chip_percentage: u32, samples: u32) -> anyhow::Result<()> {
    if bad_chip_percentage > 100 {
        anyhow::bail!("bad chip percentage must be between 0 and 100, got {}", bad_chip_percentage);
    }
    let base = f64::from(100 - bad_chip_percentage) / 100.0;
    println!("Base = {:.4}, exponent = {}", base, samples);
    println!(
        "P(failure to detect bad item) = {:.4}",
        failure_to_detect_probability(bad_chip_percentage, samples)
    );
    println!(
        "P(detect bad batch)           = {:.4}",
        detection_probability(bad_chip_percentage, samples)
    );
    Ok(())
}
