//! Closed-form detection probabilities for sampling `n` chips from a batch
//! whose chips are bad with probability `p`.

/// `(1 - p)^n`: chance that none of `sample_size` independent draws is bad.
#[inline]
pub fn failure_to_detect_probability(bad_chip_percentage: u32, sample_size: u32) -> f64 {
    let base = (100.0 - f64::from(bad_chip_percentage)) / 100.0;
    base.powf(f64::from(sample_size))
}

#[inline]
pub fn detection_probability(bad_chip_percentage: u32, sample_size: u32) -> f64 {
    1.0 - failure_to_detect_probability(bad_chip_percentage, sample_size)
}

pub fn expected_detection_percentage(bad_chip_percentage: u32, sample_size: u32) -> f64 {
    detection_probability(bad_chip_percentage, sample_size) * 100.0
}
