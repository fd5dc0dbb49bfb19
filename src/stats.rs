//! Shared aggregate math for the dashboard and report handlers.
//!
//! Only the divide-by-zero guard lives here: means and rates over an empty
//! subset are 0, never NaN. Rounding policy and threshold bands are decided
//! at each call site because the screens genuinely differ (some round to an
//! integer, some keep one decimal; rating bands start at 95 on one screen
//! and 90 on another).

/// Arithmetic mean, 0.0 over an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// `part / whole * 100`, 0.0 when `whole` is 0.
pub fn rate_percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// One-decimal display formatting ("81.5", "0.0").
pub fn fmt_1dp(value: f64) -> String {
    format!("{:.1}", value)
}

/// Integer display rounding, half away from zero.
pub fn round_int(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_subset_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_seed_scores() {
        // Seed results carry scores 85 and 78; the overall average renders
        // as "81.5" under the one-decimal policy.
        let avg = mean(&[85.0, 78.0]);
        assert_eq!(avg, 81.5);
        assert_eq!(fmt_1dp(avg), "81.5");
    }

    #[test]
    fn rate_handles_empty_and_partial_subsets() {
        assert_eq!(rate_percent(0, 0), 0.0);
        assert_eq!(rate_percent(0, 1), 0.0);
        assert_eq!(rate_percent(2, 3), 200.0 / 3.0);
    }

    #[test]
    fn integer_rounding_is_half_up_for_percentages() {
        assert_eq!(round_int(66.5), 67);
        assert_eq!(round_int(66.4), 66);
        assert_eq!(round_int(0.0), 0);
    }
}
