//! Risk metrics over a simulation result.
//!
//! Summarises the per-run EBITDA distribution into the numbers a reviewer
//! asks for: mean, median, left-tail percentiles, probabilities of landing
//! below given thresholds, revenue retention, and segment churn rates.

use churn_core::cohort::{REST_COUNT, TOP_COUNT};
use churn_core::{ModelError, Result};
use serde::{Deserialize, Serialize};

use crate::driver::SimulationResult;

/// Headline risk metrics for one simulated scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Mean simulated EBITDA.
    pub mean_ebitda: f64,
    /// Median simulated EBITDA.
    pub median_ebitda: f64,
    /// 10th percentile of simulated EBITDA.
    pub p10_ebitda: f64,
    /// 5th percentile of simulated EBITDA.
    pub p5_ebitda: f64,
    /// Probability of EBITDA falling strictly below each threshold, paired
    /// as `(threshold, probability)` in caller order.
    pub prob_below: Vec<(f64, f64)>,
    /// Mean simulated contract revenue.
    pub mean_contract_revenue: f64,
    /// Mean retained fraction of base contract revenue.
    pub retained_pct: f64,
    /// Observed churn rate of the top segment over all runs.
    pub top2_churn_rate: f64,
    /// Observed churn rate of the rest segment over all runs.
    pub rest_churn_rate: f64,
}

/// Computes the `pct`-th percentile by linear interpolation.
///
/// Interpolates between order statistics at rank `pct / 100 * (n - 1)`, so
/// `pct = 0` is the minimum and `pct = 100` the maximum. A single-element
/// slice returns that element for every `pct`.
///
/// # Arguments
///
/// * `values` - Sample values, in any order
/// * `pct` - Percentile level in [0, 100]
///
/// # Errors
///
/// Returns [`ModelError::EmptyResult`] on an empty slice and
/// [`ModelError::InvalidConfig`] if `pct` is outside [0, 100].
///
/// # Examples
///
/// ```rust
/// use churn_sim::percentile;
///
/// let values = [5.0, 1.0, 4.0, 2.0, 3.0];
/// assert_eq!(percentile(&values, 50.0).unwrap(), 3.0);
/// assert_eq!(percentile(&values, 10.0).unwrap(), 1.4);
/// ```
pub fn percentile(values: &[f64], pct: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(ModelError::EmptyResult);
    }
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ModelError::InvalidConfig(format!(
            "percentile level must be in [0, 100], got {pct}"
        )));
    }
    if values.len() == 1 {
        return Ok(values[0]);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (pct / 100.0) * (sorted.len() - 1) as f64;
    let low = rank as usize;
    let high = (low + 1).min(sorted.len() - 1);
    let fraction = rank - low as f64;
    Ok(sorted[low] * (1.0 - fraction) + sorted[high] * fraction)
}

/// Summarises a simulation result against EBITDA thresholds.
///
/// Threshold probabilities count runs strictly below each threshold. Churn
/// rates divide the cumulative churn counters by `runs * segment_size`.
///
/// # Arguments
///
/// * `result` - Simulation output to summarise
/// * `thresholds` - EBITDA thresholds, reported in the order given
///
/// # Errors
///
/// Returns [`ModelError::EmptyResult`] if the result holds no runs, and
/// [`ModelError::InvalidConfig`] if any threshold is not a positive finite
/// number.
pub fn summarise(result: &SimulationResult, thresholds: &[f64]) -> Result<RiskMetrics> {
    if result.runs == 0 || result.ebitda.is_empty() {
        return Err(ModelError::EmptyResult);
    }

    let violations: Vec<String> = thresholds
        .iter()
        .filter(|t| !t.is_finite() || **t <= 0.0)
        .map(|t| format!("threshold must be > 0, got {t}"))
        .collect();
    ModelError::from_violations(violations)?;

    let runs = result.runs as f64;
    let mean_ebitda = result.ebitda.iter().sum::<f64>() / runs;
    let mean_contract_revenue = result.contract_revenue.iter().sum::<f64>() / runs;
    let retained_pct = result.retained_fraction.iter().sum::<f64>() / runs;

    let prob_below = thresholds
        .iter()
        .map(|&t| {
            let below = result.ebitda.iter().filter(|&&x| x < t).count();
            (t, below as f64 / runs)
        })
        .collect();

    Ok(RiskMetrics {
        mean_ebitda,
        median_ebitda: percentile(&result.ebitda, 50.0)?,
        p10_ebitda: percentile(&result.ebitda, 10.0)?,
        p5_ebitda: percentile(&result.ebitda, 5.0)?,
        prob_below,
        mean_contract_revenue,
        retained_pct,
        top2_churn_rate: result.top2_churned as f64 / (runs * TOP_COUNT as f64),
        rest_churn_rate: result.rest_churned as f64 / (runs * REST_COUNT as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn synthetic_result(ebitda: Vec<f64>) -> SimulationResult {
        let runs = ebitda.len();
        SimulationResult {
            contract_revenue: vec![2_500_000.0; runs],
            retained_fraction: vec![0.78125; runs],
            ebitda,
            top2_churned: 0,
            rest_churned: 0,
            runs,
            seed: 42,
        }
    }

    #[test]
    fn test_percentile_hand_computed_values() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile(&values, 0.0).unwrap(), 1.0);
        assert_relative_eq!(percentile(&values, 50.0).unwrap(), 3.0);
        assert_relative_eq!(percentile(&values, 10.0).unwrap(), 1.4);
        assert_relative_eq!(percentile(&values, 95.0).unwrap(), 4.8);
        assert_relative_eq!(percentile(&values, 100.0).unwrap(), 5.0);
    }

    #[test]
    fn test_percentile_ignores_input_order() {
        let shuffled = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_relative_eq!(percentile(&shuffled, 10.0).unwrap(), 1.4);
    }

    #[test]
    fn test_percentile_single_element() {
        assert_eq!(percentile(&[7.5], 5.0).unwrap(), 7.5);
        assert_eq!(percentile(&[7.5], 95.0).unwrap(), 7.5);
    }

    #[test]
    fn test_percentile_even_count_median_matches_midpoint_average() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(percentile(&values, 50.0).unwrap(), 2.5);
    }

    #[test]
    fn test_percentile_rejects_empty_and_out_of_range() {
        assert_eq!(percentile(&[], 50.0), Err(ModelError::EmptyResult));
        assert!(percentile(&[1.0, 2.0], -1.0).is_err());
        assert!(percentile(&[1.0, 2.0], 100.5).is_err());
    }

    #[test]
    fn test_summarise_synthetic_distribution() {
        let result = synthetic_result(vec![800_000.0, 900_000.0, 1_000_000.0, 1_100_000.0]);
        let metrics = summarise(&result, &[1_000_000.0, 850_000.0]).unwrap();

        assert_relative_eq!(metrics.mean_ebitda, 950_000.0);
        assert_relative_eq!(metrics.median_ebitda, 950_000.0);
        assert_eq!(metrics.prob_below, vec![(1_000_000.0, 0.5), (850_000.0, 0.25)]);
        assert_relative_eq!(metrics.mean_contract_revenue, 2_500_000.0);
        assert_relative_eq!(metrics.retained_pct, 0.78125);
    }

    #[test]
    fn test_summarise_threshold_count_is_strict() {
        // A run exactly at the threshold does not count as below it.
        let result = synthetic_result(vec![900_000.0, 1_000_000.0]);
        let metrics = summarise(&result, &[1_000_000.0]).unwrap();
        assert_relative_eq!(metrics.prob_below[0].1, 0.5);
    }

    #[test]
    fn test_summarise_churn_rates() {
        let mut result = synthetic_result(vec![1_000_000.0; 5000]);
        result.top2_churned = 3000;
        result.rest_churned = 6000;

        let metrics = summarise(&result, &[1_000_000.0]).unwrap();
        assert_relative_eq!(metrics.top2_churn_rate, 0.3);
        assert_relative_eq!(metrics.rest_churn_rate, 0.2);
    }

    #[test]
    fn test_summarise_empty_result() {
        let result = synthetic_result(Vec::new());
        assert_eq!(summarise(&result, &[1_000_000.0]), Err(ModelError::EmptyResult));
    }

    #[test]
    fn test_summarise_rejects_non_positive_thresholds() {
        let result = synthetic_result(vec![1_000_000.0]);
        assert!(summarise(&result, &[0.0]).is_err());
        assert!(summarise(&result, &[-500.0]).is_err());
        assert!(summarise(&result, &[f64::NAN]).is_err());
    }

    #[test]
    fn test_metrics_serialise_to_json() {
        let result = synthetic_result(vec![800_000.0, 1_200_000.0]);
        let metrics = summarise(&result, &[1_000_000.0]).unwrap();
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("mean_ebitda"));
        assert!(json.contains("prob_below"));

        let back: RiskMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metrics);
    }

    proptest! {
        #[test]
        fn prop_percentiles_are_monotone_in_level(
            values in prop::collection::vec(-1e9f64..1e9, 1..200),
        ) {
            let p5 = percentile(&values, 5.0).unwrap();
            let p10 = percentile(&values, 10.0).unwrap();
            let p50 = percentile(&values, 50.0).unwrap();
            prop_assert!(p5 <= p10);
            prop_assert!(p10 <= p50);
        }

        #[test]
        fn prop_percentile_bounded_by_extremes(
            values in prop::collection::vec(-1e6f64..1e6, 1..100),
            pct in 0.0f64..=100.0,
        ) {
            let p = percentile(&values, pct).unwrap();
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(p >= min && p <= max);
        }
    }
}
