//! Report formatting for the `churnsim` binary.
//!
//! Every block is built as a plain string with no trailing blank line, so
//! the blocks can be unit tested without capturing stdout. Commands print
//! them verbatim and add the blank line between blocks themselves.

use churn_core::cohort::{REST_COUNT, TOP_COUNT};
use churn_core::prelude::ScenarioConfig;
use churn_sim::{RiskMetrics, SensitivityGrid, SimulationSettings};

use crate::config::CaseAnchors;

/// Formats a value as whole dollars with thousands separators. Negative
/// values keep the sign between the dollar sign and the digits.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("${sign}{}", group_thousands(rounded.unsigned_abs()))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Header block: case anchors and the assumptions behind the run.
pub fn assumptions_block(
    scenario_name: &str,
    scenario: &ScenarioConfig,
    anchors: &CaseAnchors,
    settings: &SimulationSettings,
    thresholds: &[f64],
) -> String {
    let rule = "=".repeat(72);
    let threshold_list = thresholds
        .iter()
        .map(|&t| format_currency(t))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        rule.clone(),
        format!("Contract Churn Monte Carlo | Scenario: {scenario_name}"),
        rule,
        "Case anchors:".to_string(),
        format!(
            "- LTM total revenue: {} | contract revenue: {} | LTM EBITDA: {}",
            format_currency(anchors.ltm_total_revenue),
            format_currency(scenario.base_contract_revenue),
            format_currency(scenario.base_ebitda),
        ),
        format!(
            "- Contract clients: ~{} | top-2 share: {:.1}% | terms: {} months",
            anchors.contract_client_count,
            anchors.top2_contract_share * 100.0,
            anchors.contract_term_months,
        ),
        "Simulation assumptions:".to_string(),
        format!(
            "- Runs: {} | Seed: {} | Thresholds: {}",
            group_thousands(settings.runs() as u64),
            settings.seed(),
            threshold_list,
        ),
        format!(
            "- Renewal means (top2/rest): {:.2} / {:.2}",
            scenario.top2_renewal_mean, scenario.rest_renewal_mean,
        ),
        format!(
            "- Downsell factor triangular(low/mode/high): {:.2} / {:.2} / {:.2}",
            scenario.downsell_low, scenario.downsell_mode, scenario.downsell_high,
        ),
        format!(
            "- Backfill: {:.0}% | Contract GM: {:.0}% | Drop-through: {:.0}%",
            scenario.backfill_fraction * 100.0,
            scenario.gm_contract * 100.0,
            scenario.drop_through * 100.0,
        ),
    ];

    if scenario.stochastic_renewal {
        lines.push(format!(
            "- Renewal draws: Beta, concentration {:.0}",
            scenario.renewal_concentration
        ));
    }
    if scenario.stochastic_backfill {
        lines.push(format!(
            "- Backfill draws: Beta, concentration {:.0}",
            scenario.backfill_concentration
        ));
    }

    lines.join("\n")
}

/// Headline metrics block.
pub fn summary_block(metrics: &RiskMetrics) -> String {
    let mut lines = vec![
        "Summary risk metrics:".to_string(),
        format!(
            "- Expected EBITDA (mean): {}",
            format_currency(metrics.mean_ebitda)
        ),
        format!("- Median EBITDA: {}", format_currency(metrics.median_ebitda)),
        format!("- P10 EBITDA: {}", format_currency(metrics.p10_ebitda)),
        format!("- P5 EBITDA: {}", format_currency(metrics.p5_ebitda)),
    ];
    for &(threshold, prob) in &metrics.prob_below {
        lines.push(format!(
            "- P(EBITDA < {}): {:.1}%",
            format_currency(threshold),
            prob * 100.0,
        ));
    }
    lines.push(format!(
        "- Expected contract revenue retained: {:.1}%",
        metrics.retained_pct * 100.0,
    ));
    lines.join("\n")
}

/// Observed churn rates, as a small pipe table.
pub fn churn_block(metrics: &RiskMetrics) -> String {
    [
        "Observed churn rates by segment (from simulation):".to_string(),
        "| Segment | Churn Rate |".to_string(),
        "|---|---:|".to_string(),
        format!(
            "| Top {TOP_COUNT} customers | {:.1}% |",
            metrics.top2_churn_rate * 100.0
        ),
        format!(
            "| Other {REST_COUNT} customers | {:.1}% |",
            metrics.rest_churn_rate * 100.0
        ),
    ]
    .join("\n")
}

/// Sweep results as a pipe table, worst cell first.
pub fn sensitivity_block(grid: &SensitivityGrid) -> String {
    let mut lines = vec![
        "Sensitivity table: P10 EBITDA across assumption grid".to_string(),
        "| gm_contract | drop_through | top2_renewal_mean | backfill | P10 EBITDA |".to_string(),
        "|---:|---:|---:|---:|---:|".to_string(),
    ];
    for cell in grid.sorted_by_p10() {
        lines.push(format!(
            "| {:.2} | {:.2} | {:.2} | {:.2} | {} |",
            cell.gm_contract,
            cell.drop_through,
            cell.top2_renewal_mean,
            cell.backfill_fraction,
            format_currency(cell.p10_ebitda),
        ));
    }
    lines.join("\n")
}

/// Management-facing takeaways, including the two what-if lifts computed by
/// re-running the simulation with a boosted lever.
pub fn vp_block(
    scenario_name: &str,
    metrics: &RiskMetrics,
    base_contract_revenue: f64,
    p10_lift_top2: f64,
    p10_lift_backfill: f64,
) -> String {
    let mut lines = vec!["VP-ready implications:".to_string()];

    if let Some(&(threshold, prob)) = metrics.prob_below.first() {
        lines.push(format!(
            "- In {scenario_name}, there is a {:.1}% probability EBITDA falls below {}, \
             with concentration risk centered on top-2 renewals.",
            prob * 100.0,
            format_currency(threshold),
        ));
    }
    lines.push(format!(
        "- Tail downside remains material: P10 EBITDA is {} and P5 is {}.",
        format_currency(metrics.p10_ebitda),
        format_currency(metrics.p5_ebitda),
    ));
    lines.push(format!(
        "- Increasing top-2 renewal mean by +10 pts lifts P10 EBITDA by ~{}.",
        format_currency(p10_lift_top2),
    ));
    lines.push(format!(
        "- Adding +25 pts backfill (capped at 50%) improves P10 EBITDA by ~{}.",
        format_currency(p10_lift_backfill),
    ));
    lines.push(format!(
        "- Expected contract revenue retained is {:.1}% of the {} contract base.",
        metrics.retained_pct * 100.0,
        format_currency(base_contract_revenue),
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use churn_core::prelude::{CustomerCohort, SimRng};
    use churn_sim::{run_sensitivity, SweepDims};

    use super::*;

    fn sample_metrics() -> RiskMetrics {
        RiskMetrics {
            mean_ebitda: 903_456.7,
            median_ebitda: 910_000.0,
            p10_ebitda: 780_123.4,
            p5_ebitda: 730_000.0,
            prob_below: vec![(1_000_000.0, 0.82), (800_000.0, 0.13)],
            mean_contract_revenue: 2_900_000.0,
            retained_pct: 0.906,
            top2_churn_rate: 0.301,
            rest_churn_rate: 0.198,
        }
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(1_234_567.4), "$1,234,567");
        assert_eq!(format_currency(-1_234.0), "$-1,234");
        assert_eq!(format_currency(999.6), "$1,000");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000");
    }

    #[test]
    fn test_summary_block_lines() {
        let block = summary_block(&sample_metrics());
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "Summary risk metrics:");
        assert_eq!(lines[1], "- Expected EBITDA (mean): $903,457");
        assert_eq!(lines[2], "- Median EBITDA: $910,000");
        assert_eq!(lines[3], "- P10 EBITDA: $780,123");
        assert_eq!(lines[4], "- P5 EBITDA: $730,000");
        assert_eq!(lines[5], "- P(EBITDA < $1,000,000): 82.0%");
        assert_eq!(lines[6], "- P(EBITDA < $800,000): 13.0%");
        assert_eq!(lines[7], "- Expected contract revenue retained: 90.6%");
    }

    #[test]
    fn test_churn_block_table() {
        let block = churn_block(&sample_metrics());
        assert_eq!(
            block,
            "Observed churn rates by segment (from simulation):\n\
             | Segment | Churn Rate |\n\
             |---|---:|\n\
             | Top 2 customers | 30.1% |\n\
             | Other 6 customers | 19.8% |"
        );
    }

    #[test]
    fn test_assumptions_block_base_scenario() {
        let scenario = ScenarioConfig::example_base();
        let anchors = CaseAnchors {
            ltm_total_revenue: 4_000_000.0,
            contract_client_count: 8,
            top2_contract_share: 0.45,
            contract_term_months: 12,
        };
        let settings = SimulationSettings::new(5_000, 42);
        let block = assumptions_block(
            "base",
            &scenario,
            &anchors,
            &settings,
            &[1_000_000.0, 800_000.0],
        );

        assert!(block.starts_with(&"=".repeat(72)));
        assert!(block.contains("Contract Churn Monte Carlo | Scenario: base"));
        assert!(block.contains(
            "- LTM total revenue: $4,000,000 | contract revenue: $3,200,000 | LTM EBITDA: $1,000,000"
        ));
        assert!(block.contains("- Contract clients: ~8 | top-2 share: 45.0% | terms: 12 months"));
        assert!(block.contains("- Runs: 5,000 | Seed: 42 | Thresholds: $1,000,000, $800,000"));
        assert!(block.contains("- Renewal means (top2/rest): 0.70 / 0.80"));
        assert!(block.contains("- Downsell factor triangular(low/mode/high): 0.85 / 1.00 / 1.05"));
        assert!(block.contains("- Backfill: 25% | Contract GM: 25% | Drop-through: 70%"));
        // Deterministic base scenario prints no stochastic lines.
        assert!(!block.contains("Beta"));
    }

    #[test]
    fn test_assumptions_block_mentions_stochastic_draws_when_enabled() {
        let mut scenario = ScenarioConfig::example_base();
        scenario.stochastic_renewal = true;
        let anchors = CaseAnchors {
            ltm_total_revenue: 4_000_000.0,
            contract_client_count: 8,
            top2_contract_share: 0.45,
            contract_term_months: 12,
        };
        let block = assumptions_block(
            "base",
            &scenario,
            &anchors,
            &SimulationSettings::new(100, 1),
            &[1_000_000.0],
        );
        assert!(block.contains("- Renewal draws: Beta, concentration 50"));
    }

    #[test]
    fn test_sensitivity_block_shape() {
        let scenario = ScenarioConfig::example_base();
        let mut rng = SimRng::from_seed(42);
        let cohort =
            CustomerCohort::build(&churn_core::prelude::AllocationConfig::default(), &mut rng)
                .unwrap();
        let dims = SweepDims {
            gm_contract: vec![0.25],
            drop_through: vec![0.70],
            top2_renewal_mean: vec![0.70],
            backfill_fraction: vec![0.25],
        };
        let grid =
            run_sensitivity(&scenario, &cohort, &dims, &SimulationSettings::new(50, 42)).unwrap();

        let block = sensitivity_block(&grid);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "Sensitivity table: P10 EBITDA across assumption grid");
        assert_eq!(
            lines[1],
            "| gm_contract | drop_through | top2_renewal_mean | backfill | P10 EBITDA |"
        );
        assert_eq!(lines[2], "|---:|---:|---:|---:|---:|");
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("| 0.25 | 0.70 | 0.70 | 0.25 | $"));
    }

    #[test]
    fn test_vp_block_wording() {
        let block = vp_block("base", &sample_metrics(), 3_200_000.0, 24_000.0, 31_000.0);
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "VP-ready implications:");
        assert!(lines[1].starts_with("- In base, there is a 82.0% probability EBITDA falls below $1,000,000"));
        assert_eq!(
            lines[2],
            "- Tail downside remains material: P10 EBITDA is $780,123 and P5 is $730,000."
        );
        assert_eq!(
            lines[3],
            "- Increasing top-2 renewal mean by +10 pts lifts P10 EBITDA by ~$24,000."
        );
        assert_eq!(
            lines[4],
            "- Adding +25 pts backfill (capped at 50%) improves P10 EBITDA by ~$31,000."
        );
        assert_eq!(
            lines[5],
            "- Expected contract revenue retained is 90.6% of the $3,200,000 contract base."
        );
    }
}
