//! Grid-search optimisation of the branded/contract volume split.
//!
//! The search enumerates every feasible mix on a fixed barrel grid and keeps
//! the one with the highest gross profit. With a 100 bbl step and demand caps
//! in the tens of thousands the grid is around 10^5 cells, so exhaustive
//! enumeration is cheap and immune to the non-smooth changeover term.

use serde::Serialize;

use crate::config::{CanningAssumptions, ResolvedScenario, StreamPair};
use crate::error::{OptimiserError, Result};

/// Slack below which the canning constraint counts as satisfied. Absorbs
/// accumulated rounding in the hours sum.
const CANNING_TOLERANCE_HOURS: f64 = 1e-9;

/// Gross-profit differences at or below this are treated as ties.
const GP_TIE_EPSILON: f64 = 1e-9;

/// Canning hours consumed by a given mix.
///
/// Branded volume pays per-barrel hours plus a changeover toll of
/// `changeover_hours_per_run` for every `avg_run_size_bbl` produced; contract
/// volume pays per-barrel hours only.
///
/// # Examples
///
/// ```
/// use mix_optimiser::{canning_hours, CanningAssumptions, StreamPair};
///
/// let canning = CanningAssumptions {
///     canning_hours_per_bbl: StreamPair { branded: 0.08, contract: 0.04 },
///     changeover_hours_per_run: 2.0,
///     avg_run_size_bbl: 250.0,
///     canning_hours_capacity: 4_000.0,
/// };
/// let hours = canning_hours(1_000, 1_000, &canning);
/// assert!((hours - 128.0).abs() < 1e-9);
/// ```
pub fn canning_hours(branded_bbl: u32, contract_bbl: u32, canning: &CanningAssumptions) -> f64 {
    let branded = f64::from(branded_bbl);
    let contract = f64::from(contract_bbl);
    let runs = branded / canning.avg_run_size_bbl;
    branded * canning.canning_hours_per_bbl.branded
        + contract * canning.canning_hours_per_bbl.contract
        + runs * canning.changeover_hours_per_run
}

/// The optimal mix for one scenario, with the figures the report prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixOutcome {
    /// Scenario this outcome belongs to.
    pub scenario: String,
    /// Optimal branded volume, barrels.
    pub branded_bbl: u32,
    /// Optimal contract volume, barrels.
    pub contract_bbl: u32,
    /// Total volume at the optimum, barrels.
    pub total_bbl: u32,
    /// Branded share of total volume, percent.
    pub branded_share_pct: f64,
    /// Contract share of total volume, percent.
    pub contract_share_pct: f64,
    /// Facility volume capacity, barrels.
    pub capacity_bbl: u32,
    /// Canning hours consumed at the optimum.
    pub canning_hours_used: f64,
    /// Canning hours available.
    pub canning_hours_capacity: f64,
    /// Canning utilisation, percent of capacity.
    pub canning_util_pct: f64,
    /// Unused canning hours at the optimum.
    pub canning_slack_hours: f64,
    /// Whether the canning constraint is binding at the optimum, judged at
    /// grid resolution: true when the slack could not absorb one more grid
    /// step of either stream.
    pub canning_binds: bool,
    /// Gross profit at the optimum.
    pub gross_profit: f64,
    /// Gross profit scaled by the drop-through fraction.
    pub ebitda_proxy: f64,
    /// Gross profit as a percentage of revenue at the optimum.
    pub blended_margin_pct: f64,
    /// Revenue per barrel used, per stream.
    pub revenue_per_bbl: StreamPair,
    /// Gross margins used, per stream.
    pub gross_margin: StreamPair,
    /// Baseline total volume, barrels.
    pub baseline_total_bbl: u32,
    /// Baseline branded volume, barrels, rounded to the grid.
    pub baseline_branded_bbl: u32,
    /// Baseline contract volume, barrels.
    pub baseline_contract_bbl: u32,
    /// Optimal total minus baseline total, barrels.
    pub delta_total_bbl_vs_baseline: i64,
    /// Gross profit at the optimum minus gross profit of the baseline mix
    /// under this scenario's economics.
    pub delta_gp_vs_baseline: f64,
}

fn gross_profit(branded_bbl: u32, contract_bbl: u32, revenue: &StreamPair, margin: &StreamPair) -> f64 {
    f64::from(branded_bbl) * revenue.branded * margin.branded
        + f64::from(contract_bbl) * revenue.contract * margin.contract
}

/// Finds the gross-profit-maximising mix for a resolved scenario.
///
/// Feasibility requires total volume within facility capacity, both streams
/// within their demand bounds, and canning hours within capacity. Ties on
/// gross profit are broken towards the mix with more branded volume.
///
/// # Errors
///
/// Returns [`OptimiserError::Infeasible`] when no grid point satisfies the
/// constraints, for instance when committed minimum volumes exceed what the
/// canning line can process.
pub fn optimise(scenario: &ResolvedScenario) -> Result<MixOutcome> {
    let assumptions = &scenario.assumptions;
    let capacity = scenario.anchors.facility_capacity_bbl;
    let step = scenario.bbl_step;

    let demand = &assumptions.demand_limits_bbl;
    let max_branded = demand.max_branded_bbl.unwrap_or(capacity).min(capacity);
    let max_contract = demand.max_contract_bbl.unwrap_or(capacity).min(capacity);

    let canning = &assumptions.canning;
    let revenue = &assumptions.revenue_per_bbl;
    let margin = &assumptions.gross_margin;

    let mut best: Option<(u32, u32, f64)> = None;
    for branded in (demand.min_branded_bbl..=max_branded).step_by(step as usize) {
        for contract in (demand.min_contract_bbl..=max_contract).step_by(step as usize) {
            if branded + contract > capacity {
                // Contract ascends, so every later cell in this row busts too.
                break;
            }
            let hours = canning_hours(branded, contract, canning);
            if hours > canning.canning_hours_capacity + CANNING_TOLERANCE_HOURS {
                continue;
            }
            let gp = gross_profit(branded, contract, revenue, margin);
            let better = match best {
                None => true,
                Some((best_branded, _, best_gp)) => {
                    gp > best_gp + GP_TIE_EPSILON
                        || ((gp - best_gp).abs() <= GP_TIE_EPSILON && branded > best_branded)
                }
            };
            if better {
                best = Some((branded, contract, gp));
            }
        }
    }

    let Some((branded_bbl, contract_bbl, gp)) = best else {
        return Err(OptimiserError::Infeasible(scenario.name.clone()));
    };

    let total_bbl = branded_bbl + contract_bbl;
    let (branded_share_pct, contract_share_pct) = if total_bbl > 0 {
        let total = f64::from(total_bbl);
        (
            100.0 * f64::from(branded_bbl) / total,
            100.0 * f64::from(contract_bbl) / total,
        )
    } else {
        (0.0, 0.0)
    };

    let hours_used = canning_hours(branded_bbl, contract_bbl, canning);
    let slack = canning.canning_hours_capacity - hours_used;
    // One more grid step of the hungrier stream must not fit for the
    // constraint to count as binding.
    let effective_branded_hour = canning.canning_hours_per_bbl.branded
        + canning.changeover_hours_per_run / canning.avg_run_size_bbl;
    let step_hours =
        f64::from(step) * effective_branded_hour.max(canning.canning_hours_per_bbl.contract);
    let canning_binds = slack <= step_hours + CANNING_TOLERANCE_HOURS;

    let revenue_at_optimum =
        f64::from(branded_bbl) * revenue.branded + f64::from(contract_bbl) * revenue.contract;
    let blended_margin_pct = if revenue_at_optimum > 0.0 {
        100.0 * gp / revenue_at_optimum
    } else {
        0.0
    };

    let baseline = &assumptions.baseline_mix;
    let baseline_total_bbl = baseline
        .total_bbl
        .unwrap_or(scenario.anchors.current_production_bbl);
    let step_f = f64::from(step);
    let rounded =
        (f64::from(baseline_total_bbl) * baseline.branded_share / step_f).round() * step_f;
    let baseline_branded_bbl = (rounded as u32).min(baseline_total_bbl);
    let baseline_contract_bbl = baseline_total_bbl - baseline_branded_bbl;
    let baseline_gp = gross_profit(baseline_branded_bbl, baseline_contract_bbl, revenue, margin);

    Ok(MixOutcome {
        scenario: scenario.name.clone(),
        branded_bbl,
        contract_bbl,
        total_bbl,
        branded_share_pct,
        contract_share_pct,
        capacity_bbl: capacity,
        canning_hours_used: hours_used,
        canning_hours_capacity: canning.canning_hours_capacity,
        canning_util_pct: 100.0 * hours_used / canning.canning_hours_capacity,
        canning_slack_hours: slack,
        canning_binds,
        gross_profit: gp,
        ebitda_proxy: gp * assumptions.drop_through_to_ebitda,
        blended_margin_pct,
        revenue_per_bbl: *revenue,
        gross_margin: *margin,
        baseline_total_bbl,
        baseline_branded_bbl,
        baseline_contract_bbl,
        delta_total_bbl_vs_baseline: i64::from(total_bbl) - i64::from(baseline_total_bbl),
        delta_gp_vs_baseline: gp - baseline_gp,
    })
}
