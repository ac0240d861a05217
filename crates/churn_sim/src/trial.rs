//! Single-trial churn engine.
//!
//! One trial walks the cohort customer by customer: draw the renewal
//! outcome, apply a downsell factor on renewal or a backfill recovery on
//! churn, then push the aggregate revenue delta through the margin chain to
//! EBITDA. The trial is the only place the churn economics live; the driver
//! and the sensitivity sweep just repeat it under different seeds and
//! parameters.

use churn_core::cohort::CustomerCohort;
use churn_core::rng::SimRng;
use churn_core::sampling::{sample_bernoulli, sample_beta, sample_triangular};
use churn_core::scenario::ScenarioConfig;
use churn_core::Result;

/// Outcome of a single simulated contract year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialResult {
    /// Simulated contract revenue after churn, downsell, and backfill.
    pub contract_revenue: f64,
    /// Simulated EBITDA: baseline plus the margin-adjusted revenue delta.
    pub ebitda: f64,
    /// Simulated contract revenue as a fraction of the base.
    pub retained_fraction: f64,
    /// Number of top-segment customers that churned this trial (0 to 2).
    pub top2_churned: u8,
    /// Number of rest-segment customers that churned this trial (0 to 6).
    pub rest_churned: u8,
}

/// Runs one trial over the cohort.
///
/// Per customer: a Bernoulli renewal draw against the segment mean (or a
/// per-customer Beta-drawn probability when `stochastic_renewal` is set). A
/// renewing customer contributes `allocation * downsell_factor` with the
/// factor drawn from the scenario's Triangular. A churned customer
/// contributes `allocation * backfill_fraction` (or a Beta-drawn fraction),
/// never more than the original allocation.
///
/// The revenue delta then flows `delta_rev -> delta_gp (gm_contract) ->
/// delta_ebitda (drop_through) -> base_ebitda + delta_ebitda`.
///
/// Callers normally reach this through
/// [`run_simulation`](crate::driver::run_simulation), which validates the
/// scenario once up front; the samplers still re-check their own arguments
/// on every draw.
///
/// # Arguments
///
/// * `config` - Scenario parameters
/// * `cohort` - Customer revenue shares
/// * `rng` - Seeded random source, advanced by every draw
///
/// # Errors
///
/// Returns [`churn_core::ModelError::InvalidConfig`] if the scenario's
/// revenue base or distribution parameters are out of range.
pub fn run_trial(
    config: &ScenarioConfig,
    cohort: &CustomerCohort,
    rng: &mut SimRng,
) -> Result<TrialResult> {
    let allocations = cohort.allocate(config.base_contract_revenue)?;

    let mut revenue = 0.0;
    let mut top2_churned = 0u8;
    let mut rest_churned = 0u8;

    for (idx, &allocated) in allocations.iter().enumerate() {
        let renewal_mean = if CustomerCohort::is_top(idx) {
            config.top2_renewal_mean
        } else {
            config.rest_renewal_mean
        };
        let renew_prob = if config.stochastic_renewal {
            sample_beta(renewal_mean, config.renewal_concentration, rng)?
        } else {
            renewal_mean
        };

        if sample_bernoulli(renew_prob, rng)? {
            let factor = sample_triangular(
                config.downsell_low,
                config.downsell_mode,
                config.downsell_high,
                rng,
            )?;
            revenue += allocated * factor;
        } else {
            if CustomerCohort::is_top(idx) {
                top2_churned += 1;
            } else {
                rest_churned += 1;
            }
            let backfill = if config.stochastic_backfill {
                sample_beta(config.backfill_fraction, config.backfill_concentration, rng)?
            } else {
                config.backfill_fraction
            };
            // Backfill replaces lost business; it never exceeds the
            // account's original allocation.
            revenue += (allocated * backfill).min(allocated);
        }
    }

    let delta_revenue = revenue - config.base_contract_revenue;
    let delta_gross_profit = delta_revenue * config.gm_contract;
    let delta_ebitda = delta_gross_profit * config.drop_through;

    Ok(TrialResult {
        contract_revenue: revenue,
        ebitda: config.base_ebitda + delta_ebitda,
        retained_fraction: revenue / config.base_contract_revenue,
        top2_churned,
        rest_churned,
    })
}
