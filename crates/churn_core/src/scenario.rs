//! Scenario parameter records for the churn simulation.
//!
//! A [`ScenarioConfig`] is an immutable, fully-resolved parameter set: the
//! revenue base being defended, segment renewal probabilities, the downsell
//! triangle applied to renewing customers, the backfill assumption for lost
//! accounts, and the margin chain that converts revenue deltas into EBITDA.
//! Validation is eager and collects every violation before failing, so a
//! config file with three bad fields reports all three at once.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Fully-resolved parameters for one simulated scenario.
///
/// Renewal and backfill inputs are means: in the default deterministic mode
/// they are used as-is for every customer, while the stochastic flags switch
/// to per-customer Beta draws centred on the same means, adding parameter
/// uncertainty on top of outcome uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Annual contract revenue at risk, in currency units. Must be > 0.
    pub base_contract_revenue: f64,
    /// Baseline EBITDA the deltas apply to, in currency units.
    pub base_ebitda: f64,
    /// Mean renewal probability for the two top accounts, in [0, 1].
    pub top2_renewal_mean: f64,
    /// Mean renewal probability for the six rest accounts, in [0, 1].
    pub rest_renewal_mean: f64,
    /// Lower bound of the downsell factor applied on renewal. Must be > 0.
    pub downsell_low: f64,
    /// Most likely downsell factor. Must satisfy `low <= mode <= high`.
    pub downsell_mode: f64,
    /// Upper bound of the downsell factor (values above 1 model upsell).
    pub downsell_high: f64,
    /// Mean fraction of a churned account's revenue replaced by new
    /// business, in [0, 1].
    pub backfill_fraction: f64,
    /// Gross margin on contract revenue, in [0, 1].
    pub gm_contract: f64,
    /// Fraction of gross-profit change that reaches EBITDA, in [0, 1].
    pub drop_through: f64,
    /// Draw per-customer renewal probabilities from a Beta centred on the
    /// segment mean instead of using the mean directly.
    #[serde(default)]
    pub stochastic_renewal: bool,
    /// Beta concentration for stochastic renewal draws. Must be > 0.
    #[serde(default = "default_concentration")]
    pub renewal_concentration: f64,
    /// Draw per-customer backfill fractions from a Beta centred on
    /// `backfill_fraction` instead of using it directly.
    #[serde(default)]
    pub stochastic_backfill: bool,
    /// Beta concentration for stochastic backfill draws. Must be > 0.
    #[serde(default = "default_concentration")]
    pub backfill_concentration: f64,
}

fn default_concentration() -> f64 {
    50.0
}

fn check_unit_interval(violations: &mut Vec<String>, name: &str, value: f64) {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        violations.push(format!("{name} must be in [0, 1], got {value}"));
    }
}

impl ScenarioConfig {
    /// A representative base-case parameter set, used in documentation
    /// examples and tests.
    pub fn example_base() -> Self {
        Self {
            base_contract_revenue: 3_200_000.0,
            base_ebitda: 1_000_000.0,
            top2_renewal_mean: 0.70,
            rest_renewal_mean: 0.80,
            downsell_low: 0.85,
            downsell_mode: 1.00,
            downsell_high: 1.05,
            backfill_fraction: 0.25,
            gm_contract: 0.25,
            drop_through: 0.70,
            stochastic_renewal: false,
            renewal_concentration: default_concentration(),
            stochastic_backfill: false,
            backfill_concentration: default_concentration(),
        }
    }

    /// Validates every field, collecting all violations before failing.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] whose message lists each failed
    /// check, separated by `"; "`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use churn_core::scenario::ScenarioConfig;
    ///
    /// let mut scenario = ScenarioConfig::example_base();
    /// scenario.validate().unwrap();
    ///
    /// scenario.top2_renewal_mean = -0.1;
    /// scenario.gm_contract = 1.5;
    /// let err = scenario.validate().unwrap_err().to_string();
    /// assert!(err.contains("top2_renewal_mean"));
    /// assert!(err.contains("gm_contract"));
    /// ```
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();

        if !self.base_contract_revenue.is_finite() || self.base_contract_revenue <= 0.0 {
            violations.push(format!(
                "base_contract_revenue must be > 0, got {}",
                self.base_contract_revenue
            ));
        }
        if !self.base_ebitda.is_finite() {
            violations.push(format!("base_ebitda must be finite, got {}", self.base_ebitda));
        }

        check_unit_interval(&mut violations, "top2_renewal_mean", self.top2_renewal_mean);
        check_unit_interval(&mut violations, "rest_renewal_mean", self.rest_renewal_mean);
        check_unit_interval(&mut violations, "backfill_fraction", self.backfill_fraction);
        check_unit_interval(&mut violations, "gm_contract", self.gm_contract);
        check_unit_interval(&mut violations, "drop_through", self.drop_through);

        let downsell_finite = self.downsell_low.is_finite()
            && self.downsell_mode.is_finite()
            && self.downsell_high.is_finite();
        if !downsell_finite {
            violations.push(format!(
                "downsell bounds must be finite, got low={}, mode={}, high={}",
                self.downsell_low, self.downsell_mode, self.downsell_high
            ));
        } else {
            if self.downsell_low <= 0.0 {
                violations.push(format!(
                    "downsell_low must be > 0, got {}",
                    self.downsell_low
                ));
            }
            if !(self.downsell_low <= self.downsell_mode
                && self.downsell_mode <= self.downsell_high)
            {
                violations.push(format!(
                    "downsell bounds must satisfy low <= mode <= high, got low={}, mode={}, high={}",
                    self.downsell_low, self.downsell_mode, self.downsell_high
                ));
            }
        }

        if !self.renewal_concentration.is_finite() || self.renewal_concentration <= 0.0 {
            violations.push(format!(
                "renewal_concentration must be > 0, got {}",
                self.renewal_concentration
            ));
        }
        if !self.backfill_concentration.is_finite() || self.backfill_concentration <= 0.0 {
            violations.push(format!(
                "backfill_concentration must be > 0, got {}",
                self.backfill_concentration
            ));
        }

        ModelError::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_example_base_is_valid() {
        assert!(ScenarioConfig::example_base().validate().is_ok());
    }

    #[test]
    fn test_validate_collects_multiple_violations() {
        let mut scenario = ScenarioConfig::example_base();
        scenario.base_contract_revenue = -100.0;
        scenario.rest_renewal_mean = 1.2;
        scenario.drop_through = -0.5;

        let message = scenario.validate().unwrap_err().to_string();
        assert!(message.contains("base_contract_revenue"));
        assert!(message.contains("rest_renewal_mean"));
        assert!(message.contains("drop_through"));
    }

    #[test]
    fn test_validate_rejects_unordered_downsell() {
        let mut scenario = ScenarioConfig::example_base();
        scenario.downsell_low = 1.10;
        let message = scenario.validate().unwrap_err().to_string();
        assert!(message.contains("low <= mode <= high"));
    }

    #[test]
    fn test_validate_rejects_non_positive_downsell_low() {
        let mut scenario = ScenarioConfig::example_base();
        scenario.downsell_low = 0.0;
        scenario.downsell_mode = 0.5;
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_renewal_mean() {
        let mut scenario = ScenarioConfig::example_base();
        scenario.top2_renewal_mean = -0.01;
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_concentration() {
        let mut scenario = ScenarioConfig::example_base();
        scenario.renewal_concentration = 0.0;
        assert!(scenario.validate().is_err());

        let mut scenario = ScenarioConfig::example_base();
        scenario.backfill_concentration = -3.0;
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_serde_uses_exact_field_names() {
        let json = serde_json::to_string(&ScenarioConfig::example_base()).unwrap();
        for field in [
            "base_contract_revenue",
            "base_ebitda",
            "top2_renewal_mean",
            "rest_renewal_mean",
            "downsell_low",
            "downsell_mode",
            "downsell_high",
            "backfill_fraction",
            "gm_contract",
            "drop_through",
        ] {
            assert!(json.contains(field), "missing field {field} in {json}");
        }
    }

    #[test]
    fn test_serde_defaults_for_stochastic_fields() {
        let json = r#"{
            "base_contract_revenue": 3200000.0,
            "base_ebitda": 1000000.0,
            "top2_renewal_mean": 0.70,
            "rest_renewal_mean": 0.80,
            "downsell_low": 0.85,
            "downsell_mode": 1.00,
            "downsell_high": 1.05,
            "backfill_fraction": 0.25,
            "gm_contract": 0.25,
            "drop_through": 0.70
        }"#;
        let scenario: ScenarioConfig = serde_json::from_str(json).unwrap();
        assert!(!scenario.stochastic_renewal);
        assert!(!scenario.stochastic_backfill);
        assert_eq!(scenario.renewal_concentration, 50.0);
        assert_eq!(scenario.backfill_concentration, 50.0);
        assert_eq!(scenario, ScenarioConfig::example_base());
    }

    proptest! {
        #[test]
        fn prop_in_range_parameters_validate(
            revenue in 1.0f64..1e9,
            ebitda in -1e8f64..1e9,
            top2 in 0.0f64..=1.0,
            rest in 0.0f64..=1.0,
            backfill in 0.0f64..=1.0,
            gm in 0.0f64..=1.0,
            drop_through in 0.0f64..=1.0,
            a in 0.5f64..1.5,
            b in 0.5f64..1.5,
            c in 0.5f64..1.5,
        ) {
            let mut downsell = [a, b, c];
            downsell.sort_by(|x, y| x.partial_cmp(y).unwrap());

            let scenario = ScenarioConfig {
                base_contract_revenue: revenue,
                base_ebitda: ebitda,
                top2_renewal_mean: top2,
                rest_renewal_mean: rest,
                downsell_low: downsell[0],
                downsell_mode: downsell[1],
                downsell_high: downsell[2],
                backfill_fraction: backfill,
                gm_contract: gm,
                drop_through,
                ..ScenarioConfig::example_base()
            };
            prop_assert!(scenario.validate().is_ok());
        }
    }
}
