//! Typed optimiser configuration.
//!
//! Scenario variants are expressed as typed partial overrides rather than
//! free-form key merges: every overridable field is an `Option` on
//! [`ScenarioOverride`], applied field by field onto a copy of the base
//! assumptions and re-validated before any optimisation runs. A typo in a
//! scenario block is therefore a deserialisation or validation error, not a
//! silently ignored key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{OptimiserError, Result};

/// A value held per product stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamPair {
    /// Branded (own-label) stream value.
    pub branded: f64,
    /// Contract (co-pack) stream value.
    pub contract: f64,
}

/// Fixed facts about the case being modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAnchors {
    /// Annual facility volume capacity, barrels.
    pub facility_capacity_bbl: u32,
    /// Current annual production, barrels. Also the default baseline total.
    pub current_production_bbl: u32,
}

/// Demand bounds per stream, barrels. Missing maxima default to facility
/// capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DemandLimits {
    /// Committed minimum branded volume.
    #[serde(default)]
    pub min_branded_bbl: u32,
    /// Committed minimum contract volume.
    #[serde(default)]
    pub min_contract_bbl: u32,
    /// Branded demand ceiling, if any.
    #[serde(default)]
    pub max_branded_bbl: Option<u32>,
    /// Contract demand ceiling, if any.
    #[serde(default)]
    pub max_contract_bbl: Option<u32>,
}

/// Canning-line model inputs.
///
/// Branded volume pays a changeover toll on top of its per-barrel hours:
/// each `avg_run_size_bbl` of branded production counts as one run costing
/// `changeover_hours_per_run` extra hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanningAssumptions {
    /// Canning hours consumed per barrel, per stream.
    pub canning_hours_per_bbl: StreamPair,
    /// Changeover hours charged per branded run.
    pub changeover_hours_per_run: f64,
    /// Average branded run size, barrels.
    pub avg_run_size_bbl: f64,
    /// Annual canning hours available.
    pub canning_hours_capacity: f64,
}

/// Reference mix the optimum is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineMix {
    /// Baseline total volume, barrels. Defaults to current production.
    #[serde(default)]
    pub total_bbl: Option<u32>,
    /// Baseline branded share of total volume.
    #[serde(default = "default_branded_share")]
    pub branded_share: f64,
}

impl Default for BaselineMix {
    fn default() -> Self {
        Self {
            total_bbl: None,
            branded_share: default_branded_share(),
        }
    }
}

fn default_branded_share() -> f64 {
    0.7
}

/// Economic and operational assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Revenue per barrel, per stream.
    pub revenue_per_bbl: StreamPair,
    /// Gross margin, per stream, in [0, 1].
    pub gross_margin: StreamPair,
    /// Fraction of gross profit treated as EBITDA in the proxy figure.
    #[serde(default = "default_drop_through")]
    pub drop_through_to_ebitda: f64,
    /// Demand bounds per stream.
    #[serde(default)]
    pub demand_limits_bbl: DemandLimits,
    /// Canning-line model inputs.
    pub canning: CanningAssumptions,
    /// Reference mix for delta reporting.
    #[serde(default)]
    pub baseline_mix: BaselineMix,
}

fn default_drop_through() -> f64 {
    1.0
}

/// Grid-search resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimisationSettings {
    /// Volume increment of the search grid, barrels.
    #[serde(default = "default_bbl_step")]
    pub bbl_step: u32,
}

impl Default for OptimisationSettings {
    fn default() -> Self {
        Self {
            bbl_step: default_bbl_step(),
        }
    }
}

fn default_bbl_step() -> u32 {
    100
}

/// Typed partial override for one scenario.
///
/// Every field is optional; unset fields keep the base assumption. The base
/// scenario is an empty override.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioOverride {
    /// Branded revenue per barrel.
    pub branded_revenue_per_bbl: Option<f64>,
    /// Contract revenue per barrel.
    pub contract_revenue_per_bbl: Option<f64>,
    /// Branded gross margin.
    pub branded_gm: Option<f64>,
    /// Contract gross margin.
    pub contract_gm: Option<f64>,
    /// Drop-through to the EBITDA proxy.
    pub drop_through_to_ebitda: Option<f64>,
    /// Minimum branded volume.
    pub min_branded_bbl: Option<u32>,
    /// Maximum branded volume.
    pub max_branded_bbl: Option<u32>,
    /// Minimum contract volume.
    pub min_contract_bbl: Option<u32>,
    /// Maximum contract volume.
    pub max_contract_bbl: Option<u32>,
    /// Changeover hours per branded run.
    pub changeover_hours_per_run: Option<f64>,
    /// Average branded run size.
    pub avg_run_size_bbl: Option<f64>,
    /// Canning hours available.
    pub canning_hours_capacity: Option<f64>,
}

impl ScenarioOverride {
    fn apply(&self, assumptions: &mut Assumptions) {
        if let Some(v) = self.branded_revenue_per_bbl {
            assumptions.revenue_per_bbl.branded = v;
        }
        if let Some(v) = self.contract_revenue_per_bbl {
            assumptions.revenue_per_bbl.contract = v;
        }
        if let Some(v) = self.branded_gm {
            assumptions.gross_margin.branded = v;
        }
        if let Some(v) = self.contract_gm {
            assumptions.gross_margin.contract = v;
        }
        if let Some(v) = self.drop_through_to_ebitda {
            assumptions.drop_through_to_ebitda = v;
        }
        if let Some(v) = self.min_branded_bbl {
            assumptions.demand_limits_bbl.min_branded_bbl = v;
        }
        if let Some(v) = self.max_branded_bbl {
            assumptions.demand_limits_bbl.max_branded_bbl = Some(v);
        }
        if let Some(v) = self.min_contract_bbl {
            assumptions.demand_limits_bbl.min_contract_bbl = v;
        }
        if let Some(v) = self.max_contract_bbl {
            assumptions.demand_limits_bbl.max_contract_bbl = Some(v);
        }
        if let Some(v) = self.changeover_hours_per_run {
            assumptions.canning.changeover_hours_per_run = v;
        }
        if let Some(v) = self.avg_run_size_bbl {
            assumptions.canning.avg_run_size_bbl = v;
        }
        if let Some(v) = self.canning_hours_capacity {
            assumptions.canning.canning_hours_capacity = v;
        }
    }
}

/// Candidate value lists for the one-way sensitivity pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityLists {
    /// Changeover hours per run candidates.
    pub changeover_hours_per_run: Vec<f64>,
    /// Canning capacity candidates.
    pub canning_hours_capacity: Vec<f64>,
    /// Contract gross margin candidates.
    pub contract_gm: Vec<f64>,
    /// Branded gross margin candidates.
    pub branded_gm: Vec<f64>,
}

/// Full optimiser configuration: anchors, base assumptions, scenario
/// overrides, grid settings, and sensitivity candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixConfig {
    /// Fixed facts about the case.
    pub case_anchors: CaseAnchors,
    /// Base economic and operational assumptions.
    pub assumptions: Assumptions,
    /// Grid-search settings.
    #[serde(default)]
    pub optimisation: OptimisationSettings,
    /// Named scenario overrides. Sorted by name for stable listings.
    #[serde(default)]
    pub scenarios: BTreeMap<String, ScenarioOverride>,
    /// One-way sensitivity candidates.
    #[serde(default)]
    pub sensitivity: SensitivityLists,
}

/// One scenario's fully-resolved inputs, ready to optimise.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScenario {
    /// Scenario name, carried through to outcomes and error messages.
    pub name: String,
    /// Case anchors.
    pub anchors: CaseAnchors,
    /// Assumptions with the scenario's overrides applied.
    pub assumptions: Assumptions,
    /// Grid step, barrels.
    pub bbl_step: u32,
}

impl MixConfig {
    /// A worked example configuration: a 60k bbl facility where branded
    /// carries the higher margin but is canning-intensive, with the four
    /// standard scenarios and one-way sensitivity candidates.
    pub fn example() -> Self {
        let mut scenarios = BTreeMap::new();
        scenarios.insert("base".to_string(), ScenarioOverride::default());
        scenarios.insert(
            "sku_bloat".to_string(),
            ScenarioOverride {
                avg_run_size_bbl: Some(150.0),
                changeover_hours_per_run: Some(3.0),
                ..ScenarioOverride::default()
            },
        );
        scenarios.insert(
            "contract_push".to_string(),
            ScenarioOverride {
                max_contract_bbl: Some(30_000),
                ..ScenarioOverride::default()
            },
        );
        scenarios.insert(
            "de_sku".to_string(),
            ScenarioOverride {
                avg_run_size_bbl: Some(400.0),
                changeover_hours_per_run: Some(1.5),
                ..ScenarioOverride::default()
            },
        );

        Self {
            case_anchors: CaseAnchors {
                facility_capacity_bbl: 60_000,
                current_production_bbl: 45_000,
            },
            assumptions: Assumptions {
                revenue_per_bbl: StreamPair {
                    branded: 450.0,
                    contract: 350.0,
                },
                gross_margin: StreamPair {
                    branded: 0.45,
                    contract: 0.30,
                },
                drop_through_to_ebitda: 0.85,
                demand_limits_bbl: DemandLimits {
                    min_branded_bbl: 0,
                    min_contract_bbl: 0,
                    max_branded_bbl: Some(40_000),
                    max_contract_bbl: Some(25_000),
                },
                canning: CanningAssumptions {
                    canning_hours_per_bbl: StreamPair {
                        branded: 0.08,
                        contract: 0.04,
                    },
                    changeover_hours_per_run: 2.0,
                    avg_run_size_bbl: 250.0,
                    canning_hours_capacity: 4_000.0,
                },
                baseline_mix: BaselineMix {
                    total_bbl: None,
                    branded_share: 0.7,
                },
            },
            optimisation: OptimisationSettings::default(),
            scenarios,
            sensitivity: SensitivityLists {
                changeover_hours_per_run: vec![1.0, 2.0, 3.0],
                canning_hours_capacity: vec![3_500.0, 4_000.0, 4_500.0],
                contract_gm: vec![0.25, 0.30, 0.35],
                branded_gm: vec![0.40, 0.45, 0.50],
            },
        }
    }

    /// Validates the base configuration, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns [`OptimiserError::InvalidConfig`] listing each failed check.
    pub fn validate(&self) -> Result<()> {
        validate_parts(
            &self.case_anchors,
            &self.assumptions,
            self.optimisation.bbl_step,
        )
    }

    /// Resolves one scenario: applies its override onto a copy of the base
    /// assumptions and re-validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`OptimiserError::UnknownScenario`] if `name` is not
    /// configured, or [`OptimiserError::InvalidConfig`] if the overridden
    /// assumptions fail validation.
    pub fn resolve(&self, name: &str) -> Result<ResolvedScenario> {
        let Some(override_) = self.scenarios.get(name) else {
            return Err(OptimiserError::UnknownScenario {
                name: name.to_string(),
                available: self.scenario_names().join(", "),
            });
        };

        let mut assumptions = self.assumptions;
        override_.apply(&mut assumptions);

        let bbl_step = self.optimisation.bbl_step;
        validate_parts(&self.case_anchors, &assumptions, bbl_step)?;

        Ok(ResolvedScenario {
            name: name.to_string(),
            anchors: self.case_anchors,
            assumptions,
            bbl_step,
        })
    }

    /// Configured scenario names, sorted.
    pub fn scenario_names(&self) -> Vec<String> {
        self.scenarios.keys().cloned().collect()
    }
}

impl ResolvedScenario {
    /// Applies a further override on top of this scenario's assumptions and
    /// re-validates the result. Used by the one-way sensitivity pass to vary
    /// a single parameter at a time.
    ///
    /// # Errors
    ///
    /// Returns [`OptimiserError::InvalidConfig`] if the overridden
    /// assumptions fail validation.
    pub fn with_override(&self, override_: &ScenarioOverride) -> Result<Self> {
        let mut assumptions = self.assumptions;
        override_.apply(&mut assumptions);
        validate_parts(&self.anchors, &assumptions, self.bbl_step)?;
        Ok(Self {
            name: self.name.clone(),
            anchors: self.anchors,
            assumptions,
            bbl_step: self.bbl_step,
        })
    }
}

fn check_margin(violations: &mut Vec<String>, name: &str, value: f64) {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        violations.push(format!("{name} must be in [0, 1], got {value}"));
    }
}

fn validate_parts(anchors: &CaseAnchors, assumptions: &Assumptions, bbl_step: u32) -> Result<()> {
    let mut violations = Vec::new();

    if anchors.facility_capacity_bbl == 0 {
        violations.push("facility_capacity_bbl must be > 0".to_string());
    }
    if anchors.current_production_bbl == 0 {
        violations.push("current_production_bbl must be > 0".to_string());
    }
    if bbl_step == 0 {
        violations.push("bbl_step must be > 0".to_string());
    }

    let revenue = &assumptions.revenue_per_bbl;
    if !revenue.branded.is_finite() || revenue.branded <= 0.0 {
        violations.push(format!(
            "revenue_per_bbl.branded must be > 0, got {}",
            revenue.branded
        ));
    }
    if !revenue.contract.is_finite() || revenue.contract <= 0.0 {
        violations.push(format!(
            "revenue_per_bbl.contract must be > 0, got {}",
            revenue.contract
        ));
    }

    check_margin(
        &mut violations,
        "gross_margin.branded",
        assumptions.gross_margin.branded,
    );
    check_margin(
        &mut violations,
        "gross_margin.contract",
        assumptions.gross_margin.contract,
    );
    check_margin(
        &mut violations,
        "drop_through_to_ebitda",
        assumptions.drop_through_to_ebitda,
    );
    check_margin(
        &mut violations,
        "baseline_mix.branded_share",
        assumptions.baseline_mix.branded_share,
    );

    let canning = &assumptions.canning;
    if !canning.canning_hours_per_bbl.branded.is_finite()
        || canning.canning_hours_per_bbl.branded < 0.0
        || !canning.canning_hours_per_bbl.contract.is_finite()
        || canning.canning_hours_per_bbl.contract < 0.0
    {
        violations.push("canning_hours_per_bbl must be >= 0 for both streams".to_string());
    }
    if !canning.changeover_hours_per_run.is_finite() || canning.changeover_hours_per_run < 0.0 {
        violations.push(format!(
            "changeover_hours_per_run must be >= 0, got {}",
            canning.changeover_hours_per_run
        ));
    }
    if !canning.avg_run_size_bbl.is_finite() || canning.avg_run_size_bbl <= 0.0 {
        violations.push(format!(
            "avg_run_size_bbl must be > 0, got {}",
            canning.avg_run_size_bbl
        ));
    }
    if !canning.canning_hours_capacity.is_finite() || canning.canning_hours_capacity <= 0.0 {
        violations.push(format!(
            "canning_hours_capacity must be > 0, got {}",
            canning.canning_hours_capacity
        ));
    }

    let demand = &assumptions.demand_limits_bbl;
    if let Some(max) = demand.max_branded_bbl {
        if demand.min_branded_bbl > max {
            violations.push(format!(
                "demand_limits_bbl: min_branded_bbl {} exceeds max_branded_bbl {max}",
                demand.min_branded_bbl
            ));
        }
    }
    if let Some(max) = demand.max_contract_bbl {
        if demand.min_contract_bbl > max {
            violations.push(format!(
                "demand_limits_bbl: min_contract_bbl {} exceeds max_contract_bbl {max}",
                demand.min_contract_bbl
            ));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(OptimiserError::InvalidConfig(violations.join("; ")))
    }
}
