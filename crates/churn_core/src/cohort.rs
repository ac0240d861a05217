//! Customer revenue allocation for the simulated cohort.
//!
//! The book of business is modelled as eight contract customers: two top
//! accounts holding a fixed combined share of revenue, and six smaller
//! accounts splitting the remainder. The rest-segment split is either exactly
//! even or drawn once per cohort from a symmetric Dirichlet, which lets a
//! scenario stress uneven account concentration without changing the trial
//! logic.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::rng::SimRng;
use crate::sampling::sample_dirichlet;

/// Number of top accounts with a fixed combined revenue share.
pub const TOP_COUNT: usize = 2;

/// Number of rest-segment accounts splitting the remaining revenue.
pub const REST_COUNT: usize = 6;

/// Total number of customers in the cohort.
pub const CUSTOMER_COUNT: usize = TOP_COUNT + REST_COUNT;

/// How the rest segment's revenue share is split across its accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Even split: each rest account holds an identical share.
    #[default]
    Equal,
    /// One symmetric Dirichlet draw per cohort; higher concentration gives a
    /// more even split.
    Dirichlet,
}

/// Parameters controlling cohort construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Combined revenue share of the two top accounts, in [0, 1].
    #[serde(default = "default_top2_share")]
    pub top2_share: f64,
    /// Rest-segment split mode.
    #[serde(default)]
    pub mode: AllocationMode,
    /// Dirichlet concentration, used only when `mode` is
    /// [`AllocationMode::Dirichlet`]. Must be > 0.
    #[serde(default = "default_concentration")]
    pub concentration: f64,
}

fn default_top2_share() -> f64 {
    0.45
}

fn default_concentration() -> f64 {
    50.0
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            top2_share: default_top2_share(),
            mode: AllocationMode::default(),
            concentration: default_concentration(),
        }
    }
}

impl AllocationConfig {
    /// Validates the allocation parameters, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] listing each failed check.
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();

        if !self.top2_share.is_finite() || !(0.0..=1.0).contains(&self.top2_share) {
            violations.push(format!(
                "top2_share must be in [0, 1], got {}",
                self.top2_share
            ));
        }
        if !self.concentration.is_finite() || self.concentration <= 0.0 {
            violations.push(format!(
                "concentration must be > 0, got {}",
                self.concentration
            ));
        }

        ModelError::from_violations(violations)
    }
}

/// Eight ordered revenue shares summing to 1.
///
/// Indices `0..TOP_COUNT` are the top accounts, `TOP_COUNT..` the rest
/// segment. Construction is the only randomised step; a built cohort is a
/// plain value that can be shared across trials and sweep cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerCohort {
    shares: Vec<f64>,
}

impl CustomerCohort {
    /// Builds a cohort from allocation parameters.
    ///
    /// The two top accounts each hold `top2_share / 2`. The six rest accounts
    /// split `1 - top2_share` evenly, or via one Dirichlet draw on `rng` in
    /// [`AllocationMode::Dirichlet`].
    ///
    /// # Arguments
    ///
    /// * `alloc` - Allocation parameters
    /// * `rng` - Seeded random source (consumed only in Dirichlet mode)
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if `alloc` fails validation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use churn_core::cohort::{AllocationConfig, CustomerCohort};
    /// use churn_core::rng::SimRng;
    ///
    /// let mut rng = SimRng::from_seed(42);
    /// let cohort = CustomerCohort::build(&AllocationConfig::default(), &mut rng).unwrap();
    /// assert_eq!(cohort.len(), 8);
    /// ```
    pub fn build(alloc: &AllocationConfig, rng: &mut SimRng) -> Result<Self> {
        alloc.validate()?;

        let top_each = alloc.top2_share / TOP_COUNT as f64;
        let rest_total = 1.0 - alloc.top2_share;

        let mut shares = vec![top_each; TOP_COUNT];
        match alloc.mode {
            AllocationMode::Equal => {
                shares.extend(std::iter::repeat(rest_total / REST_COUNT as f64).take(REST_COUNT));
            }
            AllocationMode::Dirichlet => {
                let weights = sample_dirichlet(REST_COUNT, alloc.concentration, rng)?;
                shares.extend(weights.into_iter().map(|w| w * rest_total));
            }
        }

        Ok(Self { shares })
    }

    /// Revenue shares per customer, in cohort order.
    pub fn shares(&self) -> &[f64] {
        &self.shares
    }

    /// Scales the shares to currency amounts against a revenue total.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if `total` is not a positive
    /// finite number.
    pub fn allocate(&self, total: f64) -> Result<Vec<f64>> {
        if !total.is_finite() || total <= 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "revenue total must be > 0, got {total}"
            )));
        }
        Ok(self.shares.iter().map(|s| s * total).collect())
    }

    /// Number of customers in the cohort.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether the cohort holds no customers (never true for a built cohort).
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Whether the customer at `index` belongs to the top segment.
    pub fn is_top(index: usize) -> bool {
        index < TOP_COUNT
    }
}
