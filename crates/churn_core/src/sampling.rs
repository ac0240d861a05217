//! Random variate samplers for churn trials.
//!
//! Three sampling families drive a trial: Bernoulli (renewal outcome),
//! Triangular (downsell factor on a renewing customer), and Beta (optional
//! stochastic renewal/backfill probabilities). A Dirichlet sampler supports
//! uneven rest-segment revenue allocation.
//!
//! # Purity
//!
//! Every function takes an explicit [`SimRng`]; none touches global state.
//! Two calls with identical parameters and identical rng state produce
//! identical draws, which is what lets sensitivity sweeps hold some
//! dimensions fixed while varying others.

use rand_distr::{Beta, Dirichlet, Distribution, Triangular};

use crate::error::{ModelError, Result};
use crate::rng::SimRng;

/// Draws a Bernoulli outcome with success probability `p`.
///
/// # Arguments
///
/// * `p` - Success probability in [0, 1]
/// * `rng` - Seeded random source
///
/// # Errors
///
/// Returns [`ModelError::InvalidConfig`] if `p` is not a finite number in
/// [0, 1].
///
/// # Examples
///
/// ```rust
/// use churn_core::rng::SimRng;
/// use churn_core::sampling::sample_bernoulli;
///
/// let mut rng = SimRng::from_seed(42);
/// assert!(sample_bernoulli(1.0, &mut rng).unwrap());
/// assert!(!sample_bernoulli(0.0, &mut rng).unwrap());
/// ```
pub fn sample_bernoulli(p: f64, rng: &mut SimRng) -> Result<bool> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(ModelError::InvalidConfig(format!(
            "probability must be in [0, 1], got {p}"
        )));
    }
    Ok(rng.gen_uniform() < p)
}

/// Draws from a Triangular distribution on `[low, high]` with peak `mode`.
///
/// A degenerate triangle (width below machine epsilon) returns `mode`
/// directly, so a zero-width downsell of exactly 1.0 retains revenue
/// bit-for-bit rather than within rounding error.
///
/// # Arguments
///
/// * `low` - Lower bound
/// * `mode` - Most likely value
/// * `high` - Upper bound
/// * `rng` - Seeded random source
///
/// # Errors
///
/// Returns [`ModelError::InvalidConfig`] unless all bounds are finite and
/// `low <= mode <= high`.
pub fn sample_triangular(low: f64, mode: f64, high: f64, rng: &mut SimRng) -> Result<f64> {
    if !(low.is_finite() && mode.is_finite() && high.is_finite()) {
        return Err(ModelError::InvalidConfig(format!(
            "triangular bounds must be finite, got low={low}, mode={mode}, high={high}"
        )));
    }
    if !(low <= mode && mode <= high) {
        return Err(ModelError::InvalidConfig(format!(
            "triangular bounds must satisfy low <= mode <= high, got low={low}, mode={mode}, high={high}"
        )));
    }
    if high - low <= f64::EPSILON {
        return Ok(mode);
    }

    let dist = Triangular::new(low, high, mode)
        .map_err(|e| ModelError::InvalidConfig(format!("triangular distribution: {e}")))?;
    Ok(dist.sample(rng))
}

/// Draws from a Beta distribution parameterised by mean and concentration.
///
/// Shape parameters come from a fixed total concentration `k = alpha + beta`:
/// `alpha = mean * k`, `beta = (1 - mean) * k`. Higher `k` concentrates mass
/// around the mean. Means of exactly 0 or 1 return the endpoint, since a
/// Beta shape parameter must be strictly positive.
///
/// # Arguments
///
/// * `mean` - Target mean in [0, 1]
/// * `concentration` - Total concentration `k`, must be > 0
/// * `rng` - Seeded random source
///
/// # Errors
///
/// Returns [`ModelError::InvalidConfig`] if `mean` is outside [0, 1] or
/// `concentration` is not a positive finite number.
pub fn sample_beta(mean: f64, concentration: f64, rng: &mut SimRng) -> Result<f64> {
    if !mean.is_finite() || !(0.0..=1.0).contains(&mean) {
        return Err(ModelError::InvalidConfig(format!(
            "beta mean must be in [0, 1], got {mean}"
        )));
    }
    if !concentration.is_finite() || concentration <= 0.0 {
        return Err(ModelError::InvalidConfig(format!(
            "beta concentration must be > 0, got {concentration}"
        )));
    }
    if mean == 0.0 || mean == 1.0 {
        return Ok(mean);
    }

    let alpha = mean * concentration;
    let beta = (1.0 - mean) * concentration;
    let dist = Beta::new(alpha, beta)
        .map_err(|e| ModelError::InvalidConfig(format!("beta distribution: {e}")))?;
    Ok(dist.sample(rng))
}

/// Draws `count` weights from a symmetric Dirichlet distribution.
///
/// The weights are non-negative and sum to 1. Higher `concentration` gives a
/// more even split; values near zero produce highly skewed splits.
///
/// # Arguments
///
/// * `count` - Number of weights, must be at least 2
/// * `concentration` - Symmetric concentration parameter, must be > 0
/// * `rng` - Seeded random source
///
/// # Errors
///
/// Returns [`ModelError::InvalidConfig`] if `count < 2` or `concentration`
/// is not a positive finite number.
pub fn sample_dirichlet(count: usize, concentration: f64, rng: &mut SimRng) -> Result<Vec<f64>> {
    if count < 2 {
        return Err(ModelError::InvalidConfig(format!(
            "dirichlet weight count must be at least 2, got {count}"
        )));
    }
    if !concentration.is_finite() || concentration <= 0.0 {
        return Err(ModelError::InvalidConfig(format!(
            "dirichlet concentration must be > 0, got {concentration}"
        )));
    }

    let dist = Dirichlet::new_with_size(concentration, count)
        .map_err(|e| ModelError::InvalidConfig(format!("dirichlet distribution: {e}")))?;
    Ok(dist.sample(rng))
}
