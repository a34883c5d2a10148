//! Weighted random selection
//!
//! Draws one denomination from a weighted set with probability exactly
//! `weight / total_weight`. The draw walks the set in order accumulating
//! weight and returns the first entry whose cumulative sum strictly exceeds
//! the random value. This is the half-open `[prev, cum)` convention: a draw that
//! lands exactly on a boundary belongs to the *next* entry.
//!
//! The random source is injected so callers (and tests) control determinism;
//! sampling consumes exactly one draw and has no other side effects.

use rand::Rng;

use lixi_common::error::Error as CommonError;
use lixi_common::model::{Denomination, DenominationSet};

use crate::error::Result;

/// Draw one denomination according to weight proportion
///
/// # Errors
/// [`CommonError::InvalidDistribution`] if the set is empty or any weight is
/// non-positive.
pub fn sample<'a, R: Rng + ?Sized>(
    set: &'a DenominationSet,
    rng: &mut R,
) -> Result<&'a Denomination> {
    let total = validate(set)?;
    let r = rng.gen::<f64>() * total;
    pick(set, r)
}

/// Index-returning variant of [`sample`], used by the animators
pub fn sample_index<R: Rng + ?Sized>(set: &DenominationSet, rng: &mut R) -> Result<usize> {
    let total = validate(set)?;
    let r = rng.gen::<f64>() * total;
    pick_index(set, r)
}

/// Deterministic core: resolve a concrete draw `r` in `[0, total_weight)`
///
/// `r = 0.0` always selects the first entry; `r` just below the total always
/// selects the last. Exposed for reproducible tests and replay.
pub fn sample_at(set: &DenominationSet, r: f64) -> Result<&Denomination> {
    validate(set)?;
    pick(set, r)
}

fn validate(set: &DenominationSet) -> Result<f64> {
    if set.is_empty() {
        return Err(CommonError::InvalidDistribution("empty denomination set".into()).into());
    }
    for d in set {
        if d.weight <= 0.0 || !d.weight.is_finite() {
            return Err(CommonError::InvalidDistribution(format!(
                "denomination '{}' has non-positive weight {}",
                d.label, d.weight
            ))
            .into());
        }
    }
    let total = set.total_weight();
    if total <= 0.0 || !total.is_finite() {
        return Err(
            CommonError::InvalidDistribution(format!("total weight {} not positive", total)).into(),
        );
    }
    Ok(total)
}

fn pick(set: &DenominationSet, r: f64) -> Result<&Denomination> {
    let index = pick_index(set, r)?;
    set.get(index)
        .ok_or_else(|| CommonError::Internal("picked index out of range".into()).into())
}

fn pick_index(set: &DenominationSet, r: f64) -> Result<usize> {
    if !r.is_finite() || r < 0.0 {
        return Err(CommonError::InvalidDistribution(format!("draw {} out of range", r)).into());
    }

    let mut cumulative = 0.0;
    for (i, d) in set.iter().enumerate() {
        cumulative += d.weight;
        if r < cumulative {
            return Ok(i);
        }
    }

    // r >= total only through floating-point accumulation at the far edge;
    // the last entry owns the closing boundary.
    Ok(set.len() - 1)
}
