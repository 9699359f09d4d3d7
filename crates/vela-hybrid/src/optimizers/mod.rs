//! Bounded, equality-constrained classical minimizers.

pub mod augmented_lagrangian;

pub use augmented_lagrangian::AugmentedLagrangian;

use serde::{Deserialize, Serialize};

use crate::config::RefinerConfig;
use crate::error::{HybridError, HybridResult};

/// Result of a constrained minimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best parameters found.
    pub optimal_params: Vec<f64>,
    /// Objective value at `optimal_params`.
    pub optimal_value: f64,
    /// Constraint value at `optimal_params` (zero when satisfied).
    pub constraint_residual: f64,
    /// Outer iterations performed.
    pub num_iterations: usize,
    /// Objective evaluations, including those used for gradients.
    pub num_evaluations: usize,
    /// Objective value after each outer iteration.
    pub history: Vec<f64>,
    /// Whether both tolerances were met.
    pub converged: bool,
    /// Human-readable termination reason.
    pub message: String,
}

/// Trait for constrained optimizers.
pub trait Optimizer {
    /// Minimize `objective` subject to `constraint(x) == 0`.
    ///
    /// # Arguments
    /// * `objective` - The function to minimize
    /// * `constraint` - Equality constraint, satisfied at zero
    /// * `initial_params` - Starting point
    fn minimize<F, C>(
        &self,
        objective: F,
        constraint: C,
        initial_params: Vec<f64>,
    ) -> OptimizationResult
    where
        F: Fn(&[f64]) -> f64,
        C: Fn(&[f64]) -> f64;
}

/// Refine `initial_guess` inside `bounds` with the configured refiner.
///
/// Argument problems (mismatched lengths, inverted or NaN bounds, non-finite
/// guesses) are configuration errors. Failing to converge is not: the result
/// carries `converged == false` and the best point found.
pub fn refine<F, C>(
    initial_guess: &[f64],
    objective: F,
    constraint: C,
    bounds: &[(f64, f64)],
    config: &RefinerConfig,
) -> HybridResult<OptimizationResult>
where
    F: Fn(&[f64]) -> f64,
    C: Fn(&[f64]) -> f64,
{
    config.validate()?;
    if initial_guess.is_empty() {
        return Err(HybridError::config(
            "refiner.initial_guess",
            "needs at least one control",
        ));
    }
    if bounds.len() != initial_guess.len() {
        return Err(HybridError::config(
            "refiner.bounds",
            format!(
                "expected {} bounds, got {}",
                initial_guess.len(),
                bounds.len()
            ),
        ));
    }
    if let Some((i, (lo, hi))) = bounds
        .iter()
        .enumerate()
        .find(|(_, (lo, hi))| lo.is_nan() || hi.is_nan() || lo > hi)
    {
        return Err(HybridError::config(
            "refiner.bounds",
            format!("bound {i} is invalid: [{lo}, {hi}]"),
        ));
    }
    if let Some(x) = initial_guess.iter().find(|x| !x.is_finite()) {
        return Err(HybridError::config(
            "refiner.initial_guess",
            format!("must be finite, got {x}"),
        ));
    }

    let optimizer = AugmentedLagrangian::from_config(config).with_bounds(bounds.to_vec());
    Ok(optimizer.minimize(objective, constraint, initial_guess.to_vec()))
}
