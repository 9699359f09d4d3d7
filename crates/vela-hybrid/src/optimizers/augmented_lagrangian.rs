//! Augmented-Lagrangian method with a projected-gradient inner solver.
//!
//! For `min f(x)` subject to `c(x) = 0` and `lo <= x <= hi`, each outer
//! iteration approximately minimizes
//!
//! ```text
//! L(x) = f(x) + λ·c(x) + (μ/2)·c(x)²
//! ```
//!
//! over the box, then updates `λ += μ·c(x)`. The penalty `μ` grows tenfold
//! whenever the violation fails to shrink by a factor of four. Gradients
//! come from central finite differences, so `f` and `c` need only be
//! evaluable (not differentiable in closed form).

use std::cell::Cell;

use tracing::{debug, trace, warn};

use super::{OptimizationResult, Optimizer};
use crate::config::RefinerConfig;

const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 50;
const PENALTY_GROWTH: f64 = 10.0;
const MAX_PENALTY: f64 = 1e10;
const SUFFICIENT_REDUCTION: f64 = 0.25;

/// Augmented-Lagrangian minimizer for one equality constraint.
#[derive(Debug, Clone)]
pub struct AugmentedLagrangian {
    /// Per-parameter box; empty means unbounded.
    bounds: Vec<(f64, f64)>,

    /// Projected-gradient tolerance.
    tolerance: f64,

    /// Allowed absolute constraint residual.
    constraint_tolerance: f64,

    /// Outer iteration cap.
    max_iterations: usize,

    /// Inner iteration cap per outer iteration.
    inner_iterations: usize,

    /// Starting penalty weight.
    initial_penalty: f64,
}

impl Default for AugmentedLagrangian {
    fn default() -> Self {
        Self::new()
    }
}

impl AugmentedLagrangian {
    /// Create a minimizer with default settings and no bounds.
    pub fn new() -> Self {
        Self {
            bounds: Vec::new(),
            tolerance: 1e-6,
            constraint_tolerance: 1e-6,
            max_iterations: 100,
            inner_iterations: 500,
            initial_penalty: 10.0,
        }
    }

    /// Take tolerances and iteration caps from `config`.
    ///
    /// Bounds are not copied; see [`RefinerConfig::bounds`].
    pub fn from_config(config: &RefinerConfig) -> Self {
        Self::new()
            .with_tolerance(config.tolerance)
            .with_constraint_tolerance(config.constraint_tolerance)
            .with_max_iterations(config.max_iterations)
            .with_inner_iterations(config.inner_iterations)
    }

    /// Set parameter bounds.
    pub fn with_bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the projected-gradient tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Set the constraint tolerance.
    pub fn with_constraint_tolerance(mut self, tol: f64) -> Self {
        self.constraint_tolerance = tol;
        self
    }

    /// Set the outer iteration cap.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set the inner iteration cap.
    pub fn with_inner_iterations(mut self, max_iter: usize) -> Self {
        self.inner_iterations = max_iter;
        self
    }

    /// Set the starting penalty weight.
    pub fn with_initial_penalty(mut self, mu: f64) -> Self {
        self.initial_penalty = mu;
        self
    }

    fn bound(&self, i: usize) -> (f64, f64) {
        self.bounds
            .get(i)
            .copied()
            .unwrap_or((f64::NEG_INFINITY, f64::INFINITY))
    }

    fn project(&self, params: &[f64]) -> Vec<f64> {
        params
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let (lo, hi) = self.bound(i);
                p.max(lo).min(hi)
            })
            .collect()
    }

    /// Largest component of `x - P(x - g)`; zero exactly at a box-constrained
    /// stationary point.
    fn projected_gradient_norm(&self, x: &[f64], grad: &[f64]) -> f64 {
        let stepped: Vec<f64> = x.iter().zip(grad).map(|(xi, gi)| xi - gi).collect();
        self.project(&stepped)
            .iter()
            .zip(x)
            .map(|(p, xi)| (xi - p).abs())
            .fold(0.0, f64::max)
    }

    fn solve_inner<L>(&self, lagrangian: &L, mut x: Vec<f64>) -> InnerOutcome
    where
        L: Fn(&[f64]) -> f64,
    {
        let mut value = lagrangian(&x);
        let mut iterations = 0;

        while iterations < self.inner_iterations {
            let grad = central_difference(lagrangian, &x);
            let pg = self.projected_gradient_norm(&x, &grad);
            if pg <= self.tolerance {
                return InnerOutcome { x, pg, iterations };
            }
            iterations += 1;

            let mut step = 1.0;
            let mut accepted = false;
            for _ in 0..MAX_BACKTRACKS {
                let stepped: Vec<f64> = x
                    .iter()
                    .zip(&grad)
                    .map(|(xi, gi)| xi - step * gi)
                    .collect();
                let candidate = self.project(&stepped);
                let predicted: f64 = grad
                    .iter()
                    .zip(candidate.iter().zip(&x))
                    .map(|(gi, (ci, xi))| gi * (ci - xi))
                    .sum();
                let candidate_value = lagrangian(&candidate);
                if candidate_value <= value + ARMIJO * predicted {
                    x = candidate;
                    value = candidate_value;
                    accepted = true;
                    break;
                }
                step *= 0.5;
            }

            if !accepted {
                trace!(iterations, "line search stalled");
                break;
            }
        }

        let grad = central_difference(lagrangian, &x);
        let pg = self.projected_gradient_norm(&x, &grad);
        InnerOutcome { x, pg, iterations }
    }
}

struct InnerOutcome {
    x: Vec<f64>,
    pg: f64,
    iterations: usize,
}

/// Central-difference gradient with a relative step.
fn central_difference<L>(f: &L, x: &[f64]) -> Vec<f64>
where
    L: Fn(&[f64]) -> f64,
{
    let mut shifted = x.to_vec();
    (0..x.len())
        .map(|i| {
            let h = 1e-7 * x[i].abs().max(1.0);
            shifted[i] = x[i] + h;
            let forward = f(&shifted);
            shifted[i] = x[i] - h;
            let backward = f(&shifted);
            shifted[i] = x[i];
            (forward - backward) / (2.0 * h)
        })
        .collect()
}

impl Optimizer for AugmentedLagrangian {
    fn minimize<F, C>(
        &self,
        objective: F,
        constraint: C,
        initial_params: Vec<f64>,
    ) -> OptimizationResult
    where
        F: Fn(&[f64]) -> f64,
        C: Fn(&[f64]) -> f64,
    {
        let evaluations = Cell::new(0usize);
        let counted = |x: &[f64]| {
            evaluations.set(evaluations.get() + 1);
            objective(x)
        };

        let mut x = self.project(&initial_params);
        let mut multiplier = 0.0;
        let mut penalty = self.initial_penalty;
        let mut previous_violation = f64::INFINITY;
        let mut history = Vec::with_capacity(self.max_iterations);

        for iteration in 1..=self.max_iterations {
            let lagrangian = |p: &[f64]| {
                let c = constraint(p);
                counted(p) + multiplier * c + 0.5 * penalty * c * c
            };
            let inner = self.solve_inner(&lagrangian, x);
            x = inner.x;

            let value = counted(&x);
            let residual = constraint(&x);
            history.push(value);
            debug!(
                iteration,
                inner_iterations = inner.iterations,
                objective = value,
                residual,
                projected_gradient = inner.pg,
                penalty,
                "refiner iteration"
            );

            if residual.abs() <= self.constraint_tolerance && inner.pg <= self.tolerance {
                return OptimizationResult {
                    optimal_params: x,
                    optimal_value: value,
                    constraint_residual: residual,
                    num_iterations: iteration,
                    num_evaluations: evaluations.get(),
                    history,
                    converged: true,
                    message: format!("converged after {iteration} iterations"),
                };
            }

            multiplier += penalty * residual;
            if residual.abs() > SUFFICIENT_REDUCTION * previous_violation {
                penalty = (penalty * PENALTY_GROWTH).min(MAX_PENALTY);
            }
            previous_violation = residual.abs();
        }

        let value = counted(&x);
        let residual = constraint(&x);
        let message = format!(
            "stopped after {} iterations with constraint residual {:.3e}",
            self.max_iterations, residual
        );
        warn!(residual, iterations = self.max_iterations, "refiner did not converge");

        OptimizationResult {
            optimal_params: x,
            optimal_value: value,
            constraint_residual: residual,
            num_iterations: self.max_iterations,
            num_evaluations: evaluations.get(),
            history,
            converged: false,
            message,
        }
    }
}
