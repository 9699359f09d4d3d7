//! Mission objective and terminal-velocity constraint.

use serde::{Deserialize, Serialize};

use super::dynamics::ThrustModel;
use crate::config::ProblemConfig;

/// A thrust schedule problem: reach `target_velocity` using as little fuel
/// as possible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Step dynamics.
    pub model: ThrustModel,
    /// Velocity before the first step.
    pub initial_velocity: f64,
    /// Required velocity after the last step.
    pub target_velocity: f64,
}

impl Mission {
    /// Create a mission.
    pub fn new(model: ThrustModel, initial_velocity: f64, target_velocity: f64) -> Self {
        Self {
            model,
            initial_velocity,
            target_velocity,
        }
    }

    /// Create a mission from the problem section of the configuration.
    pub fn from_config(config: &ProblemConfig) -> Self {
        Self::new(
            ThrustModel::new(config.fuel_rate),
            config.initial_velocity,
            config.target_velocity,
        )
    }

    /// Total fuel used by `thrusts`.
    pub fn objective(&self, thrusts: &[f64]) -> f64 {
        thrusts
            .iter()
            .fold((self.initial_velocity, 0.0), |(velocity, fuel), &thrust| {
                let (next, used) = self.model.step(velocity, thrust);
                (next, fuel + used)
            })
            .1
    }

    /// Terminal deviation `final_velocity - target_velocity`; zero when met.
    pub fn constraint(&self, thrusts: &[f64]) -> f64 {
        self.final_velocity(thrusts) - self.target_velocity
    }

    /// Velocity after the last step.
    pub fn final_velocity(&self, thrusts: &[f64]) -> f64 {
        thrusts.iter().fold(self.initial_velocity, |velocity, &thrust| {
            self.model.step(velocity, thrust).0
        })
    }

    /// Velocities visited, starting with the initial one (`len + 1` entries).
    pub fn trajectory(&self, thrusts: &[f64]) -> Vec<f64> {
        let mut velocities = Vec::with_capacity(thrusts.len() + 1);
        velocities.push(self.initial_velocity);
        let mut velocity = self.initial_velocity;
        for &thrust in thrusts {
            velocity = self.model.step(velocity, thrust).0;
            velocities.push(velocity);
        }
        velocities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mission() -> Mission {
        Mission::new(ThrustModel::new(0.01), 0.0, 10.0)
    }

    #[test]
    fn test_all_ones_meets_target() {
        let thrusts = vec![1.0; 10];
        assert_eq!(mission().constraint(&thrusts), 0.0);
        assert_relative_eq!(mission().objective(&thrusts), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_all_zero_residual_is_minus_target() {
        assert_eq!(mission().constraint(&[0.0; 10]), -10.0);
        assert_eq!(mission().objective(&[0.0; 10]), 0.0);
    }

    #[test]
    fn test_trajectory() {
        let m = Mission::new(ThrustModel::new(0.0), 1.0, 3.0);
        assert_eq!(m.trajectory(&[0.5, 1.5]), vec![1.0, 1.5, 3.0]);
        assert_eq!(m.final_velocity(&[0.5, 1.5]), 3.0);
    }

    #[test]
    fn test_from_config() {
        let m = Mission::from_config(&ProblemConfig::default());
        assert_eq!(m.model.fuel_rate, 0.01);
        assert_eq!(m.target_velocity, 10.0);
    }
}
