//! Single-step spacecraft dynamics.

use serde::{Deserialize, Serialize};

/// Velocity update and fuel use for one time step.
///
/// Thrust is applied directly as a velocity increment and fuel is linear in
/// thrust. The sign is not clamped: negative thrust reports negative fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustModel {
    /// Fuel consumed per unit of thrust.
    pub fuel_rate: f64,
}

impl ThrustModel {
    /// Create a model with the given fuel rate.
    pub fn new(fuel_rate: f64) -> Self {
        Self { fuel_rate }
    }

    /// Advance one step: returns `(next_velocity, fuel_used)`.
    pub fn step(&self, velocity: f64, thrust: f64) -> (f64, f64) {
        (velocity + thrust, self.fuel_rate * thrust)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step() {
        let model = ThrustModel::new(0.01);
        let (velocity, fuel) = model.step(0.0, 5.0);
        assert_relative_eq!(velocity, 5.0);
        assert_relative_eq!(fuel, 0.05);
    }

    #[test]
    fn test_negative_thrust_is_not_clamped() {
        let (velocity, fuel) = ThrustModel::new(0.5).step(2.0, -1.0);
        assert_relative_eq!(velocity, 1.0);
        assert_relative_eq!(fuel, -0.5);
    }
}
