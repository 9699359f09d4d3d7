//! Hybrid quantum-classical thrust planning.
//!
//! A layered variational circuit over one qubit per time step is sampled on
//! the local statevector simulator. The most frequent bitstring becomes the
//! initial guess for a bounded, equality-constrained classical minimizer that
//! refines a continuous thrust schedule:
//!
//! - **Problems**: the velocity/fuel dynamics model and the mission
//!   objective and terminal-velocity constraint
//! - **Circuits**: the cost/mixing layered ansatz with symbolic parameters
//! - **Seed**: most-frequent-outcome extraction
//! - **Optimizers**: augmented-Lagrangian refinement inside box bounds
//! - **Runners**: the end-to-end pipeline
//!
//! # Example
//!
//! ```rust
//! use vela_hybrid::{HybridConfig, ThrustRunner};
//!
//! let mut config = HybridConfig::default();
//! config.problem.num_steps = 4;
//! config.problem.target_velocity = 4.0;
//! config.sampler.shots = 200;
//! config.sampler.seed = Some(42);
//!
//! let result = ThrustRunner::new(config)?.run()?;
//! assert_eq!(result.controls.len(), 4);
//! assert_eq!(result.histogram.total(), 200);
//! # Ok::<(), vela_hybrid::HybridError>(())
//! ```

pub mod circuits;
pub mod config;
pub mod error;
pub mod optimizers;
pub mod problems;
pub mod runners;
pub mod seed;

pub use circuits::{AnsatzParameters, variational_ansatz};
pub use config::{AnsatzConfig, HybridConfig, ProblemConfig, RefinerConfig, SamplerConfig};
pub use error::{HybridError, HybridResult, Stage};
pub use optimizers::{AugmentedLagrangian, OptimizationResult, Optimizer, refine};
pub use problems::{Mission, ThrustModel};
pub use runners::{ThrustResult, ThrustRunner};
pub use seed::extract_seed;
