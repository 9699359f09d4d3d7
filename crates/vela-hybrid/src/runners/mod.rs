//! End-to-end pipeline runners.

pub mod hybrid;

pub use hybrid::{ThrustResult, ThrustRunner};
