//! Problem definitions for the thrust planner.

pub mod dynamics;
pub mod mission;

pub use dynamics::ThrustModel;
pub use mission::Mission;
