//! Vela local simulator.
//!
//! Full statevector simulation of a [`vela_ir::Circuit`] followed by shot
//! sampling of its terminal measurements. Memory grows as `16 * 2^n` bytes,
//! so the sampler refuses registers above a configurable limit.
//!
//! # Example
//!
//! ```rust
//! use vela_adapter_sim::StatevectorSampler;
//! use vela_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0))?;
//! circuit.cx(QubitId(0), QubitId(1))?;
//! circuit.measure_all("result")?;
//!
//! let mut sampler = StatevectorSampler::new(Some(7));
//! let result = sampler.sample(&circuit, 100)?;
//! let counts = result.histogram("result").unwrap();
//!
//! assert_eq!(counts.total(), 100);
//! assert!(counts.iter().all(|(bits, _)| bits == "00" || bits == "11"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod counts;
pub mod error;
pub mod sampler;
pub mod statevector;

pub use counts::{Counts, MeasurementResult};
pub use error::{SimError, SimResult};
pub use sampler::{DEFAULT_MAX_QUBITS, MAX_SUPPORTED_QUBITS, StatevectorSampler};
pub use statevector::Statevector;
