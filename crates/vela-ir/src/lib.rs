//! Vela circuit intermediate representation.
//!
//! A [`Circuit`] is an ordered list of [`Instruction`]s over a fixed register
//! of qubits. Rotation angles are [`ParameterExpression`]s: either a number or
//! a scaled symbol such as `-2*alpha`. Circuits are built once with symbols
//! left free and then bound to numbers with [`Circuit::bind`], which returns a
//! structurally identical circuit.
//!
//! # Example
//!
//! ```rust
//! use vela_ir::{Circuit, ParameterBinding, ParameterExpression, QubitId};
//!
//! let mut circuit = Circuit::with_size("rotate", 2);
//! circuit.h(QubitId(0))?;
//! circuit.rx(ParameterExpression::symbol("theta").scaled(2.0), QubitId(1))?;
//! circuit.measure_all("result")?;
//!
//! assert!(circuit.is_parameterized());
//!
//! let bound = circuit.bind(&ParameterBinding::new().with("theta", 0.25));
//! assert!(!bound.is_parameterized());
//! # Ok::<(), vela_ir::IrError>(())
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{ParameterBinding, ParameterExpression};
pub use qubit::QubitId;
