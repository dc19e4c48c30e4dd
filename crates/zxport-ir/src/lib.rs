//! zxport Circuit Intermediate Representation
//!
//! This crate provides the data structures shared by the zxport OpenQASM 2.0
//! importer and exporter. A [`Circuit`] is a flat, ordered sequence of
//! [`Instruction`]s over globally indexed qubits and classical bits; register
//! names only exist in the source text and are resolved away during import.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] global indices
//! - **Gates**: [`StandardGate`] for the supported single-qubit gates, combined
//!   with [`Controls`] into a [`Gate`] for controlled and doubly-controlled forms
//! - **Parameters**: [`ParameterExpression`] for concrete or symbolic angles
//! - **Bindings**: [`VariableBindings`] for substituting free variables
//! - **Instructions**: [`Instruction`] combining an operation with its operands
//! - **Circuit**: [`Circuit`] holding the sequence plus resolved bit counts
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use zxport_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size(2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_ops(), 4);
//! ```
//!
//! # Example: Symbolic Parameters
//!
//! ```rust
//! use zxport_ir::{Circuit, ParameterExpression, QubitId, VariableBindings};
//! use std::f64::consts::PI;
//!
//! let mut circuit = Circuit::with_size(1, 0);
//! let theta = ParameterExpression::constant(0.1) * ParameterExpression::pi()
//!     * ParameterExpression::symbol("v");
//! circuit.ry(theta.clone(), QubitId(0)).unwrap();
//!
//! let bindings = VariableBindings::new().with("v", 1.0);
//! let value = theta.evaluate(&bindings).unwrap();
//! assert!((value - 0.1 * PI).abs() < 1e-12);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Parameters | Controlled forms |
//! |------|------------|------------------|
//! | `X`, `Y`, `Z` | 0 | 1 or 2 controls |
//! | `H` | 0 | 1 or 2 controls |
//! | `S`, `Sdg`, `T`, `Tdg` | 0 | 1 or 2 controls |
//! | `Rx`, `Ry`, `Rz` | 1 | 1 or 2 controls |

pub mod bindings;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use bindings::VariableBindings;
pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Controls, Gate, GateKind, Matrix2, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::ParameterExpression;
pub use qubit::{ClbitId, QubitId};
