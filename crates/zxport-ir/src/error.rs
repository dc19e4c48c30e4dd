//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit.
    #[error(
        "Qubit {qubit} out of range for circuit with {num_qubits} qubits{}",
        format_gate_context(.gate_name)
    )]
    QubitNotFound {
        /// The offending qubit.
        qubit: QubitId,
        /// Number of qubits in the circuit.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit index outside the circuit.
    #[error(
        "Classical bit {clbit} out of range for circuit with {num_clbits} bits{}",
        format_gate_context(.gate_name)
    )]
    ClbitNotFound {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Number of classical bits in the circuit.
        num_clbits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Operation requires a different number of qubits.
    #[error("Operation '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the operation.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Operation requires a different number of classical bits.
    #[error("Operation '{gate_name}' requires {expected} classical bits, got {got}")]
    ClbitCountMismatch {
        /// Name of the operation.
        gate_name: String,
        /// Expected number of classical bits.
        expected: usize,
        /// Actual number of classical bits provided.
        got: usize,
    },

    /// Gate requires a different number of parameters.
    #[error("Gate '{gate_name}' requires {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of parameters.
        expected: usize,
        /// Actual number of parameters provided.
        got: usize,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Parameter references a variable with no binding.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// Parameter evaluation divided by zero.
    #[error("Division by zero while evaluating parameter '{0}'")]
    DivisionByZero(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
