//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Measurement of one qubit into one classical bit.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point).
    Barrier,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on, controls first for gates.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction operates on (for measure).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self.kind, InstructionKind::Reset)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the name of this instruction, for diagnostics.
    pub fn name(&self) -> String {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure".to_string(),
            InstructionKind::Reset => "reset".to_string(),
            InstructionKind::Barrier => "barrier".to_string(),
        }
    }

    /// Check operand counts and that no qubit appears twice.
    ///
    /// Does not check indices against a circuit; see [`crate::Circuit::apply`].
    pub fn validate(&self) -> IrResult<()> {
        let (expected_qubits, expected_clbits) = match &self.kind {
            InstructionKind::Gate(g) => (Some(g.num_qubits()), 0),
            InstructionKind::Measure => (Some(1), 1),
            InstructionKind::Reset => (Some(1), 0),
            InstructionKind::Barrier => (None, 0),
        };

        match expected_qubits {
            Some(expected) if self.qubits.len() != expected => {
                return Err(IrError::QubitCountMismatch {
                    gate_name: self.name(),
                    expected,
                    got: self.qubits.len(),
                });
            }
            None if self.qubits.is_empty() => {
                return Err(IrError::QubitCountMismatch {
                    gate_name: self.name(),
                    expected: 1,
                    got: 0,
                });
            }
            _ => {}
        }

        if self.clbits.len() != expected_clbits {
            return Err(IrError::ClbitCountMismatch {
                gate_name: self.name(),
                expected: expected_clbits,
                got: self.clbits.len(),
            });
        }

        for (i, qubit) in self.qubits.iter().enumerate() {
            if self.qubits[..i].contains(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit: *qubit,
                    gate_name: Some(self.name()),
                });
            }
        }

        Ok(())
    }
}
