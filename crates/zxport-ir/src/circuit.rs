//! High-level circuit builder API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// An ordered list of instructions over `num_qubits` qubits and `num_clbits`
/// classical bits. Every instruction added through [`Circuit::apply`] is
/// checked for arity and operand range, so a circuit is always well formed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit with no bits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Append an instruction after validating it against this circuit.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        instruction.validate()?;

        if let Some(&qubit) = instruction.qubits.iter().find(|q| q.0 >= self.num_qubits) {
            return Err(IrError::QubitNotFound {
                qubit,
                num_qubits: self.num_qubits,
                gate_name: Some(instruction.name()),
            });
        }
        if let Some(&clbit) = instruction.clbits.iter().find(|c| c.0 >= self.num_clbits) {
            return Err(IrError::ClbitNotFound {
                clbit,
                num_clbits: self.num_clbits,
                gate_name: Some(instruction.name()),
            });
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(
            StandardGate::Rx(theta.into()),
            qubit,
        ))
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(
            StandardGate::Ry(theta.into()),
            qubit,
        ))
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(
            StandardGate::Rz(theta.into()),
            qubit,
        ))
    }

    // =========================================================================
    // Controlled gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            Gate::controlled(StandardGate::X),
            [control, target],
        ))
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            Gate::controlled(StandardGate::Y),
            [control, target],
        ))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            Gate::controlled(StandardGate::Z),
            [control, target],
        ))
    }

    /// Apply controlled Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            Gate::controlled(StandardGate::H),
            [control, target],
        ))
    }

    /// Apply controlled Rx gate.
    pub fn crx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            Gate::controlled(StandardGate::Rx(theta.into())),
            [control, target],
        ))
    }

    /// Apply controlled Ry gate.
    pub fn cry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            Gate::controlled(StandardGate::Ry(theta.into())),
            [control, target],
        ))
    }

    /// Apply controlled Rz gate.
    pub fn crz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            Gate::controlled(StandardGate::Rz(theta.into())),
            [control, target],
        ))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            Gate::doubly_controlled(StandardGate::X),
            [c1, c2, target],
        ))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate, controls first.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit into the classical bit with the same index.
    ///
    /// Classical bits are added if there are fewer than qubits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        for i in 0..self.num_qubits {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.barrier(qubits)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Get the number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Get the instructions in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over the gates only, skipping measure, reset and barrier.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.instructions.iter().filter_map(Instruction::as_gate)
    }

    /// All free variables referenced by any gate parameter, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        for gate in self.gates() {
            if let Some(param) = gate.kind.parameter() {
                param.collect_symbols(&mut set);
            }
        }
        set
    }

    /// Check if any gate parameter references a free variable.
    pub fn is_parameterized(&self) -> bool {
        self.gates().any(|g| g.kind.is_parameterized())
    }

    /// Rewrite every instruction into a replacement sequence, keeping order.
    ///
    /// Replacements must reuse the operands of the instruction they replace,
    /// so the result stays in range without being re-validated.
    pub fn rewrite<I>(&self, mut f: impl FnMut(&Instruction) -> I) -> Self
    where
        I: IntoIterator<Item = Instruction>,
    {
        let mut instructions = Vec::with_capacity(self.instructions.len());
        for inst in &self.instructions {
            for replacement in f(inst) {
                debug_assert!(replacement.validate().is_ok());
                debug_assert!(replacement.qubits.iter().all(|q| inst.qubits.contains(q)));
                instructions.push(replacement);
            }
        }
        Self {
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions,
        }
    }

    /// Count instructions by kind: gates, measurements, resets, barriers.
    pub fn op_counts(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for inst in &self.instructions {
            match inst.kind {
                InstructionKind::Gate(_) => counts.0 += 1,
                InstructionKind::Measure => counts.1 += 1,
                InstructionKind::Reset => counts.2 += 1,
                InstructionKind::Barrier => counts.3 += 1,
            }
        }
        counts
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size(2, 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);

        circuit
            .h(q0)?
            .cx(q0, q1)?
            .measure(q0, ClbitId(0))?
            .measure(q1, ClbitId(1))?;

        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new();
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size(3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.op_counts(), (2, 2, 0, 0));
    }

    #[test]
    fn test_measure_all_grows_clbits() {
        let mut circuit = Circuit::with_size(3, 1);
        circuit.measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(circuit.num_ops(), 3);
    }

    #[test]
    fn test_parameterized_gate() {
        let mut circuit = Circuit::with_size(1, 0);
        circuit.rx(PI / 2.0, QubitId(0)).unwrap();
        circuit
            .ry(ParameterExpression::symbol("theta"), QubitId(0))
            .unwrap();

        assert!(circuit.is_parameterized());
        assert_eq!(
            circuit.symbols().into_iter().collect::<Vec<_>>(),
            vec!["theta".to_string()]
        );
    }

    #[test]
    fn test_out_of_range_operands() {
        let mut circuit = Circuit::with_size(2, 1);
        assert!(matches!(
            circuit.h(QubitId(2)),
            Err(IrError::QubitNotFound { num_qubits: 2, .. })
        ));
        assert!(matches!(
            circuit.measure(QubitId(0), ClbitId(1)),
            Err(IrError::ClbitNotFound { num_clbits: 1, .. })
        ));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_duplicate_operand_rejected() {
        let mut circuit = Circuit::with_size(2, 0);
        assert!(matches!(
            circuit.cx(QubitId(0), QubitId(0)),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size(3, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .ccx(QubitId(0), QubitId(1), QubitId(2))
            .unwrap()
            .barrier_all()
            .unwrap()
            .reset(QubitId(2))
            .unwrap();

        assert_eq!(circuit.op_counts(), (2, 0, 1, 1));
        assert_eq!(circuit.instructions()[2].qubits.len(), 3);
    }

    #[test]
    fn test_equality_compares_instructions() {
        let a = Circuit::bell().unwrap();
        let mut b = Circuit::with_size(2, 2);
        b.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        assert_ne!(a, b);
        b.measure_all().unwrap();
        assert_eq!(a, b);
    }
}
