//! Property-based tests for QASM2 roundtrip conversion.
//!
//! Tests that circuit → QASM2 → circuit reproduces the circuit exactly, and
//! that the no-Y rewrite behaves as a pure, idempotent pass.

use proptest::prelude::*;
use zxport_ir::{
    Circuit, ClbitId, Controls, Gate, GateKind, Instruction, ParameterExpression, QubitId,
    StandardGate, VariableBindings,
};
use zxport_qasm2::{decompose_remove_y, export_to_text, parse};

/// Generate a random instruction for a circuit with the given size.
fn arb_instruction(num_qubits: u32, num_clbits: u32) -> impl Strategy<Value = Instruction> {
    let order = Just((0..num_qubits).map(QubitId).collect::<Vec<_>>()).prop_shuffle();
    let max_controls = (num_qubits as usize - 1).min(2);

    let gate = (
        prop::sample::select(GateKind::ALL.to_vec()),
        0..=max_controls,
        -10.0f64..10.0,
        order.clone(),
    )
        .prop_map(|(kind, controls, theta, qubits)| {
            let params = if kind.num_params() == 1 {
                vec![ParameterExpression::constant(theta)]
            } else {
                vec![]
            };
            let gate = Gate::new(
                StandardGate::from_kind(kind, params).unwrap(),
                Controls::from_count(controls).unwrap(),
            );
            Instruction::gate(gate, qubits[..=controls].iter().copied())
        });

    let measure_or_reset = (0..num_qubits, 0..num_clbits.max(1)).prop_map(move |(q, c)| {
        if num_clbits > 0 {
            Instruction::measure(QubitId(q), ClbitId(c))
        } else {
            Instruction::reset(QubitId(q))
        }
    });

    let barrier = (order, 1..=num_qubits as usize)
        .prop_map(|(qubits, len)| Instruction::barrier(qubits[..len].iter().copied()));

    prop_oneof![
        6 => gate,
        1 => measure_or_reset,
        1 => (0..num_qubits).prop_map(|q| Instruction::reset(QubitId(q))),
        1 => barrier,
    ]
}

/// Generate a random circuit with 1-5 qubits, 0-3 classical bits and
/// constant gate parameters.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5, 0_u32..=3).prop_flat_map(|(num_qubits, num_clbits)| {
        prop::collection::vec(arb_instruction(num_qubits, num_clbits), 0..=20).prop_map(
            move |instructions| {
                let mut circuit = Circuit::with_size(num_qubits, num_clbits);
                for inst in instructions {
                    circuit.apply(inst).unwrap();
                }
                circuit
            },
        )
    })
}

fn y_basis_count(circuit: &Circuit) -> usize {
    circuit
        .gates()
        .filter(|g| g.kind.kind().is_y_basis())
        .count()
}

proptest! {
    /// Import of the exported text reproduces the circuit, angles included.
    #[test]
    fn test_export_import_roundtrip(circuit in arb_circuit()) {
        let qasm = export_to_text(&circuit, &VariableBindings::new(), false)
            .expect("Failed to export circuit");
        let parsed = parse(&qasm).expect("Failed to parse exported text");

        prop_assert_eq!(parsed, circuit);
    }

    /// Export with decomposition matches decomposing first.
    #[test]
    fn test_decomposed_export_roundtrip(circuit in arb_circuit()) {
        let qasm = export_to_text(&circuit, &VariableBindings::new(), true)
            .expect("Failed to export circuit");
        let parsed = parse(&qasm).expect("Failed to parse exported text");

        prop_assert_eq!(parsed, decompose_remove_y(&circuit));
    }

    /// Decomposition removes every Y-basis gate and is idempotent.
    #[test]
    fn test_decomposition_idempotent(circuit in arb_circuit()) {
        let once = decompose_remove_y(&circuit);
        prop_assert_eq!(y_basis_count(&once), 0);
        prop_assert_eq!(once.num_ops(), circuit.num_ops() + 2 * y_basis_count(&circuit));
        prop_assert_eq!(decompose_remove_y(&once), once);
    }

    /// Every imported instruction has operand counts matching its kind.
    #[test]
    fn test_imported_instructions_respect_arity(circuit in arb_circuit()) {
        let qasm = export_to_text(&circuit, &VariableBindings::new(), true)
            .expect("Failed to export circuit");
        let parsed = parse(&qasm).expect("Failed to parse exported text");

        for inst in parsed.instructions() {
            prop_assert!(inst.validate().is_ok());
            if let Some(gate) = inst.as_gate() {
                prop_assert_eq!(inst.qubits.len(), gate.controls.count() + 1);
            }
        }
    }

    /// Export is deterministic.
    #[test]
    fn test_export_is_deterministic(circuit in arb_circuit()) {
        let first = export_to_text(&circuit, &VariableBindings::new(), false).unwrap();
        let second = export_to_text(&circuit, &VariableBindings::new(), false).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Bare-register broadcast equals the explicit per-index expansion.
    #[test]
    fn test_bare_register_expansion(size in 1_u32..=8, kind in prop::sample::select(vec!["x", "h", "tdg"])) {
        let bare = parse(&format!("OPENQASM 2.0;\nqreg q[{size}];\n{kind} q;")).unwrap();
        let explicit: String = (0..size).map(|i| format!("{kind} q[{i}];\n")).collect();
        let explicit = parse(&format!("OPENQASM 2.0;\nqreg q[{size}];\n{explicit}")).unwrap();

        prop_assert_eq!(bare, explicit);
    }
}
