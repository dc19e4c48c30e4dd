//! Circuit rewriting passes applied before export.
//!
//! Some targets cannot represent gates in the Y basis. [`RemoveY`] rewrites
//! them into X- and Z-basis gates with the same unitary:
//!
//! | Gate | Replacement |
//! |------|-------------|
//! | `Y` | `Rz(-π/2)`, `X`, `Rz(π/2)` |
//! | `Ry(θ)` | `Rz(-π/2)`, `Rx(θ)`, `Rz(π/2)` |
//!
//! Controlled forms keep their controls: every replacement gate carries the
//! original control count and operands, so `cy a, b` becomes
//! `crz(-π/2) a, b; cx a, b; crz(π/2) a, b;`.

use std::f64::consts::FRAC_PI_2;

use tracing::debug;
use zxport_ir::{Circuit, Gate, Instruction, InstructionKind, ParameterExpression, StandardGate};

/// A circuit-to-circuit rewriting pass.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &'static str;

    /// Check if this pass would change the circuit.
    fn should_run(&self, _circuit: &Circuit) -> bool {
        true
    }

    /// Run the pass, producing a new circuit.
    fn run(&self, circuit: &Circuit) -> Circuit;
}

/// Replace `Y` and `Ry` gates (with any number of controls).
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveY;

impl Pass for RemoveY {
    fn name(&self) -> &'static str {
        "RemoveY"
    }

    fn should_run(&self, circuit: &Circuit) -> bool {
        circuit.gates().any(|g| g.kind.kind().is_y_basis())
    }

    fn run(&self, circuit: &Circuit) -> Circuit {
        circuit.rewrite(|inst| match &inst.kind {
            InstructionKind::Gate(gate) => remove_y(gate, inst),
            _ => vec![inst.clone()],
        })
    }
}

fn remove_y(gate: &Gate, inst: &Instruction) -> Vec<Instruction> {
    let middle = match &gate.kind {
        StandardGate::Y => StandardGate::X,
        StandardGate::Ry(theta) => StandardGate::Rx(theta.clone()),
        _ => return vec![inst.clone()],
    };
    let rz = |angle: f64| StandardGate::Rz(ParameterExpression::constant(angle));

    [rz(-FRAC_PI_2), middle, rz(FRAC_PI_2)]
        .into_iter()
        .map(|kind| Instruction::gate(Gate::new(kind, gate.controls), inst.qubits.iter().copied()))
        .collect()
}

/// Rewrite every Y-basis gate of `circuit` into X- and Z-basis gates.
///
/// Pure and idempotent: the result contains no `Y` or `Ry` gates, so running
/// it again returns an equal circuit.
pub fn decompose_remove_y(circuit: &Circuit) -> Circuit {
    let pass = RemoveY;
    if !pass.should_run(circuit) {
        debug!(pass = pass.name(), "skipping pass");
        return circuit.clone();
    }
    let result = pass.run(circuit);
    debug!(
        pass = pass.name(),
        before = circuit.num_ops(),
        after = result.num_ops(),
        "ran pass"
    );
    result
}
