//! Exchange of circuits with external gate-list representations.
//!
//! Other tools describe circuits as flat lists of gates, each with a kind tag,
//! integer operands and an optional angle. Anything implementing
//! [`ExternalGate`] can be turned into a [`Circuit`]; [`GateRecord`] is the
//! serde-serialisable form used by the command line tool.
//!
//! Kind tags are the OpenQASM mnemonics (`h`, `cx`, `ccrz`, ...) plus
//! `measure`, `reset` and `barrier`. A measurement's operands are
//! `[qubit, clbit]`.

use serde::{Deserialize, Serialize};
use zxport_ir::{
    Circuit, ClbitId, Gate, Instruction, InstructionKind, ParameterExpression, QubitId,
    StandardGate,
};

use crate::error::{ParseError, ParseResult};
use crate::semantics;

/// A gate described by an external tool.
pub trait ExternalGate {
    /// The kind tag, e.g. `"cx"` or `"measure"`.
    fn kind_tag(&self) -> &str;

    /// Integer operands, controls first.
    fn operands(&self) -> &[u32];

    /// The rotation angle, if any.
    fn parameter(&self) -> Option<&ParameterExpression>;
}

/// A plain gate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Kind tag.
    pub kind: String,
    /// Operands.
    pub operands: Vec<u32>,
    /// Rotation angle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<ParameterExpression>,
}

impl GateRecord {
    /// Create a record without a parameter.
    pub fn new(kind: impl Into<String>, operands: impl IntoIterator<Item = u32>) -> Self {
        Self {
            kind: kind.into(),
            operands: operands.into_iter().collect(),
            parameter: None,
        }
    }

    /// Attach a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<ParameterExpression>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }
}

impl ExternalGate for GateRecord {
    fn kind_tag(&self) -> &str {
        &self.kind
    }

    fn operands(&self) -> &[u32] {
        &self.operands
    }

    fn parameter(&self) -> Option<&ParameterExpression> {
        self.parameter.as_ref()
    }
}

/// Build a circuit from external gate descriptions, in order.
///
/// Unknown tags, operand counts that do not match the tag and parameters on
/// parameterless gates are reported as [`ParseError::InvalidRecord`] with the
/// index of the offending gate. Out-of-range operands surface as
/// [`ParseError::Circuit`].
pub fn circuit_from_external<G: ExternalGate>(
    num_qubits: u32,
    num_clbits: u32,
    gates: impl IntoIterator<Item = G>,
) -> ParseResult<Circuit> {
    let mut circuit = Circuit::with_size(num_qubits, num_clbits);
    for (index, gate) in gates.into_iter().enumerate() {
        let instruction = to_instruction(&gate).map_err(|message| ParseError::InvalidRecord {
            index,
            message,
        })?;
        circuit.apply(instruction)?;
    }
    Ok(circuit)
}

fn to_instruction(gate: &impl ExternalGate) -> Result<Instruction, String> {
    let tag = gate.kind_tag();
    let operands = gate.operands();
    let parameter = gate.parameter();

    if parameter.is_some() && matches!(tag, "measure" | "reset" | "barrier") {
        return Err(format!("'{tag}' takes no parameter"));
    }

    match tag {
        "measure" => match operands {
            &[qubit, clbit] => Ok(Instruction::measure(QubitId(qubit), ClbitId(clbit))),
            _ => Err(format!("'measure' expects [qubit, clbit], got {operands:?}")),
        },
        "reset" => match operands {
            &[qubit] => Ok(Instruction::reset(QubitId(qubit))),
            _ => Err(format!("'reset' expects one operand, got {}", operands.len())),
        },
        "barrier" => {
            if operands.is_empty() {
                return Err("'barrier' expects at least one operand".into());
            }
            Ok(Instruction::barrier(operands.iter().copied().map(QubitId)))
        }
        _ => {
            let sig = semantics::lookup(tag).ok_or_else(|| format!("unknown gate '{tag}'"))?;
            if operands.len() != sig.num_qubits() {
                return Err(format!(
                    "'{tag}' expects {} operands, got {}",
                    sig.num_qubits(),
                    operands.len()
                ));
            }
            let params: Vec<_> = parameter.cloned().into_iter().collect();
            let kind = StandardGate::from_kind(sig.kind, params).map_err(|e| e.to_string())?;
            Ok(Instruction::gate(
                Gate::new(kind, sig.controls),
                operands.iter().copied().map(QubitId),
            ))
        }
    }
}

/// Describe a circuit as a list of gate records.
pub fn circuit_to_records(circuit: &Circuit) -> Vec<GateRecord> {
    circuit
        .instructions()
        .iter()
        .map(|inst| {
            let qubits = inst.qubits.iter().map(|q| q.0);
            match &inst.kind {
                InstructionKind::Gate(gate) => {
                    let record = GateRecord::new(semantics::gate_mnemonic(gate), qubits);
                    match gate.kind.parameter() {
                        Some(p) => record.with_parameter(p.clone()),
                        None => record,
                    }
                }
                InstructionKind::Measure => {
                    GateRecord::new("measure", qubits.chain(inst.clbits.iter().map(|c| c.0)))
                }
                InstructionKind::Reset => GateRecord::new("reset", qubits),
                InstructionKind::Barrier => GateRecord::new("barrier", qubits),
            }
        })
        .collect()
}
