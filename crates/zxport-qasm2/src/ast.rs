//! Abstract Syntax Tree for `OpenQASM` 2.0.

use serde::{Deserialize, Serialize};
use zxport_ir::ParameterExpression;

use crate::error::Position;

/// A complete QASM2 program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Version from the header, if one was present (always `"2.0"`).
    pub version: Option<String>,
    /// Statements in source order. `include` statements are dropped.
    pub statements: Vec<Statement>,
}

/// A statement with the position of its first token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub position: Position,
}

/// A statement in a QASM2 program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// Quantum register declaration: `qreg name[size];`
    QregDecl { name: String, size: u32 },

    /// Classical register declaration: `creg name[size];`
    CregDecl { name: String, size: u32 },

    /// Gate definition: `gate name(params) qubits { body }`
    GateDef(GateMacro),

    /// Gate application.
    Gate(GateCall),

    /// Measurement: `measure q -> c;`
    Measure { qubit: Operand, clbit: Operand },

    /// Reset: `reset q;`
    Reset(Operand),

    /// Barrier: `barrier q, r[0];`
    Barrier(Vec<Operand>),
}

/// A gate call, either at top level or inside a gate body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCall {
    /// Gate name.
    pub name: String,
    /// Gate parameters, constant-folded.
    pub params: Vec<ParameterExpression>,
    /// Operands, controls first.
    pub qubits: Vec<Operand>,
}

/// A user-defined gate, expanded inline wherever it is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateMacro {
    /// Gate name.
    pub name: String,
    /// Formal parameter names.
    pub params: Vec<String>,
    /// Formal qubit names.
    pub qubits: Vec<String>,
    /// Body calls; every operand is a bare formal qubit name.
    pub body: Vec<GateCall>,
}

impl GateMacro {
    /// Number of qubit operands.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Number of numeric parameters.
    pub fn num_params(&self) -> usize {
        self.params.len()
    }
}

/// Reference to a register or a single register element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// Whole register: `q`.
    Register(String),
    /// Single element: `q[i]`.
    Indexed { register: String, index: u64 },
}

impl Operand {
    /// Create a reference to a single element.
    pub fn indexed(register: impl Into<String>, index: u64) -> Self {
        Operand::Indexed {
            register: register.into(),
            index,
        }
    }

    /// Create a reference to an entire register.
    pub fn register(register: impl Into<String>) -> Self {
        Operand::Register(register.into())
    }

    /// Get the register name.
    pub fn register_name(&self) -> &str {
        match self {
            Operand::Register(register) | Operand::Indexed { register, .. } => register,
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Register(register) => write!(f, "{register}"),
            Operand::Indexed { register, index } => write!(f, "{register}[{index}]"),
        }
    }
}
