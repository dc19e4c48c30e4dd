//! Error types for the QASM2 importer and exporter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use zxport_ir::IrError;

/// A 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in characters, starting at 1.
    pub column: usize,
}

impl Position {
    /// Create a position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while importing OpenQASM 2.0 text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (character that starts no token).
    #[error("Lexer error at {position}: {message}")]
    Lex { position: Position, message: String },

    /// Unexpected token.
    #[error("Unexpected token at {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: Position,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Rigorous mode requires the version header first.
    #[error("Missing 'OPENQASM 2.0;' header at {position}, found {found}")]
    MissingHeader { position: Position, found: String },

    /// Version other than 2.0.
    #[error("Invalid OPENQASM version '{version}' at {position}")]
    InvalidVersion { position: Position, version: String },

    /// Name declared twice or colliding with a built-in gate.
    #[error("Duplicate declaration of '{name}' at {position}")]
    DuplicateDeclaration { name: String, position: Position },

    /// Register size is zero or too large.
    #[error("Invalid size {size} for register '{name}' at {position}")]
    InvalidRegisterSize {
        name: String,
        size: u64,
        position: Position,
    },

    /// Gate is neither built in nor previously declared.
    #[error("Unknown gate '{name}' at {position}")]
    UnknownGate { name: String, position: Position },

    /// Wrong number of qubit operands.
    #[error("Gate '{gate}' expects {expected} qubits, got {got} at {position}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
        position: Position,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got} at {position}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
        position: Position,
    },

    /// Whole-register operands of different sizes, or mixed measure operands.
    #[error("Cannot broadcast operands at {position}: {message}")]
    BroadcastMismatch { position: Position, message: String },

    /// Operand names no declared register (or formal qubit inside a gate body).
    #[error("Unresolved register '{name}' at {position}")]
    UnresolvedRegister { name: String, position: Position },

    /// Index past the end of a register.
    #[error("Index {index} out of range for register '{register}' of size {size} at {position}")]
    IndexOutOfRange {
        register: String,
        index: u64,
        size: u32,
        position: Position,
    },

    /// Constant divisor that folds to zero.
    #[error("Division by zero at {position}")]
    DivisionByZero { position: Position },

    /// Parenthesis, negation or operator chain deeper than the parser allows.
    #[error("Expression nested deeper than {limit} levels at {position}")]
    NestingTooDeep { position: Position, limit: usize },

    /// Integer literal used as a size or index that does not fit in 64 bits.
    #[error("Integer '{literal}' is too large at {position}")]
    IntegerTooLarge { literal: String, position: Position },

    /// Malformed external gate record.
    #[error("Invalid gate record #{index}: {message}")]
    InvalidRecord { index: usize, message: String },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),

    /// The input file could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while exporting a circuit as OpenQASM 2.0.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// A gate parameter references a variable with no binding.
    #[error("Unbound variable '{0}'")]
    UnboundVariable(String),

    /// A gate parameter divides by a value that evaluated to zero.
    #[error("Division by zero while evaluating '{0}'")]
    DivisionByZero(String),

    /// A gate parameter evaluated to NaN or infinity.
    #[error("Parameter of gate '{gate}' evaluated to {value}")]
    NonFiniteParameter { gate: String, value: f64 },

    /// Any other IR error.
    #[error("Circuit error: {0}")]
    Circuit(#[source] IrError),

    /// The output file could not be written.
    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<IrError> for ExportError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::UnboundParameter(name) => ExportError::UnboundVariable(name),
            IrError::DivisionByZero(expr) => ExportError::DivisionByZero(expr),
            other => ExportError::Circuit(other),
        }
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
