//! `OpenQASM` 2.0 Importer and Exporter for zxport
//!
//! This crate converts between `OpenQASM` 2.0 text and the flat circuit IR of
//! [`zxport_ir`]. Import resolves registers to global indices, expands
//! user-defined gates inline and broadcasts whole-register operands, so the
//! resulting [`Circuit`](zxport_ir::Circuit) only contains table gates,
//! measurements, resets and barriers.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version header | ✅ | `OPENQASM 2.0;` (optional in relaxed mode) |
//! | Includes | ✅ (ignored) | `include "qelib1.inc";` |
//! | Registers | ✅ | `qreg q[5];`, `creg c[5];` |
//! | Table gates | ✅ | `h q[0];`, `ccx a, b, c;` |
//! | Parameter expressions | ✅ | `ry(0.1*pi*v) q[0];` |
//! | Gate definitions | ✅ | `gate g(t) a, b { crz(t) a, b; }` |
//! | Register broadcast | ✅ | `x q;`, `measure q -> c;` |
//! | Reset, barrier | ✅ | `reset q[0];`, `barrier q;` |
//! | Comments | ✅ | `// comment` |
//! | `U`, `CX`, `if`, `opaque` | ❌ | |
//!
//! # Example: Import
//!
//! ```rust
//! use zxport_qasm2::parse;
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_ops(), 4);
//! ```
//!
//! # Example: Export with Bindings
//!
//! ```rust
//! use zxport_ir::VariableBindings;
//! use zxport_qasm2::{export_to_text, import_from_text};
//!
//! let circuit = import_from_text("qreg q[1];\nry(0.1*pi*v) q[0];", false).unwrap();
//! let bindings = VariableBindings::new().with("v", 1.0);
//!
//! let qasm = export_to_text(&circuit, &bindings, false).unwrap();
//! assert!(qasm.contains("ry(0.3141592653589793) q[0];"));
//! ```
//!
//! # Example: Removing Y-Basis Gates
//!
//! ```rust
//! use zxport_ir::VariableBindings;
//! use zxport_qasm2::{export_to_text, parse};
//!
//! let circuit = parse("OPENQASM 2.0;\nqreg q[2];\ncy q[0], q[1];").unwrap();
//! let qasm = export_to_text(&circuit, &VariableBindings::new(), true).unwrap();
//! assert!(qasm.contains("cx q[0], q[1];"));
//! assert!(!qasm.contains("cy"));
//! ```
//!
//! # Supported Gates
//!
//! Base gates: `x`, `y`, `z`, `h`, `s`, `sdg`, `t`, `tdg`, `rx(θ)`, `ry(θ)`, `rz(θ)`
//!
//! Each is also available with one control (`cx`, `crz(θ)`, ...) and two
//! controls (`ccx`, `ccrz(θ)`, ...). Operands list the controls first.

mod ast;
pub mod decompose;
mod emitter;
mod error;
pub mod interop;
mod lexer;
mod parser;
pub mod semantics;

pub use decompose::{Pass, RemoveY, decompose_remove_y};
pub use emitter::{ExportOptions, export, export_to_file, export_to_text};
pub use error::{ExportError, ExportResult, ParseError, ParseResult, Position};
pub use interop::{ExternalGate, GateRecord, circuit_from_external, circuit_to_records};
pub use parser::{
    ImportOptions, MAX_EXPRESSION_DEPTH, build_ir, import, import_from_file, import_from_text,
    parse, parse_program,
};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}
