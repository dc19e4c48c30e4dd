//! QASM2 emitter for serializing circuits.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use zxport_ir::{Circuit, Instruction, InstructionKind, VariableBindings};

use crate::decompose::decompose_remove_y;
use crate::error::{ExportError, ExportResult};
use crate::semantics;

/// Options controlling how a circuit is exported.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Values for the free variables of gate parameters.
    pub bindings: VariableBindings,
    /// Rewrite `Y` and `Ry` gates before emitting.
    pub decompose_y: bool,
    /// Also write the text to this file.
    pub output: Option<PathBuf>,
}

impl ExportOptions {
    /// Options with no bindings, no decomposition and no output file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the variable bindings.
    #[must_use]
    pub fn with_bindings(mut self, bindings: VariableBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Set whether Y-basis gates are decomposed.
    #[must_use]
    pub fn with_decompose_y(mut self, decompose_y: bool) -> Self {
        self.decompose_y = decompose_y;
        self
    }

    /// Set the output file.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

/// Emit a circuit as OpenQASM 2.0 text.
///
/// Every free variable must be bound before anything is emitted. Parameters
/// are written in Rust's shortest round-trip notation so re-importing the text
/// yields bit-identical angles.
///
/// The `qreg q[..];` and `creg c[..];` declarations are emitted only for a
/// non-zero count: OpenQASM 2.0 has no empty registers, so a circuit without
/// classical bits produces no `creg` line (and one without qubits no `qreg`).
#[instrument(skip_all, fields(qubits = circuit.num_qubits(), ops = circuit.num_ops()))]
pub fn export(circuit: &Circuit, options: &ExportOptions) -> ExportResult<String> {
    let circuit = if options.decompose_y {
        Cow::Owned(decompose_remove_y(circuit))
    } else {
        Cow::Borrowed(circuit)
    };

    let symbols = circuit.symbols();
    options
        .bindings
        .check_complete(symbols.iter().map(String::as_str))?;
    debug!(variables = symbols.len(), "all variables bound");

    let mut emitter = Emitter::new(&options.bindings);
    let text = emitter.emit_circuit(&circuit)?;

    if let Some(path) = &options.output {
        write_file(path, &text)?;
    }
    info!(bytes = text.len(), "exported OpenQASM 2.0 circuit");
    Ok(text)
}

/// Emit a circuit as OpenQASM 2.0 text.
pub fn export_to_text(
    circuit: &Circuit,
    bindings: &VariableBindings,
    decompose_y: bool,
) -> ExportResult<String> {
    let options = ExportOptions::new()
        .with_bindings(bindings.clone())
        .with_decompose_y(decompose_y);
    export(circuit, &options)
}

/// Emit a circuit as OpenQASM 2.0 text and write it to `path`.
///
/// Returns the text that was written.
pub fn export_to_file(
    circuit: &Circuit,
    bindings: &VariableBindings,
    decompose_y: bool,
    path: impl AsRef<Path>,
) -> ExportResult<String> {
    let options = ExportOptions::new()
        .with_bindings(bindings.clone())
        .with_decompose_y(decompose_y)
        .with_output(path.as_ref());
    export(circuit, &options)
}

fn write_file(path: &Path, text: &str) -> ExportResult<()> {
    debug!(path = %path.display(), "writing OpenQASM file");
    std::fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// QASM2 emitter.
struct Emitter<'b> {
    output: String,
    bindings: &'b VariableBindings,
}

impl<'b> Emitter<'b> {
    fn new(bindings: &'b VariableBindings) -> Self {
        Self {
            output: String::new(),
            bindings,
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> ExportResult<String> {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");

        // Zero-size registers are not valid OpenQASM 2.0.
        let num_qubits = circuit.num_qubits();
        if num_qubits > 0 {
            self.writeln(&format!("qreg q[{num_qubits}];"));
        }
        let num_clbits = circuit.num_clbits();
        if num_clbits > 0 {
            self.writeln(&format!("creg c[{num_clbits}];"));
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> ExportResult<()> {
        let qubits = instruction
            .qubits
            .iter()
            .map(|q| format!("q[{}]", q.0))
            .collect::<Vec<_>>()
            .join(", ");

        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let name = semantics::gate_mnemonic(gate);
                match gate.kind.parameter() {
                    Some(param) => {
                        let value = param.evaluate(self.bindings)?;
                        if !value.is_finite() {
                            return Err(ExportError::NonFiniteParameter {
                                gate: name.to_string(),
                                value,
                            });
                        }
                        self.writeln(&format!("{name}({value:?}) {qubits};"));
                    }
                    None => self.writeln(&format!("{name} {qubits};")),
                }
            }

            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    self.writeln(&format!("measure q[{}] -> c[{}];", q.0, c.0));
                }
            }

            InstructionKind::Reset => self.writeln(&format!("reset {qubits};")),

            InstructionKind::Barrier => self.writeln(&format!("barrier {qubits};")),
        }

        Ok(())
    }

    fn writeln(&mut self, line: &str) {
        let _ = writeln!(self.output, "{line}");
    }
}
