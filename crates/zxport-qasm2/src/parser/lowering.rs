//! AST-to-Circuit lowering for QASM2.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use zxport_ir::{Circuit, ClbitId, Gate, Instruction, ParameterExpression, QubitId, StandardGate};

use super::MAX_EXPRESSION_DEPTH;
use crate::ast::{GateCall, GateMacro, Operand, Program, StatementKind};
use crate::error::{ParseError, ParseResult, Position};
use crate::semantics;

/// Build a Circuit from a parsed Program.
///
/// Registers are laid out in declaration order, quantum and classical
/// separately. Gate macros are expanded inline and whole-register operands
/// are broadcast, so the result only contains table gates, measurements,
/// resets and barriers.
pub fn build_ir(program: &Program) -> ParseResult<Circuit> {
    let mut builder = IrBuilder::default();
    builder.build(program)
}

/// A contiguous range of global bit indices.
#[derive(Debug, Clone, Copy)]
struct Register {
    offset: u32,
    size: u32,
}

/// A resolved operand: one bit, or a whole register to broadcast over.
#[derive(Debug, Clone, Copy)]
enum Resolved {
    Bit(u32),
    Whole(Register),
}

impl Resolved {
    /// The bit used by the `i`-th call of a broadcast.
    fn bit(self, i: u32) -> u32 {
        match self {
            Resolved::Bit(b) => b,
            Resolved::Whole(reg) => reg.offset + i,
        }
    }
}

#[derive(Default)]
struct IrBuilder<'a> {
    /// Quantum registers: name -> global range.
    qregs: FxHashMap<&'a str, Register>,
    /// Classical registers: name -> global range.
    cregs: FxHashMap<&'a str, Register>,
    /// Gate macros declared so far.
    macros: FxHashMap<&'a str, &'a GateMacro>,
    num_qubits: u32,
    num_clbits: u32,
}

impl<'a> IrBuilder<'a> {
    fn build(&mut self, program: &'a Program) -> ParseResult<Circuit> {
        // First pass: allocate registers
        for stmt in &program.statements {
            let (name, size, quantum) = match &stmt.kind {
                StatementKind::QregDecl { name, size } => (name, *size, true),
                StatementKind::CregDecl { name, size } => (name, *size, false),
                _ => continue,
            };
            self.declare_register(name, size, quantum, stmt.position)?;
        }
        debug!(
            qregs = self.qregs.len(),
            cregs = self.cregs.len(),
            qubits = self.num_qubits,
            clbits = self.num_clbits,
            "allocated registers"
        );

        let mut circuit = Circuit::with_size(self.num_qubits, self.num_clbits);

        // Second pass: lower statements
        for stmt in &program.statements {
            let position = stmt.position;
            match &stmt.kind {
                StatementKind::QregDecl { .. } | StatementKind::CregDecl { .. } => {}
                StatementKind::GateDef(def) => self.declare_macro(def, position)?,
                StatementKind::Gate(call) => self.lower_gate_call(&mut circuit, call, position)?,
                StatementKind::Measure { qubit, clbit } => {
                    self.lower_measure(&mut circuit, qubit, clbit, position)?;
                }
                StatementKind::Reset(operand) => {
                    let target = self.resolve_qubit(operand, position)?;
                    for i in 0..width(target) {
                        circuit.reset(QubitId(target.bit(i)))?;
                    }
                }
                StatementKind::Barrier(operands) => {
                    let mut qubits: Vec<QubitId> = Vec::new();
                    for operand in operands {
                        let target = self.resolve_qubit(operand, position)?;
                        for i in 0..width(target) {
                            let qubit = QubitId(target.bit(i));
                            if !qubits.contains(&qubit) {
                                qubits.push(qubit);
                            }
                        }
                    }
                    circuit.apply(Instruction::barrier(qubits))?;
                }
            }
        }

        Ok(circuit)
    }

    fn declare_register(
        &mut self,
        name: &'a str,
        size: u32,
        quantum: bool,
        position: Position,
    ) -> ParseResult<()> {
        if self.qregs.contains_key(name) || self.cregs.contains_key(name) {
            return Err(ParseError::DuplicateDeclaration {
                name: name.to_string(),
                position,
            });
        }

        let next = if quantum {
            &mut self.num_qubits
        } else {
            &mut self.num_clbits
        };
        let invalid = || ParseError::InvalidRegisterSize {
            name: name.to_string(),
            size: u64::from(size),
            position,
        };
        if size == 0 {
            return Err(invalid());
        }
        let offset = *next;
        *next = offset.checked_add(size).ok_or_else(invalid)?;

        let regs = if quantum {
            &mut self.qregs
        } else {
            &mut self.cregs
        };
        regs.insert(name, Register { offset, size });
        Ok(())
    }

    fn declare_macro(&mut self, def: &'a GateMacro, position: Position) -> ParseResult<()> {
        if semantics::is_builtin(&def.name) || self.macros.contains_key(def.name.as_str()) {
            return Err(ParseError::DuplicateDeclaration {
                name: def.name.clone(),
                position,
            });
        }
        // Bodies may only call gates known before this definition.
        let known = |name: &str| semantics::is_builtin(name) || self.macros.contains_key(name);
        if let Some(call) = def.body.iter().find(|call| !known(&call.name)) {
            return Err(ParseError::UnknownGate {
                name: call.name.clone(),
                position,
            });
        }
        debug!(
            name = %def.name,
            params = def.num_params(),
            qubits = def.num_qubits(),
            "declared gate macro"
        );
        self.macros.insert(def.name.as_str(), def);
        Ok(())
    }

    fn lower_gate_call(
        &self,
        circuit: &mut Circuit,
        call: &GateCall,
        position: Position,
    ) -> ParseResult<()> {
        let resolved = call
            .qubits
            .iter()
            .map(|op| self.resolve_qubit(op, position))
            .collect::<ParseResult<Vec<_>>>()?;

        let mut sizes = resolved.iter().filter_map(|r| match r {
            Resolved::Whole(reg) => Some(reg.size),
            Resolved::Bit(_) => None,
        });
        let count = match sizes.next() {
            Some(first) => {
                if sizes.any(|size| size != first) {
                    return Err(ParseError::BroadcastMismatch {
                        position,
                        message: format!("registers passed to '{}' differ in size", call.name),
                    });
                }
                first
            }
            None => 1,
        };

        for i in 0..count {
            let qubits = resolved.iter().map(|r| QubitId(r.bit(i))).collect();
            self.apply_gate(circuit, &call.name, call.params.clone(), qubits, position)?;
        }
        Ok(())
    }

    /// Append a table gate, or expand a macro into table gates.
    fn apply_gate(
        &self,
        circuit: &mut Circuit,
        name: &str,
        params: Vec<ParameterExpression>,
        qubits: Vec<QubitId>,
        position: Position,
    ) -> ParseResult<()> {
        let (num_params, num_qubits) = if let Some(sig) = semantics::lookup(name) {
            (sig.num_params(), sig.num_qubits())
        } else if let Some(def) = self.macros.get(name) {
            (def.num_params(), def.num_qubits())
        } else {
            return Err(ParseError::UnknownGate {
                name: name.to_string(),
                position,
            });
        };
        if params.len() != num_params {
            return Err(ParseError::WrongParameterCount {
                gate: name.to_string(),
                expected: num_params,
                got: params.len(),
                position,
            });
        }
        if qubits.len() != num_qubits {
            return Err(ParseError::WrongQubitCount {
                gate: name.to_string(),
                expected: num_qubits,
                got: qubits.len(),
                position,
            });
        }

        if let Some(sig) = semantics::lookup(name) {
            let kind = StandardGate::from_kind(sig.kind, params)?;
            circuit.apply(Instruction::gate(Gate::new(kind, sig.controls), qubits))?;
            return Ok(());
        }

        let Some(def) = self.macros.get(name).copied() else {
            return Err(ParseError::UnknownGate {
                name: name.to_string(),
                position,
            });
        };
        trace!(name, ?qubits, "expanding gate macro");

        let actuals: FxHashMap<String, ParameterExpression> =
            def.params.iter().cloned().zip(params).collect();

        for call in &def.body {
            let mut body_qubits = Vec::with_capacity(call.qubits.len());
            for operand in &call.qubits {
                let formal = match operand {
                    Operand::Register(formal) => def.qubits.iter().position(|q| q == formal),
                    Operand::Indexed { .. } => None,
                };
                let Some(i) = formal else {
                    return Err(ParseError::UnresolvedRegister {
                        name: operand.to_string(),
                        position,
                    });
                };
                body_qubits.push(qubits[i]);
            }
            let mut body_params = Vec::with_capacity(call.params.len());
            for param in &call.params {
                let param = param.substitute(&actuals).simplify();
                if param.depth() > MAX_EXPRESSION_DEPTH {
                    return Err(ParseError::NestingTooDeep {
                        position,
                        limit: MAX_EXPRESSION_DEPTH,
                    });
                }
                body_params.push(param);
            }
            self.apply_gate(circuit, &call.name, body_params, body_qubits, position)?;
        }
        Ok(())
    }

    fn lower_measure(
        &self,
        circuit: &mut Circuit,
        qubit: &Operand,
        clbit: &Operand,
        position: Position,
    ) -> ParseResult<()> {
        let source = self.resolve_qubit(qubit, position)?;
        let target = self.resolve_clbit(clbit, position)?;

        match (source, target) {
            (Resolved::Bit(q), Resolved::Bit(c)) => {
                circuit.measure(QubitId(q), ClbitId(c))?;
            }
            (Resolved::Whole(qreg), Resolved::Whole(creg)) if qreg.size == creg.size => {
                for i in 0..qreg.size {
                    circuit.measure(QubitId(qreg.offset + i), ClbitId(creg.offset + i))?;
                }
            }
            (Resolved::Whole(qreg), Resolved::Whole(creg)) => {
                return Err(ParseError::BroadcastMismatch {
                    position,
                    message: format!(
                        "cannot measure {qubit} of size {} into {clbit} of size {}",
                        qreg.size, creg.size
                    ),
                });
            }
            _ => {
                return Err(ParseError::BroadcastMismatch {
                    position,
                    message: format!(
                        "cannot measure {qubit} into {clbit}: operands must both be registers or both be indexed"
                    ),
                });
            }
        }
        Ok(())
    }

    fn resolve_qubit(&self, operand: &Operand, position: Position) -> ParseResult<Resolved> {
        resolve(&self.qregs, operand, position)
    }

    fn resolve_clbit(&self, operand: &Operand, position: Position) -> ParseResult<Resolved> {
        resolve(&self.cregs, operand, position)
    }
}

/// Number of calls an operand expands to.
fn width(resolved: Resolved) -> u32 {
    match resolved {
        Resolved::Bit(_) => 1,
        Resolved::Whole(reg) => reg.size,
    }
}

fn resolve(
    regs: &FxHashMap<&str, Register>,
    operand: &Operand,
    position: Position,
) -> ParseResult<Resolved> {
    let name = operand.register_name();
    let Some(&reg) = regs.get(name) else {
        return Err(ParseError::UnresolvedRegister {
            name: name.to_string(),
            position,
        });
    };
    match operand {
        Operand::Register(_) => Ok(Resolved::Whole(reg)),
        Operand::Indexed { index, .. } => match u32::try_from(*index) {
            Ok(i) if i < reg.size => Ok(Resolved::Bit(reg.offset + i)),
            _ => Err(ParseError::IndexOutOfRange {
                register: name.to_string(),
                index: *index,
                size: reg.size,
                position,
            }),
        },
    }
}
