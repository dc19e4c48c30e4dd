//! Inspect command implementation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use zxport_ir::Circuit;
use zxport_qasm2::{GateRecord, circuit_to_records, semantics};

use super::common::load_circuit;

/// JSON form of an inspected circuit.
#[derive(Debug, Serialize)]
struct CircuitReport {
    num_qubits: usize,
    num_clbits: usize,
    variables: Vec<String>,
    gates: Vec<GateRecord>,
}

/// Execute the inspect command.
pub fn execute(input: &Path, relaxed: bool, json: bool) -> Result<()> {
    let circuit = load_circuit(input, relaxed)?;

    if json {
        let report = CircuitReport {
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            variables: circuit.symbols().into_iter().collect(),
            gates: circuit_to_records(&circuit),
        };
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize circuit")?;
        println!("{text}");
        return Ok(());
    }

    println!("{} {}", style("Circuit").cyan().bold(), style(input.display()).green());
    println!("  Qubits:     {}", circuit.num_qubits());
    println!("  Clbits:     {}", circuit.num_clbits());

    let (gates, measures, resets, barriers) = circuit.op_counts();
    println!(
        "  Operations: {} ({gates} gates, {measures} measurements, {resets} resets, {barriers} barriers)",
        circuit.num_ops()
    );

    let histogram = gate_histogram(&circuit);
    if !histogram.is_empty() {
        println!("  Gates:");
        for (name, count) in &histogram {
            println!("    {:<8} {:>6}", style(name).yellow(), count);
        }
    }

    let symbols = circuit.symbols();
    if !symbols.is_empty() {
        println!(
            "  Variables:  {}",
            symbols.into_iter().collect::<Vec<_>>().join(", ")
        );
    }

    Ok(())
}

/// Count gates by mnemonic.
fn gate_histogram(circuit: &Circuit) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for gate in circuit.gates() {
        *counts.entry(semantics::gate_mnemonic(gate)).or_insert(0) += 1;
    }
    counts
}
