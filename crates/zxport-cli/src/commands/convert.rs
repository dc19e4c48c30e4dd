//! Convert command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use zxport_qasm2::{ExportOptions, export};

use super::common::{collect_bindings, load_circuit};

/// Execute the convert command.
pub fn execute(
    input: &Path,
    output: Option<&Path>,
    relaxed: bool,
    no_y: bool,
    pairs: &[(String, f64)],
    bindings_file: Option<&Path>,
) -> Result<()> {
    eprintln!(
        "{} Converting {}{}",
        style("→").cyan().bold(),
        style(input.display()).green(),
        if no_y { " (no Y gates)" } else { "" }
    );

    let circuit = load_circuit(input, relaxed)?;
    eprintln!(
        "  Loaded: {} qubits, {} clbits, {} ops",
        circuit.num_qubits(),
        circuit.num_clbits(),
        circuit.num_ops()
    );

    let symbols = circuit.symbols();
    if !symbols.is_empty() {
        eprintln!(
            "  Free variables: {}",
            symbols.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    let mut options = ExportOptions::new()
        .with_bindings(collect_bindings(bindings_file, pairs)?)
        .with_decompose_y(no_y);
    if let Some(path) = output {
        options = options.with_output(path);
    }

    let text = export(&circuit, &options).context("Failed to export circuit")?;

    match output {
        Some(path) => {
            eprintln!("{} Conversion complete", style("✓").green().bold());
            eprintln!("  Output: {}", style(path.display()).green());
        }
        None => print!("{text}"),
    }

    Ok(())
}
