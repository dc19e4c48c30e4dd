//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - OpenQASM 2.0 conversion through a flat circuit IR",
        style("zxport").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  zxport-ir      Circuit intermediate representation");
    println!("  zxport-qasm2   OpenQASM 2.0 importer, rewriting passes and exporter");
    println!("  zxport-cli     Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
