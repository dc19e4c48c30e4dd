//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use zxport_ir::{Circuit, VariableBindings};
use zxport_qasm2::import_from_file;

/// Load a circuit from an OpenQASM 2.0 file.
pub fn load_circuit(path: &Path, relaxed: bool) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    import_from_file(path, !relaxed)
        .with_context(|| format!("Failed to import {}", path.display()))
}

/// Parse a `NAME=VALUE` command-line binding.
pub fn parse_binding(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{arg}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.to_string(), value))
}

/// Read a JSON object of variable bindings.
pub fn load_bindings(path: &Path) -> Result<VariableBindings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bindings file: {}", path.display()))?;
    let values: BTreeMap<String, f64> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid bindings file: {}", path.display()))?;
    Ok(values.into_iter().collect())
}

/// Merge bindings from an optional file with command-line pairs.
///
/// Command-line values override the file.
pub fn collect_bindings(file: Option<&Path>, pairs: &[(String, f64)]) -> Result<VariableBindings> {
    let mut bindings = match file {
        Some(path) => load_bindings(path)?,
        None => VariableBindings::new(),
    };
    bindings.extend(pairs.iter().cloned());
    debug!(count = bindings.len(), "collected variable bindings");
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding() {
        assert_eq!(parse_binding("theta=0.5").unwrap(), ("theta".to_string(), 0.5));
        assert_eq!(parse_binding(" v = -1e-3 ").unwrap(), ("v".to_string(), -1e-3));
        assert!(parse_binding("theta").is_err());
        assert!(parse_binding("=1").is_err());
        assert!(parse_binding("x=one").is_err());
    }

    #[test]
    fn test_collect_bindings_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");
        fs::write(&path, r#"{"a": 1.0, "b": 2}"#).unwrap();

        let bindings = collect_bindings(Some(&path), &[("b".to_string(), 5.0)]).unwrap();
        assert_eq!(bindings.get("a"), Some(1.0));
        assert_eq!(bindings.get("b"), Some(5.0));
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_invalid_bindings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");
        fs::write(&path, r#"{"a": "one"}"#).unwrap();
        assert!(load_bindings(&path).is_err());
        assert!(load_bindings(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_load_circuit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.qasm");
        fs::write(&path, "qreg q[2];\ncx q[0], q[1];").unwrap();

        assert!(load_circuit(&path, true).is_ok());
        let err = load_circuit(&path, false).unwrap_err();
        assert!(format!("{err:#}").contains("OPENQASM"));
        assert!(load_circuit(&dir.path().join("none.qasm"), true).is_err());
    }
}
