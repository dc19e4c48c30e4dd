//! Static mapping between OpenQASM gate mnemonics and IR gate kinds.
//!
//! Every base gate (`x y z h s sdg t tdg rx ry rz`) is available uncontrolled,
//! with one control (`c` prefix) and with two controls (`cc` prefix). The
//! forward table is built once from the exhaustive reverse mapping, so the two
//! directions cannot drift apart.

use rustc_hash::FxHashMap;
use std::sync::LazyLock;
use zxport_ir::{Controls, Gate, GateKind};

/// What a built-in mnemonic means in the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GateSignature {
    /// The base gate acting on the target.
    pub kind: GateKind,
    /// Number of control qubits before the target.
    pub controls: Controls,
}

impl GateSignature {
    /// Number of qubit operands.
    pub fn num_qubits(self) -> usize {
        self.controls.count() + 1
    }

    /// Number of numeric parameters.
    pub fn num_params(self) -> usize {
        self.kind.num_params()
    }
}

static TABLE: LazyLock<FxHashMap<&'static str, GateSignature>> = LazyLock::new(|| {
    let mut table = FxHashMap::default();
    for controls in Controls::ALL {
        for kind in GateKind::ALL {
            table.insert(mnemonic(kind, controls), GateSignature { kind, controls });
        }
    }
    table
});

/// Look up a built-in mnemonic. Matching is exact and case sensitive.
pub fn lookup(name: &str) -> Option<GateSignature> {
    TABLE.get(name).copied()
}

/// Check whether `name` is a built-in mnemonic.
pub fn is_builtin(name: &str) -> bool {
    TABLE.contains_key(name)
}

/// All built-in mnemonics with their signatures, in unspecified order.
pub fn signatures() -> impl Iterator<Item = (&'static str, GateSignature)> {
    TABLE.iter().map(|(name, sig)| (*name, *sig))
}

/// The mnemonic of a gate as written in OpenQASM.
pub fn gate_mnemonic(gate: &Gate) -> &'static str {
    mnemonic(gate.kind.kind(), gate.controls)
}

/// The mnemonic for a base gate with the given number of controls.
pub fn mnemonic(kind: GateKind, controls: Controls) -> &'static str {
    match (controls, kind) {
        (Controls::Zero, GateKind::X) => "x",
        (Controls::Zero, GateKind::Y) => "y",
        (Controls::Zero, GateKind::Z) => "z",
        (Controls::Zero, GateKind::H) => "h",
        (Controls::Zero, GateKind::S) => "s",
        (Controls::Zero, GateKind::Sdg) => "sdg",
        (Controls::Zero, GateKind::T) => "t",
        (Controls::Zero, GateKind::Tdg) => "tdg",
        (Controls::Zero, GateKind::Rx) => "rx",
        (Controls::Zero, GateKind::Ry) => "ry",
        (Controls::Zero, GateKind::Rz) => "rz",
        (Controls::One, GateKind::X) => "cx",
        (Controls::One, GateKind::Y) => "cy",
        (Controls::One, GateKind::Z) => "cz",
        (Controls::One, GateKind::H) => "ch",
        (Controls::One, GateKind::S) => "cs",
        (Controls::One, GateKind::Sdg) => "csdg",
        (Controls::One, GateKind::T) => "ct",
        (Controls::One, GateKind::Tdg) => "ctdg",
        (Controls::One, GateKind::Rx) => "crx",
        (Controls::One, GateKind::Ry) => "cry",
        (Controls::One, GateKind::Rz) => "crz",
        (Controls::Two, GateKind::X) => "ccx",
        (Controls::Two, GateKind::Y) => "ccy",
        (Controls::Two, GateKind::Z) => "ccz",
        (Controls::Two, GateKind::H) => "cch",
        (Controls::Two, GateKind::S) => "ccs",
        (Controls::Two, GateKind::Sdg) => "ccsdg",
        (Controls::Two, GateKind::T) => "cct",
        (Controls::Two, GateKind::Tdg) => "cctdg",
        (Controls::Two, GateKind::Rx) => "ccrx",
        (Controls::Two, GateKind::Ry) => "ccry",
        (Controls::Two, GateKind::Rz) => "ccrz",
    }
}
