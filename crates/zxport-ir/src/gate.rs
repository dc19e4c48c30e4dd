//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// A 2x2 complex matrix, row-major.
pub type Matrix2 = [[Complex64; 2]; 2];

/// Parameter-free discriminant of a [`StandardGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    Rx,
    Ry,
    Rz,
}

impl GateKind {
    /// Every gate kind, in declaration order.
    pub const ALL: [GateKind; 11] = [
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::H,
        GateKind::S,
        GateKind::Sdg,
        GateKind::T,
        GateKind::Tdg,
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
    ];

    /// Human-readable name, used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::H => "H",
            GateKind::S => "S",
            GateKind::Sdg => "Sdg",
            GateKind::T => "T",
            GateKind::Tdg => "Tdg",
            GateKind::Rx => "Rx",
            GateKind::Ry => "Ry",
            GateKind::Rz => "Rz",
        }
    }

    /// Number of numeric parameters the gate takes.
    #[inline]
    pub fn num_params(self) -> usize {
        match self {
            GateKind::Rx | GateKind::Ry | GateKind::Rz => 1,
            GateKind::X
            | GateKind::Y
            | GateKind::Z
            | GateKind::H
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg => 0,
        }
    }

    /// Whether this kind acts in the Y basis and is removed in no-Y export.
    #[inline]
    pub fn is_y_basis(self) -> bool {
        matches!(self, GateKind::Y | GateKind::Ry)
    }
}

/// The supported single-qubit gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
}

impl StandardGate {
    /// Build a gate from its kind and parameter list.
    pub fn from_kind(kind: GateKind, params: Vec<ParameterExpression>) -> IrResult<Self> {
        if params.len() != kind.num_params() {
            return Err(IrError::ParameterCountMismatch {
                gate_name: kind.label().to_string(),
                expected: kind.num_params(),
                got: params.len(),
            });
        }
        let mut params = params.into_iter();
        Ok(match (kind, params.next()) {
            (GateKind::Rx, Some(theta)) => StandardGate::Rx(theta),
            (GateKind::Ry, Some(theta)) => StandardGate::Ry(theta),
            (GateKind::Rz, Some(theta)) => StandardGate::Rz(theta),
            (GateKind::X, _) => StandardGate::X,
            (GateKind::Y, _) => StandardGate::Y,
            (GateKind::Z, _) => StandardGate::Z,
            (GateKind::H, _) => StandardGate::H,
            (GateKind::S, _) => StandardGate::S,
            (GateKind::Sdg, _) => StandardGate::Sdg,
            (GateKind::T, _) => StandardGate::T,
            (GateKind::Tdg, _) => StandardGate::Tdg,
            (GateKind::Rx | GateKind::Ry | GateKind::Rz, None) => {
                return Err(IrError::ParameterCountMismatch {
                    gate_name: kind.label().to_string(),
                    expected: 1,
                    got: 0,
                });
            }
        })
    }

    /// The parameter-free kind of this gate.
    #[inline]
    pub fn kind(&self) -> GateKind {
        match self {
            StandardGate::X => GateKind::X,
            StandardGate::Y => GateKind::Y,
            StandardGate::Z => GateKind::Z,
            StandardGate::H => GateKind::H,
            StandardGate::S => GateKind::S,
            StandardGate::Sdg => GateKind::Sdg,
            StandardGate::T => GateKind::T,
            StandardGate::Tdg => GateKind::Tdg,
            StandardGate::Rx(_) => GateKind::Rx,
            StandardGate::Ry(_) => GateKind::Ry,
            StandardGate::Rz(_) => GateKind::Rz,
        }
    }

    /// The rotation angle, if this is a rotation gate.
    pub fn parameter(&self) -> Option<&ParameterExpression> {
        match self {
            StandardGate::Rx(p) | StandardGate::Ry(p) | StandardGate::Rz(p) => Some(p),
            _ => None,
        }
    }

    /// Check if the gate angle references a free variable.
    pub fn is_parameterized(&self) -> bool {
        self.parameter().is_some_and(ParameterExpression::is_symbolic)
    }

    /// The 2x2 unitary of the gate, or `None` if its angle is symbolic.
    pub fn matrix(&self) -> Option<Matrix2> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        Some(match self {
            StandardGate::X => [[zero, one], [one, zero]],
            StandardGate::Y => [[zero, -i], [i, zero]],
            StandardGate::Z => [[one, zero], [zero, -one]],
            StandardGate::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                [[h, h], [h, -h]]
            }
            StandardGate::S => [[one, zero], [zero, i]],
            StandardGate::Sdg => [[one, zero], [zero, -i]],
            StandardGate::T => [[one, zero], [zero, Complex64::from_polar(1.0, FRAC_PI_4)]],
            StandardGate::Tdg => [[one, zero], [zero, Complex64::from_polar(1.0, -FRAC_PI_4)]],
            StandardGate::Rx(theta) => {
                let half = theta.as_f64()? / 2.0;
                let c = Complex64::new(half.cos(), 0.0);
                let s = Complex64::new(0.0, -half.sin());
                [[c, s], [s, c]]
            }
            StandardGate::Ry(theta) => {
                let half = theta.as_f64()? / 2.0;
                let c = Complex64::new(half.cos(), 0.0);
                let s = Complex64::new(half.sin(), 0.0);
                [[c, -s], [s, c]]
            }
            StandardGate::Rz(theta) => {
                let half = theta.as_f64()? / 2.0;
                [
                    [Complex64::from_polar(1.0, -half), zero],
                    [zero, Complex64::from_polar(1.0, half)],
                ]
            }
        })
    }
}

/// Number of control qubits attached to a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Controls {
    /// Plain single-qubit gate.
    #[default]
    Zero,
    /// One control qubit (`c` prefix).
    One,
    /// Two control qubits (`cc` prefix, Toffoli style).
    Two,
}

impl Controls {
    /// Every control count, ascending.
    pub const ALL: [Controls; 3] = [Controls::Zero, Controls::One, Controls::Two];

    /// The number of control qubits.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Controls::Zero => 0,
            Controls::One => 1,
            Controls::Two => 2,
        }
    }

    /// Convert a control count back to [`Controls`].
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            0 => Some(Controls::Zero),
            1 => Some(Controls::One),
            2 => Some(Controls::Two),
            _ => None,
        }
    }
}

/// A gate together with its number of controls.
///
/// Operands are ordered controls first, then the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The gate applied to the target.
    pub kind: StandardGate,
    /// How many control qubits precede the target.
    #[serde(default)]
    pub controls: Controls,
}

impl Gate {
    /// Create a gate with the given number of controls.
    pub fn new(kind: StandardGate, controls: Controls) -> Self {
        Self { kind, controls }
    }

    /// Create an uncontrolled gate.
    pub fn uncontrolled(kind: StandardGate) -> Self {
        Self::new(kind, Controls::Zero)
    }

    /// Create a singly-controlled gate.
    pub fn controlled(kind: StandardGate) -> Self {
        Self::new(kind, Controls::One)
    }

    /// Create a doubly-controlled gate.
    pub fn doubly_controlled(kind: StandardGate) -> Self {
        Self::new(kind, Controls::Two)
    }

    /// Total number of qubit operands.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.controls.count() + 1
    }

    /// A descriptive name such as `CRy` or `CCX`, for diagnostics.
    pub fn name(&self) -> String {
        format!("{}{}", "C".repeat(self.controls.count()), self.kind.kind().label())
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::uncontrolled(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: &Matrix2, b: &Matrix2) -> bool {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| (x - y).norm() < 1e-12)
    }

    #[test]
    fn test_gate_properties() {
        assert_eq!(Gate::uncontrolled(StandardGate::H).num_qubits(), 1);
        assert_eq!(Gate::controlled(StandardGate::X).num_qubits(), 2);
        assert_eq!(Gate::doubly_controlled(StandardGate::X).num_qubits(), 3);
        assert_eq!(Gate::controlled(StandardGate::Ry(PI.into())).name(), "CRy");

        assert!(!StandardGate::H.is_parameterized());
        assert!(!StandardGate::Rx(ParameterExpression::constant(PI)).is_parameterized());
        assert!(StandardGate::Rx(ParameterExpression::symbol("theta")).is_parameterized());
    }

    #[test]
    fn test_from_kind_checks_parameters() {
        assert_eq!(
            StandardGate::from_kind(GateKind::Rz, vec![ParameterExpression::constant(1.0)]).unwrap(),
            StandardGate::Rz(ParameterExpression::constant(1.0))
        );
        assert_eq!(
            StandardGate::from_kind(GateKind::Tdg, vec![]).unwrap(),
            StandardGate::Tdg
        );
        assert!(matches!(
            StandardGate::from_kind(GateKind::H, vec![ParameterExpression::constant(1.0)]),
            Err(IrError::ParameterCountMismatch { expected: 0, got: 1, .. })
        ));
        assert!(matches!(
            StandardGate::from_kind(GateKind::Rx, vec![]),
            Err(IrError::ParameterCountMismatch { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in GateKind::ALL {
            let params = vec![ParameterExpression::constant(0.25); kind.num_params()];
            assert_eq!(StandardGate::from_kind(kind, params).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_controls_count() {
        for controls in Controls::ALL {
            assert_eq!(Controls::from_count(controls.count()), Some(controls));
        }
        assert_eq!(Controls::from_count(3), None);
    }

    #[test]
    fn test_rotation_matrices_match_paulis_at_pi() {
        let i = Complex64::new(0.0, 1.0);
        let scale = |m: Matrix2, s: Complex64| m.map(|row| row.map(|v| v * s));

        let rx = StandardGate::Rx(PI.into()).matrix().unwrap();
        let x = StandardGate::X.matrix().unwrap();
        assert!(approx_eq(&rx, &scale(x, -i)));

        let ry = StandardGate::Ry(PI.into()).matrix().unwrap();
        let y = StandardGate::Y.matrix().unwrap();
        assert!(approx_eq(&ry, &scale(y, -i)));
    }

    #[test]
    fn test_symbolic_matrix_is_none() {
        assert!(StandardGate::Rz(ParameterExpression::symbol("t")).matrix().is_none());
    }
}
