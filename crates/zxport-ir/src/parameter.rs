//! Parameter expressions for rotation angles.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;

use crate::bindings::VariableBindings;
use crate::error::{IrError, IrResult};

/// A concrete or symbolic parameter expression.
///
/// Free variables are represented by [`ParameterExpression::Symbol`]; `pi` is a
/// reserved constant and never a free variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A named free variable.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a free variable.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// Check if this expression references any free variable.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Try to evaluate as a concrete f64 value.
    ///
    /// Returns `None` for symbolic expressions and for divisions by zero.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            ParameterExpression::Sub(a, b) => Some(a.as_f64()? - b.as_f64()?),
            ParameterExpression::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.as_f64()? / divisor)
            }
        }
    }

    /// Evaluate the expression with every free variable taken from `bindings`.
    ///
    /// Fails with [`IrError::UnboundParameter`] naming the first missing
    /// variable (in sorted order) before any arithmetic is attempted.
    pub fn evaluate(&self, bindings: &VariableBindings) -> IrResult<f64> {
        bindings.check_complete(self.symbols().iter().map(String::as_str))?;
        self.eval_bound(bindings)
    }

    fn eval_bound(&self, bindings: &VariableBindings) -> IrResult<f64> {
        Ok(match self {
            ParameterExpression::Constant(v) => *v,
            ParameterExpression::Symbol(name) => bindings
                .get(name)
                .ok_or_else(|| IrError::UnboundParameter(name.clone()))?,
            ParameterExpression::Pi => PI,
            ParameterExpression::Neg(e) => -e.eval_bound(bindings)?,
            ParameterExpression::Add(a, b) => a.eval_bound(bindings)? + b.eval_bound(bindings)?,
            ParameterExpression::Sub(a, b) => a.eval_bound(bindings)? - b.eval_bound(bindings)?,
            ParameterExpression::Mul(a, b) => a.eval_bound(bindings)? * b.eval_bound(bindings)?,
            ParameterExpression::Div(a, b) => {
                let divisor = b.eval_bound(bindings)?;
                if divisor == 0.0 {
                    return Err(IrError::DivisionByZero(self.to_string()));
                }
                a.eval_bound(bindings)? / divisor
            }
        })
    }

    /// Get all free variable names in this expression, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    pub(crate) fn collect_symbols(&self, set: &mut BTreeSet<String>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(name) => {
                if !set.contains(name) {
                    set.insert(name.clone());
                }
            }
            ParameterExpression::Neg(e) => e.collect_symbols(set),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.collect_symbols(set);
                b.collect_symbols(set);
            }
        }
    }

    /// Replace free variables by expressions, all at once.
    ///
    /// Replacements are not themselves rescanned, so `a -> b, b -> a` swaps.
    pub fn substitute(&self, replacements: &FxHashMap<String, ParameterExpression>) -> Self {
        let sub = |e: &ParameterExpression| Box::new(e.substitute(replacements));
        match self {
            ParameterExpression::Symbol(n) => {
                replacements.get(n).cloned().unwrap_or_else(|| self.clone())
            }
            ParameterExpression::Constant(_) | ParameterExpression::Pi => self.clone(),
            ParameterExpression::Neg(e) => ParameterExpression::Neg(sub(e)),
            ParameterExpression::Add(a, b) => ParameterExpression::Add(sub(a), sub(b)),
            ParameterExpression::Sub(a, b) => ParameterExpression::Sub(sub(a), sub(b)),
            ParameterExpression::Mul(a, b) => ParameterExpression::Mul(sub(a), sub(b)),
            ParameterExpression::Div(a, b) => ParameterExpression::Div(sub(a), sub(b)),
        }
    }

    /// Height of the expression tree; a constant, π or variable has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            ParameterExpression::Constant(_)
            | ParameterExpression::Symbol(_)
            | ParameterExpression::Pi => 1,
            ParameterExpression::Neg(e) => e.depth() + 1,
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.depth().max(b.depth()) + 1,
        }
    }

    /// Simplify the expression by evaluating constant subexpressions.
    ///
    /// Divisions by a zero constant are left in place so that evaluation can
    /// report them.
    pub fn simplify(&self) -> Self {
        if let Some(v) = self.as_f64() {
            return ParameterExpression::Constant(v);
        }
        match self {
            ParameterExpression::Neg(e) => {
                let e = e.simplify();
                match e.as_f64() {
                    Some(v) => ParameterExpression::Constant(-v),
                    None => ParameterExpression::Neg(Box::new(e)),
                }
            }
            ParameterExpression::Add(a, b) => {
                fold(a, b, |x, y| Some(x + y), ParameterExpression::Add)
            }
            ParameterExpression::Sub(a, b) => {
                fold(a, b, |x, y| Some(x - y), ParameterExpression::Sub)
            }
            ParameterExpression::Mul(a, b) => {
                fold(a, b, |x, y| Some(x * y), ParameterExpression::Mul)
            }
            ParameterExpression::Div(a, b) => fold(
                a,
                b,
                |x, y| (y != 0.0).then(|| x / y),
                ParameterExpression::Div,
            ),
            _ => self.clone(),
        }
    }
}

fn fold(
    a: &ParameterExpression,
    b: &ParameterExpression,
    op: impl Fn(f64, f64) -> Option<f64>,
    rebuild: fn(Box<ParameterExpression>, Box<ParameterExpression>) -> ParameterExpression,
) -> ParameterExpression {
    let a = a.simplify();
    let b = b.simplify();
    match (a.as_f64(), b.as_f64()) {
        (Some(av), Some(bv)) => match op(av, bv) {
            Some(v) => ParameterExpression::Constant(v),
            None => rebuild(Box::new(a), Box::new(b)),
        },
        _ => rebuild(Box::new(a), Box::new(b)),
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v:?}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "pi"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<i32> for ParameterExpression {
    fn from(value: i32) -> Self {
        ParameterExpression::Constant(f64::from(value))
    }
}

impl From<&str> for ParameterExpression {
    fn from(name: &str) -> Self {
        ParameterExpression::Symbol(name.to_string())
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}
