//! Variable bindings consumed when symbolic parameters are made concrete.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// A mapping from free-variable name to numeric value.
///
/// Bindings may contain names that no expression references; only missing
/// names are an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableBindings {
    values: FxHashMap<String, f64>,
}

impl VariableBindings {
    /// Create an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a binding, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Check whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Verify that every name in `required` is bound.
    ///
    /// Reports the first missing name in iteration order, so callers that pass
    /// a sorted set get a deterministic error.
    pub fn check_complete<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> IrResult<()> {
        match required.into_iter().find(|name| !self.contains(name)) {
            Some(missing) => Err(IrError::UnboundParameter(missing.to_string())),
            None => Ok(()),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for VariableBindings {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, f64)> for VariableBindings {
    fn extend<I: IntoIterator<Item = (K, f64)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.values.insert(k.into(), v);
        }
    }
}
