//! Symbolic gate parameters.
//!
//! Variational circuits are built with free symbols (`alpha`, `beta`, `w_3`,
//! ...) and bound to numbers just before simulation. Only the affine form
//! `scale * symbol` is needed by the ansatz builders, so that is all a
//! [`ParameterExpression`] can hold.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A gate angle: a number, or a scaled free symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A bound numeric value.
    Value(f64),
    /// `scale * name`, unbound until a [`ParameterBinding`] supplies `name`.
    Symbol { name: String, scale: f64 },
}

impl ParameterExpression {
    /// A numeric parameter.
    pub fn value(value: f64) -> Self {
        ParameterExpression::Value(value)
    }

    /// A free symbol with unit scale.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol {
            name: name.into(),
            scale: 1.0,
        }
    }

    /// Multiply the expression by a constant.
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            ParameterExpression::Value(v) => ParameterExpression::Value(v * factor),
            ParameterExpression::Symbol { name, scale } => ParameterExpression::Symbol {
                name,
                scale: scale * factor,
            },
        }
    }

    /// The numeric value, if bound.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Value(v) => Some(*v),
            ParameterExpression::Symbol { .. } => None,
        }
    }

    /// The free symbol, if any.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            ParameterExpression::Value(_) => None,
            ParameterExpression::Symbol { name, .. } => Some(name),
        }
    }

    /// True while the expression still references a free symbol.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, ParameterExpression::Symbol { .. })
    }

    /// Substitute the symbol if the binding provides it.
    ///
    /// Symbols missing from `binding` stay free; callers that need a fully
    /// numeric circuit check [`crate::Circuit::parameters`] afterwards.
    pub fn bind(&self, binding: &ParameterBinding) -> Self {
        match self {
            ParameterExpression::Symbol { name, scale } => match binding.get(name) {
                Some(v) => ParameterExpression::Value(scale * v),
                None => self.clone(),
            },
            ParameterExpression::Value(_) => self.clone(),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Value(value)
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Value(v) => write!(f, "{v}"),
            ParameterExpression::Symbol { name, scale } if *scale == 1.0 => write!(f, "{name}"),
            ParameterExpression::Symbol { name, scale } => write!(f, "{scale}*{name}"),
        }
    }
}

/// Numeric values for free symbols.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBinding {
    values: FxHashMap<String, f64>,
}

impl ParameterBinding {
    /// Create an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `name` to `value`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// The value bound to `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of bound symbols.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ParameterBinding {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut binding = ParameterBinding::new();
        for (name, value) in iter {
            binding.insert(name, value);
        }
        binding
    }
}
