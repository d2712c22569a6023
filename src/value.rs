//! Config values and evaluation contexts.
//!
//! Values are treated as opaque JSON blobs everywhere except inside the evaluator's
//! numeric comparators, which perform the only runtime type checks in the crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// An arbitrary JSON value: null, boolean, number, string, array, or object.
pub type Value = Json;

/// A literal comparand, wrapped so the wire format can later admit non-literal
/// comparands (references, computed values) without a breaking change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    #[serde(rename = "type")]
    pub kind: LiteralKind,
    pub value: Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Literal,
}

impl Literal {
    pub fn new(value: impl Into<Json>) -> Self {
        Self {
            kind: LiteralKind::Literal,
            value: value.into(),
        }
    }
}

/// A single scalar attribute value in a [`Context`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl ContextValue {
    /// Numeric view used by the evaluator's ordering comparators. Returns `None` for
    /// non-numeric values or non-finite numbers — callers treat `None` as "does not
    /// match", never as an error.
    pub fn as_finite_f64(&self) -> Option<f64> {
        match self {
            ContextValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Equality against a JSON literal, per the `equals`/`in` condition semantics.
    /// Numeric comparisons go through `f64` on both sides so `10` and `10.0` compare
    /// equal regardless of which `serde_json::Number` variant either side parsed into
    /// (`serde_json::Value`'s own `PartialEq` distinguishes the int/float
    /// representations, which would otherwise make `equals` reject equivalent numbers).
    /// Falls back to exact JSON equality for non-numeric types.
    pub fn equals_literal(&self, literal: &Json) -> bool {
        match (self.as_finite_f64(), literal.as_f64().filter(|n| n.is_finite())) {
            (Some(a), Some(b)) => a == b,
            _ => &self.to_json() == literal,
        }
    }

    fn to_json(&self) -> Json {
        match self {
            ContextValue::String(s) => Json::String(s.clone()),
            ContextValue::Number(n) => {
                serde_json::Number::from_f64(*n).map(Json::Number).unwrap_or(Json::Null)
            }
            ContextValue::Bool(b) => Json::Bool(*b),
            ContextValue::Null => Json::Null,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::String(s)
    }
}

impl From<f64> for ContextValue {
    fn from(n: f64) -> Self {
        ContextValue::Number(n)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

/// A flat attribute bag an override condition is evaluated against. `BTreeMap` keeps
/// merge order deterministic, which matters for snapshot serialization and logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context(pub BTreeMap<String, ContextValue>);

impl Context {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges `overlay` over `self`, with overlay keys winning. Used to combine client
    /// scope context with a per-call context.
    pub fn merged_with(&self, overlay: Option<&Context>) -> Context {
        let mut merged = self.clone();
        if let Some(overlay) = overlay {
            for (k, v) in &overlay.0 {
                merged.0.insert(k.clone(), v.clone());
            }
        }
        merged
    }
}

impl FromIterator<(String, ContextValue)> for Context {
    fn from_iter<T: IntoIterator<Item = (String, ContextValue)>>(iter: T) -> Self {
        Self(BTreeMap::from_iter(iter))
    }
}
