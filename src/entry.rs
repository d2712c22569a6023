//! Config entries and overrides — the Store's unit of data.

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::value::Value;

/// A single named config: a base value plus a priority-ordered override list.
///
/// Field names match the wire shape (`{ name, value, overrides }`) exactly, so a
/// `ConfigEntry` serializes identically whether it came from the initial load, a live
/// delivery, or a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    pub value: Value,
    #[serde(default)]
    pub overrides: Vec<Override>,
}

impl ConfigEntry {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            overrides: Vec::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: Vec<Override>) -> Self {
        self.overrides = overrides;
        self
    }
}

/// A conditional replacement for a config's base value. `name` is a display label only
/// — it carries no semantics and is used solely for logging. `conditions` is a
/// conjunction: all must hold for the override to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub value: Value,
}

impl Override {
    pub fn new(name: impl Into<String>, conditions: Vec<Condition>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            conditions,
            value: value.into(),
        }
    }
}
