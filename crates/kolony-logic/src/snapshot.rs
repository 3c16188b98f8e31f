//! Dormant vessel snapshots — hierarchical name/value nodes.
//!
//! A packed vessel stores each part's resources as a node of text values.
//! The logistics core reads `amount` and `maxAmount` and only ever writes
//! `amount` back. Numbers cross this boundary through [`encode_amount`] and
//! [`decode_amount`] so every call site agrees on the text format.

use serde::{Deserialize, Serialize};

use crate::error::{LogisticsError, Result};
use crate::resource::ResourceId;

/// Value name holding the resource's name.
pub const NAME: &str = "name";
/// Value name holding the stored quantity.
pub const AMOUNT: &str = "amount";
/// Value name holding the unit capacity.
pub const MAX_AMOUNT: &str = "maxAmount";

/// One named value inside a [`ConfigNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub name: String,
    pub value: String,
}

/// A named node holding text values and child nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    pub name: String,
    #[serde(default)]
    pub values: Vec<ConfigValue>,
    #[serde(default)]
    pub nodes: Vec<ConfigNode>,
}

impl ConfigNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style value insertion.
    pub fn with_value(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_value(name, value);
        self
    }

    /// First value with the given name.
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }

    /// Replace the first value with this name, or append a new one.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|v| v.name == name) {
            Some(existing) => existing.value = value,
            None => self.values.push(ConfigValue {
                name: name.to_string(),
                value,
            }),
        }
    }
}

/// Encode a quantity as the decimal text stored in snapshots.
///
/// Uses the shortest representation that parses back to the same `f64`.
/// Both zeros encode as `"0"`.
pub fn encode_amount(amount: f64) -> String {
    if amount == 0.0 {
        return "0".to_string();
    }
    format!("{amount}")
}

/// Decode snapshot text into a finite quantity. Surrounding whitespace is
/// ignored; anything else that is not a finite number yields `None`.
pub fn decode_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read and decode a numeric field of a resource node.
pub fn read_amount(node: &ConfigNode, resource: &ResourceId, field: &str) -> Result<f64> {
    let raw = node.get_value(field);
    raw.and_then(decode_amount)
        .ok_or_else(|| LogisticsError::MalformedSnapshot {
            resource: resource.clone(),
            field: field.to_string(),
            value: raw.map(str::to_string),
        })
}
