//! Resource identity and the amount record every other module passes around.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a resource type.
///
/// Resources are keyed by name. Dormant snapshots only carry the resource
/// name, and numeric catalog ids are not stable across a catalog reload, so
/// the name is the one key both representations agree on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ResourceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A resource identity paired with a quantity.
///
/// The amount is non-negative for stock and capacity reads; balances reuse
/// the same record with a signed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub resource: ResourceId,
    pub amount: f64,
}

impl ResourceRecord {
    pub fn new(resource: impl Into<ResourceId>, amount: f64) -> Self {
        Self {
            resource: resource.into(),
            amount,
        }
    }
}
