//! Storage units — the read/write capability shared by both vessel modes.
//!
//! A loaded vessel stores resources as live [`PartResource`] fields; a
//! packed vessel stores them as [`ProtoResource`] snapshot nodes whose
//! numbers are text. Both implement [`StorageUnit`], and nothing above this
//! module needs to know which one it is holding.

use serde::{Deserialize, Serialize};

use crate::error::{LogisticsError, Result};
use crate::resource::ResourceId;
use crate::snapshot::{encode_amount, read_amount, ConfigNode, AMOUNT, MAX_AMOUNT, NAME};

/// A holder of one resource type with a current amount and fixed capacity.
pub trait StorageUnit {
    fn resource(&self) -> &ResourceId;

    fn amount(&self) -> Result<f64>;

    fn capacity(&self) -> Result<f64>;

    /// Overwrite the stored amount. Callers keep it within `[0, capacity]`.
    fn set_amount(&mut self, amount: f64);
}

/// A resource container on a loaded part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartResource {
    pub resource: ResourceId,
    pub amount: f64,
    pub max_amount: f64,
}

impl PartResource {
    pub fn new(resource: impl Into<ResourceId>, amount: f64, max_amount: f64) -> Self {
        Self {
            resource: resource.into(),
            amount,
            max_amount,
        }
    }
}

impl StorageUnit for PartResource {
    fn resource(&self) -> &ResourceId {
        &self.resource
    }

    fn amount(&self) -> Result<f64> {
        Ok(self.amount)
    }

    fn capacity(&self) -> Result<f64> {
        Ok(self.max_amount)
    }

    fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
    }
}

/// A resource container inside a packed part snapshot.
///
/// The node's `name` value always agrees with `resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProtoResource")]
pub struct ProtoResource {
    pub resource: ResourceId,
    pub values: ConfigNode,
}

impl ProtoResource {
    /// Snapshot node named `RESOURCE` with encoded `amount`/`maxAmount`.
    pub fn new(resource: impl Into<ResourceId>, amount: f64, max_amount: f64) -> Self {
        let resource = resource.into();
        let values = ConfigNode::new("RESOURCE")
            .with_value(NAME, resource.name())
            .with_value(AMOUNT, encode_amount(amount))
            .with_value(MAX_AMOUNT, encode_amount(max_amount));
        Self { resource, values }
    }

    /// Wrap an existing node. Amount values are checked lazily on read.
    ///
    /// A node without a `name` value gets one; a node whose `name` names a
    /// different resource is rejected.
    pub fn from_node(resource: impl Into<ResourceId>, mut values: ConfigNode) -> Result<Self> {
        let resource = resource.into();
        match values.get_value(NAME).map(str::to_owned) {
            Some(found) if found != resource.name() => {
                return Err(LogisticsError::SnapshotNameMismatch {
                    expected: resource,
                    found,
                });
            }
            Some(_) => {}
            None => values.set_value(NAME, resource.name()),
        }
        Ok(Self { resource, values })
    }
}

#[derive(Deserialize)]
struct RawProtoResource {
    resource: ResourceId,
    values: ConfigNode,
}

impl TryFrom<RawProtoResource> for ProtoResource {
    type Error = LogisticsError;

    fn try_from(raw: RawProtoResource) -> Result<Self> {
        Self::from_node(raw.resource, raw.values)
    }
}

impl StorageUnit for ProtoResource {
    fn resource(&self) -> &ResourceId {
        &self.resource
    }

    fn amount(&self) -> Result<f64> {
        read_amount(&self.values, &self.resource, AMOUNT)
    }

    fn capacity(&self) -> Result<f64> {
        read_amount(&self.values, &self.resource, MAX_AMOUNT)
    }

    fn set_amount(&mut self, amount: f64) {
        self.values.set_value(AMOUNT, encode_amount(amount));
    }
}
