//! Vessel adapter — parts, snapshots and the two representation modes.
//!
//! A vessel is either loaded (live parts with mutable resource fields and
//! converter modules) or packed (a snapshot of part resource nodes). The
//! mode is fixed input for the logistics core; it reads and writes through
//! [`StorageUnit`] and never switches a vessel between modes.

use serde::{Deserialize, Serialize};

use crate::production::Converter;
use crate::resource::ResourceId;
use crate::storage::{PartResource, ProtoResource, StorageUnit};

/// Stable vessel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselId(pub u32);

/// A live part on a loaded vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    #[serde(default)]
    pub resources: Vec<PartResource>,
    #[serde(default)]
    pub converters: Vec<Converter>,
    /// Efficiency rate reported by the part's colony module (staffing,
    /// power). Applied to every converter on the part.
    #[serde(default = "default_efficiency")]
    pub efficiency_rate: f64,
}

fn default_efficiency() -> f64 {
    1.0
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
            converters: Vec::new(),
            efficiency_rate: default_efficiency(),
        }
    }

    pub fn with_resource(mut self, resource: PartResource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn with_efficiency(mut self, rate: f64) -> Self {
        self.efficiency_rate = rate;
        self
    }
}

/// A part as stored in a packed vessel snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtoPart {
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ProtoResource>,
}

/// Representation mode of a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VesselState {
    Loaded { parts: Vec<Part> },
    Packed { parts: Vec<ProtoPart> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
    #[serde(flatten)]
    pub state: VesselState,
}

impl Vessel {
    pub fn loaded(id: u32, name: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            id: VesselId(id),
            name: name.into(),
            state: VesselState::Loaded { parts },
        }
    }

    pub fn packed(id: u32, name: impl Into<String>, parts: Vec<ProtoPart>) -> Self {
        Self {
            id: VesselId(id),
            name: name.into(),
            state: VesselState::Packed { parts },
        }
    }

    pub fn is_dormant(&self) -> bool {
        matches!(self.state, VesselState::Packed { .. })
    }

    /// Every storage unit in part order, then resource order within a part.
    pub fn storage_units(&self) -> Vec<&dyn StorageUnit> {
        match &self.state {
            VesselState::Loaded { parts } => parts
                .iter()
                .flat_map(|p| p.resources.iter())
                .map(|r| r as &dyn StorageUnit)
                .collect(),
            VesselState::Packed { parts } => parts
                .iter()
                .flat_map(|p| p.resources.iter())
                .map(|r| r as &dyn StorageUnit)
                .collect(),
        }
    }

    /// Mutable storage units holding `resource`, in the same order as
    /// [`Vessel::storage_units`].
    pub fn storage_units_mut(&mut self, resource: &ResourceId) -> Vec<&mut dyn StorageUnit> {
        match &mut self.state {
            VesselState::Loaded { parts } => parts
                .iter_mut()
                .flat_map(|p| p.resources.iter_mut())
                .filter(|r| &r.resource == resource)
                .map(|r| r as &mut dyn StorageUnit)
                .collect(),
            VesselState::Packed { parts } => parts
                .iter_mut()
                .flat_map(|p| p.resources.iter_mut())
                .filter(|r| &r.resource == resource)
                .map(|r| r as &mut dyn StorageUnit)
                .collect(),
        }
    }

    /// Live parts. Packed vessels have none.
    pub fn parts(&self) -> &[Part] {
        match &self.state {
            VesselState::Loaded { parts } => parts,
            VesselState::Packed { .. } => &[],
        }
    }

    /// Converter modules with their owning part.
    pub fn converters(&self) -> impl Iterator<Item = (&Part, &Converter)> {
        self.parts()
            .iter()
            .flat_map(|part| part.converters.iter().map(move |c| (part, c)))
    }

    /// Snapshot of a loaded vessel as it would be stored while packed.
    /// Packed vessels are returned unchanged.
    pub fn to_packed(&self) -> Vessel {
        let parts = match &self.state {
            VesselState::Loaded { parts } => parts
                .iter()
                .map(|p| ProtoPart {
                    name: p.name.clone(),
                    resources: p
                        .resources
                        .iter()
                        .map(|r| ProtoResource::new(r.resource.clone(), r.amount, r.max_amount))
                        .collect(),
                })
                .collect(),
            VesselState::Packed { parts } => parts.clone(),
        };
        Vessel {
            id: self.id,
            name: self.name.clone(),
            state: VesselState::Packed { parts },
        }
    }
}
