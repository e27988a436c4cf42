use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Resource, StructureKind};

/// Card counts per resource kind, in [`Resource::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceHand {
    counts: [u32; Resource::ALL.len()],
}

impl ResourceHand {
    pub const fn from_counts(counts: [u32; 5]) -> Self {
        Self { counts }
    }

    pub const fn zero() -> Self {
        Self {
            counts: [0; Resource::ALL.len()],
        }
    }

    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::zero();
        hand.add(resource, amount);
        hand
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn get(&self, resource: Resource) -> u32 {
        self.counts[resource_index(resource)]
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        let idx = resource_index(resource);
        self.counts[idx] = self.counts[idx].saturating_add(amount);
    }

    pub fn add_hand(&mut self, other: &ResourceHand) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine = mine.saturating_add(theirs);
        }
    }

    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        self.counts
            .iter()
            .zip(cost.counts.iter())
            .all(|(have, need)| have >= need)
    }

    /// Removes `cost` entirely or not at all.
    pub fn spend(&mut self, cost: &ResourceHand) -> Result<(), ResourceError> {
        if let Some((resource, available, requested)) = self.first_shortfall(cost) {
            return Err(ResourceError::Insufficient {
                resource,
                available,
                requested,
            });
        }
        for (mine, need) in self.counts.iter_mut().zip(cost.counts) {
            *mine -= need;
        }
        Ok(())
    }

    fn first_shortfall(&self, cost: &ResourceHand) -> Option<(Resource, u32, u32)> {
        self.iter()
            .zip(cost.counts)
            .find(|((_, have), need)| have < need)
            .map(|((resource, have), need)| (resource, have, need))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&value| value == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL.into_iter().zip(self.counts.iter().copied())
    }

    pub fn counts(&self) -> [u32; Resource::ALL.len()] {
        self.counts
    }
}

/// Full breakdown, e.g. `Wood:1 Brick:0 Wheat:2 Sheep:0 Ore:0 (Total:3)`.
impl fmt::Display for ResourceHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (resource, amount) in self.iter() {
            write!(f, "{resource}:{amount} ")?;
        }
        write!(f, "(Total:{})", self.total())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("insufficient {resource}: have {available}, need {requested}")]
    Insufficient {
        resource: Resource,
        available: u32,
        requested: u32,
    },
}

const fn resource_index(resource: Resource) -> usize {
    match resource {
        Resource::Wood => 0,
        Resource::Brick => 1,
        Resource::Wheat => 2,
        Resource::Sheep => 3,
        Resource::Ore => 4,
    }
}

pub const COST_ROAD: ResourceHand = ResourceHand::from_counts([1, 1, 0, 0, 0]);
pub const COST_SETTLEMENT: ResourceHand = ResourceHand::from_counts([1, 1, 1, 1, 0]);
pub const COST_CITY: ResourceHand = ResourceHand::from_counts([0, 0, 2, 0, 3]);

pub const fn cost_of(kind: StructureKind) -> &'static ResourceHand {
    match kind {
        StructureKind::Road => &COST_ROAD,
        StructureKind::Settlement => &COST_SETTLEMENT,
        StructureKind::City => &COST_CITY,
    }
}
