use crate::sim::catalog::{BuildingKind, definition};
use crate::sim::colony::ColonyState;
use crate::sim::economy::{self, UpgradeCost};
use crate::sim::queue;
use thiserror::Error;

/// Why an upgrade cannot start right now. Not a fault, just the reason shown
/// to the player; the check order below is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpgradeBlock {
    #[error("requires {required} level {level}")]
    Prerequisite { required: BuildingKind, level: u32 },
    #[error("already under construction")]
    InQueue,
    #[error("not enough metal ({needed} needed)")]
    InsufficientMetal { needed: u64 },
    #[error("not enough crystal ({needed} needed)")]
    InsufficientCrystal { needed: u64 },
}

/// Gate for starting an upgrade. Checks run in a fixed order so the first
/// failure is the one surfaced: prerequisites (in declared order), queue
/// occupancy, metal, crystal.
pub fn evaluate(state: &ColonyState, kind: BuildingKind) -> Result<UpgradeCost, UpgradeBlock> {
    let def = definition(kind);
    let cost = economy::upgrade_cost(def, state.level(kind));
    for &(required, level) in def.requires {
        if state.level(required) < level {
            return Err(UpgradeBlock::Prerequisite { required, level });
        }
    }
    if queue::contains(&state.queue, kind) {
        return Err(UpgradeBlock::InQueue);
    }
    if state.resources.metal < cost.metal as f64 {
        return Err(UpgradeBlock::InsufficientMetal { needed: cost.metal });
    }
    if state.resources.crystal < cost.crystal as f64 {
        return Err(UpgradeBlock::InsufficientCrystal {
            needed: cost.crystal,
        });
    }
    Ok(cost)
}
