use crate::sim::catalog::{BuildingDefinition, BuildingKind, Output, definition};
use crate::sim::ledger::Production;
use std::collections::BTreeMap;

/// Energy capacity is this many times the hourly energy production.
const ENERGY_CAP_RATIO: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeCost {
    pub metal: u64,
    pub crystal: u64,
    pub time_secs: u64,
}

/// Price and build time to go from `level` to `level + 1`.
pub fn upgrade_cost(def: &BuildingDefinition, level: u32) -> UpgradeCost {
    let cost_scale = def.cost_factor.powi(level as i32);
    let time_scale = def.time_factor.powi(level as i32);
    UpgradeCost {
        metal: (def.base_metal_cost as f64 * cost_scale).floor() as u64,
        crystal: (def.base_crystal_cost as f64 * cost_scale).floor() as u64,
        time_secs: (def.base_time_secs as f64 * time_scale).floor() as u64,
    }
}

/// Hourly yield (or total capacity) of a building at `level`. The whole
/// value recomputes from the curve; it is not a running sum of per-level
/// increments. Level 0 yields nothing except for capacity buildings, whose
/// curve only starts compounding at level 1.
pub fn output_at(def: &BuildingDefinition, level: u32) -> u64 {
    match def.output {
        Output::Metal { base, factor }
        | Output::Crystal { base, factor }
        | Output::Energy { base, factor } => {
            (base as f64 * level as f64 * factor.powi(level as i32)).floor() as u64
        }
        Output::Capacity { base, factor } => {
            let exponent = level.max(1) - 1;
            (base as f64 * factor.powi(exponent as i32)).floor() as u64
        }
        Output::None => 0,
    }
}

/// Hourly energy draw of a building at `level`.
pub fn energy_use_at(def: &BuildingDefinition, level: u32) -> u64 {
    def.energy_per_level * level as u64
}

/// Derives the colony's hourly production rates and energy cap from its
/// building levels. Missing map entries count as level 0.
pub fn recalculate(levels: &BTreeMap<BuildingKind, u32>) -> (Production, f64) {
    let mut production = Production::default();
    for kind in BuildingKind::ALL {
        let def = definition(kind);
        let level = levels.get(&kind).copied().unwrap_or(0);
        let output = output_at(def, level);
        match def.output {
            Output::Metal { .. } => production.metal += output,
            Output::Crystal { .. } => production.crystal += output,
            Output::Energy { .. } => production.energy += output,
            Output::Capacity { .. } | Output::None => {}
        }
    }
    let energy_max = (production.energy * ENERGY_CAP_RATIO) as f64;
    (production, energy_max)
}

/// Total metal/crystal capacity granted by capacity buildings.
pub fn storage_capacity(levels: &BTreeMap<BuildingKind, u32>) -> u64 {
    BuildingKind::ALL
        .iter()
        .filter(|kind| matches!(definition(**kind).output, Output::Capacity { .. }))
        .map(|kind| output_at(definition(*kind), levels.get(kind).copied().unwrap_or(0)))
        .sum()
}
