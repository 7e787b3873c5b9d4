use serde::{Deserialize, Serialize};
use std::fmt;

/// Every structure the colony can raise. Order matches the roster shown to
/// the player and the `DEFINITIONS` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    MetalMine,
    CrystalMine,
    SolarPlant,
    Storage,
    Shipyard,
    ResearchLab,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 6] = [
        BuildingKind::MetalMine,
        BuildingKind::CrystalMine,
        BuildingKind::SolarPlant,
        BuildingKind::Storage,
        BuildingKind::Shipyard,
        BuildingKind::ResearchLab,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BuildingKind::MetalMine => "Metal Mine",
            BuildingKind::CrystalMine => "Crystal Mine",
            BuildingKind::SolarPlant => "Solar Plant",
            BuildingKind::Storage => "Storage Depot",
            BuildingKind::Shipyard => "Shipyard",
            BuildingKind::ResearchLab => "Research Lab",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BuildingKind::MetalMine => {
                "Mine metal from nearby asteroids. Each level increases metal production."
            }
            BuildingKind::CrystalMine => {
                "Extract rare energy crystals. Essential for advanced technology."
            }
            BuildingKind::SolarPlant => "Harvest energy from the sun. Powers all your buildings.",
            BuildingKind::Storage => "Store resources. Increases resource storage capacity.",
            BuildingKind::Shipyard => "Build warships and transports.",
            BuildingKind::ResearchLab => "Research new technologies.",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a building contributes once built. Production curves are hourly
/// yields recomputed from scratch at each level; capacity follows its own
/// curve that starts compounding at level 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Output {
    Metal { base: u64, factor: f64 },
    Crystal { base: u64, factor: f64 },
    Energy { base: u64, factor: f64 },
    Capacity { base: u64, factor: f64 },
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct BuildingDefinition {
    pub kind: BuildingKind,
    pub base_metal_cost: u64,
    pub base_crystal_cost: u64,
    pub base_time_secs: u64,
    pub cost_factor: f64,
    pub time_factor: f64,
    pub energy_per_level: u64,
    pub output: Output,
    /// Minimum levels of other buildings, checked in declared order.
    pub requires: &'static [(BuildingKind, u32)],
}

/// Tuning table for the whole colony. All growth factors are > 1 so costs,
/// build times and yields strictly increase with level.
const DEFINITIONS: [BuildingDefinition; 6] = [
    BuildingDefinition {
        kind: BuildingKind::MetalMine,
        base_metal_cost: 60,
        base_crystal_cost: 15,
        base_time_secs: 20,
        cost_factor: 1.5,
        time_factor: 1.5,
        energy_per_level: 10,
        output: Output::Metal {
            base: 30,
            factor: 1.1,
        },
        requires: &[],
    },
    BuildingDefinition {
        kind: BuildingKind::CrystalMine,
        base_metal_cost: 48,
        base_crystal_cost: 24,
        base_time_secs: 25,
        cost_factor: 1.6,
        time_factor: 1.5,
        energy_per_level: 10,
        output: Output::Crystal {
            base: 20,
            factor: 1.1,
        },
        requires: &[],
    },
    BuildingDefinition {
        kind: BuildingKind::SolarPlant,
        base_metal_cost: 75,
        base_crystal_cost: 30,
        base_time_secs: 30,
        cost_factor: 1.5,
        time_factor: 1.5,
        energy_per_level: 0,
        output: Output::Energy {
            base: 20,
            factor: 1.1,
        },
        requires: &[],
    },
    BuildingDefinition {
        kind: BuildingKind::Storage,
        base_metal_cost: 100,
        base_crystal_cost: 50,
        base_time_secs: 40,
        cost_factor: 2.0,
        time_factor: 1.5,
        energy_per_level: 0,
        output: Output::Capacity {
            base: 10_000,
            factor: 2.0,
        },
        requires: &[],
    },
    BuildingDefinition {
        kind: BuildingKind::Shipyard,
        base_metal_cost: 400,
        base_crystal_cost: 200,
        base_time_secs: 120,
        cost_factor: 2.0,
        time_factor: 2.0,
        energy_per_level: 50,
        output: Output::None,
        requires: &[(BuildingKind::MetalMine, 2)],
    },
    BuildingDefinition {
        kind: BuildingKind::ResearchLab,
        base_metal_cost: 200,
        base_crystal_cost: 400,
        base_time_secs: 180,
        cost_factor: 2.0,
        time_factor: 2.0,
        energy_per_level: 30,
        output: Output::None,
        requires: &[(BuildingKind::CrystalMine, 3)],
    },
];

pub fn definition(kind: BuildingKind) -> &'static BuildingDefinition {
    &DEFINITIONS[kind as usize]
}
