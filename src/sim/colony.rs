use crate::sim::catalog::{self, BuildingKind};
use crate::sim::economy::{self, UpgradeCost};
use crate::sim::eligibility::{self, UpgradeBlock};
use crate::sim::ledger::{Production, Resources};
use crate::sim::offline::{self, OfflineReport};
use crate::sim::queue::{Completed, ConstructionItem};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

const MAX_MESSAGES: usize = 8;

/// Whether metal/crystal stockpiles are clamped to depot capacity. Energy is
/// capped either way. Runtime knob, not part of the saved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageCapPolicy {
    #[default]
    Uncapped,
    CapToStorage,
}

/// The persisted root. `resources` and `buildings` are required in a
/// snapshot; everything else falls back to defaults so older saves and saves
/// predating newer building kinds keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyState {
    pub resources: Resources,
    #[serde(default)]
    pub production: Production,
    pub buildings: BTreeMap<BuildingKind, u32>,
    #[serde(default)]
    pub queue: Vec<ConstructionItem>,
    #[serde(default)]
    pub last_save_ms: u64,
}

impl Default for ColonyState {
    fn default() -> Self {
        let mut buildings = BTreeMap::new();
        buildings.insert(BuildingKind::MetalMine, 2);
        buildings.insert(BuildingKind::CrystalMine, 1);
        buildings.insert(BuildingKind::SolarPlant, 2);
        buildings.insert(BuildingKind::Storage, 1);
        buildings.insert(BuildingKind::Shipyard, 0);
        buildings.insert(BuildingKind::ResearchLab, 0);
        Self {
            resources: Resources {
                metal: 500.0,
                crystal: 300.0,
                energy: 200.0,
                energy_max: 1_000.0,
            },
            production: Production {
                metal: 120,
                crystal: 60,
                energy: 200,
            },
            buildings,
            queue: Vec::new(),
            last_save_ms: 0,
        }
    }
}

impl ColonyState {
    pub fn level(&self, kind: BuildingKind) -> u32 {
        self.buildings.get(&kind).copied().unwrap_or(0)
    }
}

/// Everything the shell needs to render one roster entry.
#[derive(Debug, Clone)]
pub struct BuildingView {
    pub kind: BuildingKind,
    pub level: u32,
    pub cost: UpgradeCost,
    pub output_now: u64,
    pub output_next: u64,
    pub energy_use_next: u64,
    pub block: Option<UpgradeBlock>,
}

/// Owns one colony's timeline. All mutation goes through `advance`,
/// `start_upgrade` and `reconcile_offline`; independent instances never
/// share state.
pub struct Colony {
    pub state: ColonyState,
    cap_policy: StorageCapPolicy,
    messages: VecDeque<String>,
}

impl Colony {
    pub fn fresh() -> Self {
        Self::from_state(ColonyState::default())
    }

    /// Adopts a loaded snapshot. Production and the energy cap are derived
    /// data and recomputed from the levels; callers that intend to reconcile
    /// an offline gap must read the saved rates before calling this.
    pub fn from_state(mut state: ColonyState) -> Self {
        for item in &mut state.queue {
            item.remaining_secs = item.remaining_secs.clamp(0.0, item.total_secs as f64);
        }
        let mut colony = Self {
            state,
            cap_policy: StorageCapPolicy::default(),
            messages: VecDeque::with_capacity(MAX_MESSAGES),
        };
        colony.recompute_production();
        colony
    }

    /// Steady-state tick: accrue resources for `delta_secs`, then advance
    /// every queued upgrade concurrently. Completions are applied in queue
    /// order and reported back.
    pub fn advance(&mut self, delta_secs: f64) -> Vec<Completed> {
        if delta_secs <= 0.0 {
            return Vec::new();
        }
        let cap = self.metal_crystal_cap();
        self.state
            .resources
            .accrue(&self.state.production, delta_secs, cap);
        let completed = self.advance_queue(delta_secs);
        for done in &completed {
            self.push_message(format!(
                "{} construction complete (level {}).",
                done.building.label(),
                done.level
            ));
        }
        completed
    }

    /// One-shot catch-up for a gap of `elapsed_secs` since the snapshot was
    /// taken. Accrual uses `rates_at_save`, the rates recorded with the
    /// snapshot, not the freshly recomputed ones; the queue advances by the
    /// whole gap in a single subtraction, so every item that ran out
    /// completes now rather than at its true moment inside the gap. The
    /// report is the caller's to narrate; nothing is pushed to the event log.
    pub fn reconcile_offline(
        &mut self,
        elapsed_secs: f64,
        rates_at_save: Production,
    ) -> Option<OfflineReport> {
        if elapsed_secs < offline::MIN_GAP_SECS {
            return None;
        }
        let energy_before = self.state.resources.energy;
        let cap = self.metal_crystal_cap();
        self.state
            .resources
            .accrue(&rates_at_save, elapsed_secs, cap);
        let energy_gained = (self.state.resources.energy - energy_before).max(0.0);
        let completed = self.advance_queue(elapsed_secs);
        Some(OfflineReport {
            elapsed_secs,
            metal_gained: offline::accrual_gain(rates_at_save.metal, elapsed_secs),
            crystal_gained: offline::accrual_gain(rates_at_save.crystal, elapsed_secs),
            energy_gained: energy_gained.floor() as u64,
            completed,
        })
    }

    /// Re-validates eligibility (the request may be stale), then deducts the
    /// cost and enqueues in one step. Returns false and changes nothing when
    /// the upgrade is blocked.
    pub fn start_upgrade(&mut self, kind: BuildingKind, now_ms: u64) -> bool {
        let cost = match eligibility::evaluate(&self.state, kind) {
            Ok(cost) => cost,
            Err(block) => {
                self.push_message(format!("{}: {block}.", kind.label()));
                return false;
            }
        };
        let level = self.state.level(kind);
        self.state.resources.metal -= cost.metal as f64;
        self.state.resources.crystal -= cost.crystal as f64;
        self.state
            .queue
            .push(ConstructionItem::new(kind, level, cost.time_secs, now_ms));
        self.push_message(format!(
            "{} upgrading to level {} ({} s).",
            kind.label(),
            level + 1,
            cost.time_secs
        ));
        true
    }

    pub fn can_upgrade(&self, kind: BuildingKind) -> Result<UpgradeCost, UpgradeBlock> {
        eligibility::evaluate(&self.state, kind)
    }

    pub fn building_view(&self, kind: BuildingKind) -> BuildingView {
        let def = catalog::definition(kind);
        let level = self.state.level(kind);
        BuildingView {
            kind,
            level,
            cost: economy::upgrade_cost(def, level),
            output_now: economy::output_at(def, level),
            output_next: economy::output_at(def, level + 1),
            energy_use_next: economy::energy_use_at(def, level + 1),
            block: self.can_upgrade(kind).err(),
        }
    }

    pub fn building_views(&self) -> Vec<BuildingView> {
        BuildingKind::ALL
            .iter()
            .map(|kind| self.building_view(*kind))
            .collect()
    }

    /// Point-in-time copy of the state for persistence or export.
    pub fn snapshot(&self, now_ms: u64) -> ColonyState {
        let mut snapshot = self.state.clone();
        snapshot.last_save_ms = now_ms;
        snapshot
    }

    pub fn storage_capacity(&self) -> u64 {
        economy::storage_capacity(&self.state.buildings)
    }

    pub fn cap_policy(&self) -> StorageCapPolicy {
        self.cap_policy
    }

    pub fn set_cap_policy(&mut self, policy: StorageCapPolicy) {
        self.cap_policy = policy;
    }

    pub fn messages(&self) -> impl Iterator<Item = &String> {
        self.messages.iter()
    }

    pub fn add_message<S: Into<String>>(&mut self, message: S) {
        self.push_message(message.into());
    }

    fn metal_crystal_cap(&self) -> Option<f64> {
        match self.cap_policy {
            StorageCapPolicy::Uncapped => None,
            StorageCapPolicy::CapToStorage => Some(self.storage_capacity() as f64),
        }
    }

    fn advance_queue(&mut self, delta_secs: f64) -> Vec<Completed> {
        let mut completed = Vec::new();
        let mut index = 0;
        while index < self.state.queue.len() {
            if self.state.queue[index].tick(delta_secs) {
                let item = self.state.queue.remove(index);
                self.state.buildings.insert(item.building, item.to_level);
                self.recompute_production();
                completed.push(Completed {
                    building: item.building,
                    level: item.to_level,
                });
            } else {
                index += 1;
            }
        }
        completed
    }

    fn recompute_production(&mut self) {
        let (production, energy_max) = economy::recalculate(&self.state.buildings);
        self.state.production = production;
        self.state.resources.energy_max = energy_max;
    }

    fn push_message(&mut self, message: String) {
        if self.messages.len() >= MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_colony_derives_production_from_levels() {
        let colony = Colony::fresh();
        assert_eq!(colony.state.production.metal, 72);
        assert_eq!(colony.state.production.crystal, 22);
        assert_eq!(colony.state.production.energy, 48);
        assert_eq!(colony.state.resources.energy_max, 480.0);
    }

    #[test]
    fn start_upgrade_deducts_cost_and_enqueues_once() {
        let mut colony = Colony::fresh();
        assert!(colony.start_upgrade(BuildingKind::MetalMine, 7_000));

        assert_eq!(colony.state.resources.metal, 365.0);
        assert_eq!(colony.state.resources.crystal, 267.0);
        assert_eq!(colony.state.queue.len(), 1);
        let item = &colony.state.queue[0];
        assert_eq!(item.building, BuildingKind::MetalMine);
        assert_eq!(item.from_level, 2);
        assert_eq!(item.to_level, 3);
        assert_eq!(item.total_secs, 45);
        assert_eq!(item.remaining_secs, 45.0);
        assert_eq!(item.started_ms, 7_000);
    }

    #[test]
    fn blocked_upgrade_changes_nothing() {
        let mut colony = Colony::fresh();
        colony.state.resources.metal = 10.0;
        let before = colony.state.clone();

        assert!(!colony.start_upgrade(BuildingKind::MetalMine, 0));
        assert_eq!(colony.state, before);
    }

    #[test]
    fn second_upgrade_of_same_building_is_rejected() {
        let mut colony = Colony::fresh();
        colony.state.resources.metal = 10_000.0;
        colony.state.resources.crystal = 10_000.0;
        assert!(colony.start_upgrade(BuildingKind::MetalMine, 0));
        assert!(!colony.start_upgrade(BuildingKind::MetalMine, 0));
        assert_eq!(colony.state.queue.len(), 1);
    }

    #[test]
    fn advance_completes_the_upgrade_and_recomputes_rates() {
        let mut colony = Colony::fresh();
        assert!(colony.start_upgrade(BuildingKind::MetalMine, 0));

        let completed = colony.advance(45.0);
        assert_eq!(
            completed,
            vec![Completed {
                building: BuildingKind::MetalMine,
                level: 3,
            }]
        );
        assert_eq!(colony.state.level(BuildingKind::MetalMine), 3);
        assert!(colony.state.queue.is_empty());
        assert_eq!(colony.state.production.metal, 119);
    }

    #[test]
    fn many_small_ticks_match_one_large_tick() {
        let mut colony = Colony::fresh();
        assert!(colony.start_upgrade(BuildingKind::MetalMine, 0));
        let mut completed = Vec::new();
        for _ in 0..45 {
            completed.extend(colony.advance(1.0));
        }
        assert_eq!(completed.len(), 1);
        assert_eq!(colony.state.level(BuildingKind::MetalMine), 3);
        assert!(colony.state.queue.is_empty());
    }

    #[test]
    fn advance_zero_is_a_no_op() {
        let mut colony = Colony::fresh();
        assert!(colony.start_upgrade(BuildingKind::SolarPlant, 0));
        let before = colony.state.clone();
        assert!(colony.advance(0.0).is_empty());
        assert_eq!(colony.state, before);
    }

    #[test]
    fn simultaneous_completions_apply_in_queue_order() {
        let mut colony = Colony::fresh();
        colony.state.resources.metal = 10_000.0;
        colony.state.resources.crystal = 10_000.0;
        assert!(colony.start_upgrade(BuildingKind::SolarPlant, 0));
        assert!(colony.start_upgrade(BuildingKind::MetalMine, 0));

        // Solar plant needs 67 s, metal mine 45 s; one tick covers both.
        let completed = colony.advance(100.0);
        assert_eq!(
            completed,
            vec![
                Completed {
                    building: BuildingKind::SolarPlant,
                    level: 3,
                },
                Completed {
                    building: BuildingKind::MetalMine,
                    level: 3,
                },
            ]
        );
        assert!(colony.state.queue.is_empty());
    }

    #[test]
    fn queued_items_advance_concurrently() {
        let mut colony = Colony::fresh();
        colony.state.resources.metal = 10_000.0;
        colony.state.resources.crystal = 10_000.0;
        assert!(colony.start_upgrade(BuildingKind::MetalMine, 0));
        assert!(colony.start_upgrade(BuildingKind::CrystalMine, 0));

        // Metal mine takes 45 s, crystal mine floor(25 * 1.5) = 37 s.
        colony.advance(10.0);
        assert_eq!(colony.state.queue[0].remaining_secs, 35.0);
        assert_eq!(colony.state.queue[1].remaining_secs, 27.0);
    }

    #[test]
    fn accrual_follows_hourly_rates() {
        let mut colony = Colony::fresh();
        colony.advance(3_600.0);
        // 500 + 72, 300 + 22, min(200 + 48, 480)
        assert!((colony.state.resources.metal - 572.0).abs() < 1e-9);
        assert!((colony.state.resources.crystal - 322.0).abs() < 1e-9);
        assert!((colony.state.resources.energy - 248.0).abs() < 1e-9);
    }

    #[test]
    fn energy_accrual_respects_the_cap() {
        let mut colony = Colony::fresh();
        colony.advance(10_000_000.0);
        assert_eq!(colony.state.resources.energy, 480.0);
    }

    #[test]
    fn storage_policy_caps_mineral_accrual() {
        let mut colony = Colony::fresh();
        colony.set_cap_policy(StorageCapPolicy::CapToStorage);
        colony.advance(10_000_000.0);
        assert_eq!(colony.state.resources.metal, 10_000.0);
        assert_eq!(colony.state.resources.crystal, 10_000.0);
    }

    #[test]
    fn offline_gap_accrues_with_saved_rates() {
        let mut colony = Colony::fresh();
        let saved_rates = Production {
            metal: 120,
            crystal: 60,
            energy: 0,
        };
        let report = colony
            .reconcile_offline(3_600.0, saved_rates)
            .expect("gap exceeds threshold");

        assert_eq!(report.metal_gained, 120);
        assert_eq!(report.crystal_gained, 60);
        assert_eq!(report.energy_gained, 0);
        assert!((colony.state.resources.metal - 620.0).abs() < 1e-9);
    }

    #[test]
    fn offline_gap_below_threshold_is_ignored() {
        let mut colony = Colony::fresh();
        let before = colony.state.clone();
        assert!(
            colony
                .reconcile_offline(9.5, before.production)
                .is_none()
        );
        assert_eq!(colony.state, before);
    }

    #[test]
    fn offline_gap_completes_outstanding_construction() {
        let mut colony = Colony::fresh();
        assert!(colony.start_upgrade(BuildingKind::MetalMine, 0));
        let rates = colony.state.production;

        let report = colony
            .reconcile_offline(600.0, rates)
            .expect("gap exceeds threshold");
        assert_eq!(
            report.completed,
            vec![Completed {
                building: BuildingKind::MetalMine,
                level: 3,
            }]
        );
        assert!(colony.state.queue.is_empty());
        assert_eq!(colony.state.production.metal, 119);
    }

    #[test]
    fn snapshot_stamps_the_save_time() {
        let mut colony = Colony::fresh();
        assert!(colony.start_upgrade(BuildingKind::Storage, 0));
        let snapshot = colony.snapshot(1_234_567);
        assert_eq!(snapshot.last_save_ms, 1_234_567);
        assert_eq!(snapshot.queue, colony.state.queue);
        assert_eq!(snapshot.resources, colony.state.resources);
    }

    #[test]
    fn snapshot_missing_newer_buildings_defaults_them_to_zero() {
        let mut state = ColonyState::default();
        state.buildings.remove(&BuildingKind::ResearchLab);
        let colony = Colony::from_state(state);
        assert_eq!(colony.state.level(BuildingKind::ResearchLab), 0);
        let view = colony.building_view(BuildingKind::ResearchLab);
        assert_eq!(view.level, 0);
    }

    #[test]
    fn building_view_surfaces_costs_outputs_and_blocks() {
        let colony = Colony::fresh();
        let view = colony.building_view(BuildingKind::MetalMine);
        assert_eq!(view.level, 2);
        assert_eq!(view.cost.metal, 135);
        assert_eq!(view.output_now, 72);
        assert_eq!(view.output_next, 119);
        assert_eq!(view.energy_use_next, 30);
        assert!(view.block.is_none());

        let lab = colony.building_view(BuildingKind::ResearchLab);
        assert_eq!(
            lab.block,
            Some(UpgradeBlock::Prerequisite {
                required: BuildingKind::CrystalMine,
                level: 3,
            })
        );
    }

    #[test]
    fn completion_messages_land_in_the_event_log() {
        let mut colony = Colony::fresh();
        assert!(colony.start_upgrade(BuildingKind::MetalMine, 0));
        colony.advance(45.0);
        assert!(
            colony
                .messages()
                .any(|message| message.contains("Metal Mine construction complete"))
        );
    }
}
