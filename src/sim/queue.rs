use crate::sim::catalog::BuildingKind;
use serde::{Deserialize, Serialize};

/// One in-flight upgrade. Every queued item advances on every tick; the only
/// cap is one item per building kind, enforced by eligibility before
/// enqueueing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionItem {
    pub building: BuildingKind,
    pub from_level: u32,
    pub to_level: u32,
    pub total_secs: u64,
    pub remaining_secs: f64,
    #[serde(default)]
    pub started_ms: u64,
}

impl ConstructionItem {
    pub fn new(building: BuildingKind, from_level: u32, total_secs: u64, started_ms: u64) -> Self {
        Self {
            building,
            from_level,
            to_level: from_level + 1,
            total_secs,
            remaining_secs: total_secs as f64,
            started_ms,
        }
    }

    /// Advances the timer by `delta_secs`, clamping at zero. Returns true on
    /// the tick that finishes the item.
    pub fn tick(&mut self, delta_secs: f64) -> bool {
        if self.remaining_secs <= 0.0 {
            return false;
        }
        self.remaining_secs = (self.remaining_secs - delta_secs).max(0.0);
        self.remaining_secs <= 0.0
    }

    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 1.0;
        }
        (1.0 - self.remaining_secs / self.total_secs as f64).clamp(0.0, 1.0)
    }
}

/// A finished upgrade, reported back to the caller per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completed {
    pub building: BuildingKind,
    pub level: u32,
}

pub fn contains(queue: &[ConstructionItem], kind: BuildingKind) -> bool {
    queue.iter().any(|item| item.building == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(remaining: f64) -> ConstructionItem {
        let mut item = ConstructionItem::new(BuildingKind::MetalMine, 2, 45, 0);
        item.remaining_secs = remaining;
        item
    }

    #[test]
    fn tick_decrements_and_clamps_at_zero() {
        let mut under_way = item(45.0);
        assert!(!under_way.tick(30.0));
        assert_eq!(under_way.remaining_secs, 15.0);
        assert!(under_way.tick(60.0));
        assert_eq!(under_way.remaining_secs, 0.0);
    }

    #[test]
    fn zero_delta_finishes_nothing() {
        let mut under_way = item(45.0);
        assert!(!under_way.tick(0.0));
        assert_eq!(under_way.remaining_secs, 45.0);
    }

    #[test]
    fn exact_delta_completes_the_item() {
        let mut under_way = item(45.0);
        assert!(under_way.tick(45.0));
    }

    #[test]
    fn progress_runs_from_zero_to_one() {
        let mut under_way = ConstructionItem::new(BuildingKind::Storage, 1, 40, 0);
        assert_eq!(under_way.progress(), 0.0);
        under_way.tick(10.0);
        assert!((under_way.progress() - 0.25).abs() < 1e-9);
        under_way.tick(100.0);
        assert_eq!(under_way.progress(), 1.0);
    }

    #[test]
    fn contains_matches_on_building_kind() {
        let queue = vec![item(45.0)];
        assert!(contains(&queue, BuildingKind::MetalMine));
        assert!(!contains(&queue, BuildingKind::CrystalMine));
    }
}
