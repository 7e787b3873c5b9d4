use serde::{Deserialize, Serialize};

/// Hourly production rates. Derived from building levels by the economy
/// module; never mutated directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub metal: u64,
    pub crystal: u64,
    pub energy: u64,
}

/// Stockpiles accrue fractionally; display formatting floors them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub metal: f64,
    pub crystal: f64,
    pub energy: f64,
    pub energy_max: f64,
}

impl Resources {
    /// Continuous accrual over `delta_secs`. Energy is always clamped to
    /// `energy_max`; metal and crystal are clamped to `cap` only when the
    /// storage policy supplies one. Clamping never takes away amounts that
    /// already exceed the limit.
    pub fn accrue(&mut self, rates: &Production, delta_secs: f64, cap: Option<f64>) {
        let hours = delta_secs / 3600.0;
        self.metal = accrue_one(self.metal, rates.metal, hours, cap);
        self.crystal = accrue_one(self.crystal, rates.crystal, hours, cap);
        self.energy = accrue_one(self.energy, rates.energy, hours, Some(self.energy_max));
    }
}

fn accrue_one(current: f64, rate: u64, hours: f64, cap: Option<f64>) -> f64 {
    let next = current + rate as f64 * hours;
    match cap {
        Some(limit) => next.min(limit.max(current)),
        None => next,
    }
}
