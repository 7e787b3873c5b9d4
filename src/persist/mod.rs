mod load;
mod save;

pub use load::load_game;
pub use save::save_game;

use crate::sim::colony::ColonyState;
use anyhow::Result;

pub const SAVE_FILE: &str = "colony.ron";

/// The portable snapshot codec. The transport is a RON string; any
/// reversible structured-text encoding would do, so nothing outside this
/// module depends on the choice.
pub fn encode_snapshot(state: &ColonyState) -> Result<String> {
    let pretty = ron::ser::PrettyConfig::new();
    Ok(ron::ser::to_string_pretty(state, pretty)?)
}

pub fn decode_snapshot(text: &str) -> Result<ColonyState> {
    Ok(ron::from_str(text)?)
}
