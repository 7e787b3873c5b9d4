use crate::sim::colony::ColonyState;
use anyhow::Result;
use std::fs;

use super::{SAVE_FILE, encode_snapshot};

/// Writes the snapshot to disk. The caller stamps `last_save_ms` (via
/// `Colony::snapshot`) so the next launch can measure the offline gap.
pub fn save_game(snapshot: &ColonyState) -> Result<()> {
    fs::write(SAVE_FILE, encode_snapshot(snapshot)?)?;
    Ok(())
}
