use crate::sim::colony::ColonyState;
use anyhow::Result;
use std::fs;
use std::io::ErrorKind;

use super::{SAVE_FILE, decode_snapshot};

/// Returns `None` when no save exists yet. A save that exists but cannot be
/// decoded is an error; the caller keeps whatever state it already has and
/// decides the fallback.
pub fn load_game() -> Result<Option<ColonyState>> {
    match fs::read_to_string(SAVE_FILE) {
        Ok(content) => Ok(Some(decode_snapshot(&content)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}
