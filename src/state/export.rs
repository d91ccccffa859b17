//! State export/import and reading saved snapshots.
//!
//! Exports wrap the game state with a schema version and timestamp for
//! backups. Saved slots written before players had ids (names as keys,
//! `playerCount: 0` for "not chosen") are migrated on load.

use super::GameStore;
use crate::error::{GameError, GameResult};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Schema version for export format compatibility
/// Version 1: initial format wrapping `GameState`
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// A serializable snapshot of the entire game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateExport {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Export timestamp (ISO8601)
    pub exported_at: String,
    pub state: GameState,
}

impl StateExport {
    /// Create a new export with current timestamp
    pub fn new(state: GameState) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
            state,
        }
    }

    /// Validate the export before import
    pub fn validate(&self) -> GameResult<()> {
        if self.schema_version > EXPORT_SCHEMA_VERSION {
            return Err(GameError::InvalidSnapshot(format!(
                "export schema version {} is newer than supported version {}",
                self.schema_version, EXPORT_SCHEMA_VERSION
            )));
        }
        self.state.check_integrity()
    }
}

impl GameState {
    /// Verify the cross-references a hand-edited or foreign snapshot could break
    pub fn check_integrity(&self) -> GameResult<()> {
        let invalid = |msg: String| Err(GameError::InvalidSnapshot(msg));

        if self.schema_version > STATE_SCHEMA_VERSION {
            return invalid(format!(
                "state schema version {} is newer than supported version {}",
                self.schema_version, STATE_SCHEMA_VERSION
            ));
        }

        let slots = self.player_count.map_or(0, |c| c.get());
        if let Some(slot) = self.player_photos.keys().find(|slot| **slot >= slots) {
            return invalid(format!(
                "photo slot {} is outside the {} player slots",
                slot, slots
            ));
        }

        if self.players.is_empty() {
            return Ok(());
        }

        let Some(count) = self.player_count else {
            return invalid("roster present but no player count".to_string());
        };
        if self.players.len() != count.get() {
            return invalid(format!(
                "roster has {} players but player count is {}",
                self.players.len(),
                count
            ));
        }

        let mut seen_ids = HashSet::new();
        let mut seen_names = HashSet::new();
        for id in &self.players {
            if !seen_ids.insert(id) {
                return invalid(format!("player '{}' appears twice in the roster", id));
            }
            let Some(profile) = self.profiles.get(id) else {
                return invalid(format!("roster references player '{}' which doesn't exist", id));
            };
            if !seen_names.insert(profile.name.as_str()) {
                return invalid(format!("name '{}' appears twice in the roster", profile.name));
            }
            if let Some(title) = count.titles().iter().find(|t| !profile.stats.contains_key(*t)) {
                return invalid(format!("player '{}' has no {} counter", profile.name, title));
            }
        }

        Ok(())
    }
}

/// Slot contents from before players had ids
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyState {
    player_count: u8,
    players: Vec<String>,
    player_photos: BTreeMap<String, String>,
    /// Counters can be null where a title was bumped without being initialised
    stats: BTreeMap<String, BTreeMap<String, Option<u32>>>,
    current_screen: Option<Screen>,
}

impl LegacyState {
    fn migrate(self) -> GameState {
        let count = PlayerCount::new(self.player_count).ok();
        let mut state = GameState {
            player_count: count,
            current_screen: self.current_screen.unwrap_or_default(),
            ..GameState::default()
        };

        for (name, counters) in self.stats {
            let mut stats = TitleCounts::new();
            for (title, value) in counters {
                match title.parse::<Title>() {
                    Ok(title) => {
                        stats.insert(title, value.unwrap_or(0));
                    }
                    Err(_) => tracing::warn!("Dropping unknown title '{}' for '{}'", title, name),
                }
            }
            state
                .profiles
                .insert(ulid::Ulid::new().to_string(), PlayerProfile { name, stats });
        }

        // A roster that doesn't fit the count can't be played; keep only the history
        let roster_fits = count.is_some_and(|c| c.get() == self.players.len());
        if let (Some(count), true) = (count, roster_fits) {
            for name in self.players {
                let id = match state.find_player_by_name(&name).cloned() {
                    Some(id) => id,
                    None => {
                        let id = ulid::Ulid::new().to_string();
                        state
                            .profiles
                            .insert(id.clone(), PlayerProfile::new(name, count));
                        id
                    }
                };
                if let Some(profile) = state.profiles.get_mut(&id) {
                    profile.ensure_counters(count);
                }
                state.players.push(id);
            }
        }

        let slots = count.map_or(0, |c| c.get());
        for (slot, photo) in self.player_photos {
            match slot.parse::<usize>() {
                Ok(slot) if slot < slots => {
                    state.player_photos.insert(slot, PhotoBlob(photo));
                }
                _ => tracing::warn!("Dropping photo for unusable slot '{}'", slot),
            }
        }

        state
    }
}

/// Parse a saved slot, migrating the pre-id format when needed
pub fn parse_saved_state(json: &str) -> GameResult<GameState> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| GameError::InvalidSnapshot(e.to_string()))?;

    if value.get("schemaVersion").is_some() {
        let state: GameState = serde_json::from_value(value)
            .map_err(|e| GameError::InvalidSnapshot(e.to_string()))?;
        if state.schema_version > STATE_SCHEMA_VERSION {
            return Err(GameError::InvalidSnapshot(format!(
                "state schema version {} is newer than supported version {}",
                state.schema_version, STATE_SCHEMA_VERSION
            )));
        }
        return Ok(state);
    }

    let legacy: LegacyState =
        serde_json::from_value(value).map_err(|e| GameError::InvalidSnapshot(e.to_string()))?;
    tracing::info!(
        "Migrating saved state from name-keyed format ({} players)",
        legacy.stats.len()
    );
    Ok(legacy.migrate())
}

impl GameStore {
    /// Export the entire game state
    pub fn export_state(&self) -> StateExport {
        StateExport::new(self.state().clone())
    }

    /// Replace the whole state with a validated snapshot
    pub fn import_state(&mut self, export: StateExport) -> GameResult<()> {
        export.validate()?;
        let StateExport {
            exported_at, state, ..
        } = export;
        self.commit(|s| {
            *s = state;
            Ok(())
        })?;
        tracing::info!("Imported state exported at {}", exported_at);
        Ok(())
    }
}
