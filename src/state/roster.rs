use super::GameStore;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl GameState {
    /// Choose how many players sit at the table and move on to naming them
    pub fn select_player_count(&mut self, count: u8) -> GameResult<PlayerCount> {
        let count = PlayerCount::new(count)?;
        self.player_count = Some(count);
        // Seats are filled again by start_game
        self.players.clear();
        // Photos from a larger table no longer have a slot
        self.player_photos.retain(|slot, _| *slot < count.get());
        self.enter_screen(Screen::PlayerNamesSection)?;
        Ok(count)
    }

    /// Attach a photo to a roster slot
    pub fn set_player_photo(&mut self, slot: usize, photo: PhotoBlob) -> GameResult<()> {
        let count = self.player_count.ok_or(GameError::PlayerCountNotSelected)?;
        if slot >= count.get() {
            return Err(GameError::InvalidPhotoSlot {
                slot,
                count: count.get(),
            });
        }
        self.player_photos.insert(slot, photo);
        Ok(())
    }

    /// Set the roster from one name per slot.
    ///
    /// Names already known keep their id and counters, so a returning player's
    /// history carries over. New names start with zero counters for every
    /// title of the current config.
    pub fn start_game(&mut self, names: Vec<String>) -> GameResult<Vec<PlayerId>> {
        let count = self.player_count.ok_or(GameError::PlayerCountNotSelected)?;
        if names.len() != count.get() {
            return Err(GameError::NameCountMismatch {
                expected: count.get(),
                actual: names.len(),
            });
        }

        let mut trimmed: Vec<String> = Vec::with_capacity(names.len());
        for (slot, name) in names.iter().enumerate() {
            let name = name.trim();
            if name.is_empty() {
                return Err(GameError::EmptyName { slot });
            }
            if trimmed.iter().any(|n| n == name) {
                return Err(GameError::DuplicateName(name.to_string()));
            }
            trimmed.push(name.to_string());
        }

        let mut roster = Vec::with_capacity(trimmed.len());
        for name in trimmed {
            let id = match self.find_player_by_name(&name).cloned() {
                Some(id) => {
                    if let Some(profile) = self.profiles.get_mut(&id) {
                        profile.ensure_counters(count);
                    }
                    id
                }
                None => {
                    let id = ulid::Ulid::new().to_string();
                    self.profiles
                        .insert(id.clone(), PlayerProfile::new(name, count));
                    id
                }
            };
            roster.push(id);
        }

        self.players = roster.clone();
        self.enter_screen(Screen::GameSection)?;
        Ok(roster)
    }
}

impl GameStore {
    pub fn select_player_count(&mut self, count: u8) -> GameResult<PlayerCount> {
        let count = self.commit(|s| s.select_player_count(count))?;
        tracing::info!("Player count set to {}", count);
        Ok(count)
    }

    pub fn set_player_photo(&mut self, slot: usize, photo: PhotoBlob) -> GameResult<()> {
        self.commit(|s| s.set_player_photo(slot, photo))?;
        tracing::info!("Stored photo for slot {}", slot);
        Ok(())
    }

    pub fn start_game(&mut self, names: Vec<String>) -> GameResult<Vec<PlayerId>> {
        let roster = self.commit(|s| s.start_game(names))?;
        tracing::info!("Game started with {} players", roster.len());
        Ok(roster)
    }
}
