use super::GameStore;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl GameState {
    /// Check if a screen transition is valid
    pub fn is_valid_screen_transition(from: Screen, to: Screen) -> bool {
        use Screen::*;

        match (from, to) {
            // Re-showing the current screen (startup, refresh)
            (a, b) if a == b => true,

            // Normal forward flow
            (PlayerCountSection, PlayerNamesSection) => true,
            (PlayerNamesSection, GameSection) => true,

            // Game and stats toggle freely
            (GameSection, StatsSection) => true,
            (StatsSection, GameSection) => true,

            // Reset or a new table returns to the start
            (GameSection, PlayerCountSection) => true,
            (StatsSection, PlayerCountSection) => true,

            _ => false,
        }
    }

    /// Screens reachable from `from` in one step, not counting itself
    pub fn valid_transitions(from: Screen) -> Vec<Screen> {
        use Screen::*;

        [
            PlayerCountSection,
            PlayerNamesSection,
            GameSection,
            StatsSection,
        ]
        .into_iter()
        .filter(|to| *to != from && Self::is_valid_screen_transition(from, *to))
        .collect()
    }

    fn check_screen_preconditions(&self, screen: Screen) -> GameResult<()> {
        match screen {
            Screen::PlayerNamesSection if self.player_count.is_none() => {
                Err(GameError::ScreenUnavailable {
                    screen,
                    reason: "no player count selected",
                })
            }
            Screen::GameSection | Screen::StatsSection if !self.has_roster() => {
                Err(GameError::ScreenUnavailable {
                    screen,
                    reason: "no players in the current game",
                })
            }
            // Leaving a seated table goes through new_table or reset
            Screen::PlayerCountSection if self.has_roster() => Err(GameError::ScreenUnavailable {
                screen,
                reason: "a game is in progress, start a new table or reset first",
            }),
            _ => Ok(()),
        }
    }

    /// Move to `screen` if the state machine and the screen's preconditions allow it
    pub fn enter_screen(&mut self, screen: Screen) -> GameResult<()> {
        let from = self.current_screen;
        if !Self::is_valid_screen_transition(from, screen) {
            return Err(GameError::InvalidTransition { from, to: screen });
        }
        self.check_screen_preconditions(screen)?;
        self.current_screen = screen;
        Ok(())
    }

    /// Settle on a usable screen after loading a saved game. Returning players
    /// land on the round form; screens whose data is gone fall back to the start.
    /// Returns whether anything changed.
    pub fn resume(&mut self) -> bool {
        let mut changed = false;
        if !self.has_roster() && !self.players.is_empty() {
            // Roster no longer fits the player count, it cannot be played
            self.players.clear();
            changed = true;
        }

        let target = if self.has_roster() {
            Screen::GameSection
        } else if self.check_screen_preconditions(self.current_screen).is_ok() {
            self.current_screen
        } else {
            Screen::PlayerCountSection
        };

        if target != self.current_screen {
            self.current_screen = target;
            changed = true;
        }
        changed
    }

    /// Clear the roster, photos and player count for a new table, keeping
    /// every player's history
    pub fn new_table(&mut self) {
        self.players.clear();
        self.player_photos.clear();
        self.player_count = None;
        self.current_screen = Screen::PlayerCountSection;
    }

    /// Forget every player, photo and counter and go back to the start
    pub fn reset(&mut self) {
        self.players.clear();
        self.profiles.clear();
        self.player_photos.clear();
        self.player_count = None;
        self.current_screen = Screen::PlayerCountSection;
    }
}

impl GameStore {
    /// Navigate between screens
    pub fn show_screen(&mut self, screen: Screen) -> GameResult<()> {
        self.commit(|s| s.enter_screen(screen))?;
        tracing::debug!("Showing {:?}", screen);
        Ok(())
    }

    pub fn resume(&mut self) {
        let mut next = self.state.clone();
        if next.resume() {
            self.state = next;
            self.persist();
            tracing::info!("Resuming on {:?}", self.state.current_screen);
        }
    }

    /// Start over with new players. Known names keep their counters.
    pub fn new_table(&mut self) {
        self.state.new_table();
        self.persist();
        tracing::info!("New table, {} known players kept", self.state.profiles.len());
    }

    /// Wipe everything. Irreversible; callers confirm with the user first.
    pub fn reset(&mut self) {
        self.state.reset();
        self.persist();
        tracing::info!("Game state reset");
    }
}
