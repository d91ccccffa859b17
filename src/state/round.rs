//! Round validation and commit.
//!
//! A round assigns one title per rostered player. It is accepted only when the
//! assigned titles form exactly the multiset the player count calls for, with
//! Sepahi as the one title allowed to repeat.

use super::GameStore;
use crate::error::{GameError, GameResult};
use crate::types::*;

/// Turn the UI's selections into titles. An empty string means "nothing selected".
pub fn parse_assignment(selections: &[String]) -> GameResult<Vec<Option<Title>>> {
    selections
        .iter()
        .map(|s| {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse().map(Some)
            }
        })
        .collect()
}

/// Check a round's assignment against the title config for `count`.
///
/// `names` are the rostered players in order, used only for error messages.
/// Fails fast on the first violated rule: missing selection, then illegal
/// duplicate, then per-title count.
pub fn validate_assignment(
    count: PlayerCount,
    names: &[&str],
    assignment: &[Option<Title>],
) -> GameResult<Vec<Title>> {
    if assignment.len() > names.len() {
        return Err(GameError::AssignmentSize {
            expected: names.len(),
            actual: assignment.len(),
        });
    }

    let mut titles = Vec::with_capacity(names.len());
    for (slot, name) in names.iter().enumerate() {
        match assignment.get(slot).copied().flatten() {
            Some(title) => titles.push(title),
            None => {
                return Err(GameError::IncompleteAssignment {
                    player: name.to_string(),
                })
            }
        }
    }

    for (i, title) in titles.iter().enumerate() {
        if !title.is_repeatable() && titles[..i].contains(title) {
            return Err(GameError::DuplicateTitle(*title));
        }
    }

    for (title, expected) in count.expected_counts() {
        let actual = titles.iter().filter(|t| **t == title).count();
        if actual != expected {
            return Err(GameError::CountMismatch {
                title,
                expected,
                actual,
            });
        }
    }

    Ok(titles)
}

impl GameState {
    /// Validate a round and, if it passes, add one to each player's counter
    /// for the title they held. Nothing changes when validation fails.
    pub fn submit_round(&mut self, assignment: &[Option<Title>]) -> GameResult<()> {
        let count = self.player_count.ok_or(GameError::NoRoster)?;
        if self.players.is_empty() {
            return Err(GameError::NoRoster);
        }

        let names = self.roster_names();
        let titles = validate_assignment(count, &names, assignment)?;

        for (id, title) in self.players.iter().zip(titles) {
            let profile = self
                .profiles
                .get_mut(id)
                .ok_or_else(|| GameError::InvalidSnapshot(format!("player '{}' has no profile", id)))?;
            *profile.stats.entry(title).or_insert(0) += 1;
        }

        Ok(())
    }

    /// Submit the raw selections from the round form. A missing selection is
    /// reported before an unreadable one.
    pub fn submit_selections(&mut self, selections: &[String]) -> GameResult<()> {
        if self.player_count.is_none() || self.players.is_empty() {
            return Err(GameError::NoRoster);
        }

        let names = self.roster_names();
        if selections.len() > names.len() {
            return Err(GameError::AssignmentSize {
                expected: names.len(),
                actual: selections.len(),
            });
        }
        let blank = names
            .iter()
            .enumerate()
            .find(|(slot, _)| selections.get(*slot).map_or(true, |s| s.trim().is_empty()));
        if let Some((_, name)) = blank {
            return Err(GameError::IncompleteAssignment {
                player: name.to_string(),
            });
        }

        let assignment = parse_assignment(selections)?;
        self.submit_round(&assignment)
    }

    fn roster_names(&self) -> Vec<&str> {
        self.roster()
            .map(|(_, id, profile)| profile.map_or(id.as_str(), |p| p.name.as_str()))
            .collect()
    }
}

impl GameStore {
    /// Submit a round as selected in the UI, one entry per rostered player
    pub fn submit_round(&mut self, selections: &[String]) -> GameResult<()> {
        self.commit(|s| s.submit_selections(selections))?;
        tracing::info!("Round locked for {} players", selections.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{names, three_player_store};
    use Title::*;

    const ABC: [&str; 3] = ["Alice", "Bob", "Cara"];

    fn count(n: u8) -> PlayerCount {
        PlayerCount::new(n).unwrap()
    }

    fn counter(store: &GameStore, player: &str, title: Title) -> u32 {
        let state = store.state();
        let id = state.find_player_by_name(player).unwrap();
        state.profile(id).unwrap().stats[&title]
    }

    #[test]
    fn test_valid_three_player_round() {
        let result = validate_assignment(count(3), &ABC, &[Some(Badshah), Some(Sepahi), Some(Gashti)]);
        assert_eq!(result, Ok(vec![Badshah, Sepahi, Gashti]));
    }

    #[test]
    fn test_order_of_titles_does_not_matter() {
        let result = validate_assignment(count(3), &ABC, &[Some(Gashti), Some(Badshah), Some(Sepahi)]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_empty_selection() {
        let result = validate_assignment(count(3), &ABC, &[Some(Badshah), None, Some(Gashti)]);
        assert_eq!(
            result,
            Err(GameError::IncompleteAssignment {
                player: "Bob".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_short_assignment() {
        let result = validate_assignment(count(3), &ABC, &[Some(Badshah), Some(Sepahi)]);
        assert_eq!(
            result,
            Err(GameError::IncompleteAssignment {
                player: "Cara".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_long_assignment() {
        let result = validate_assignment(
            count(3),
            &ABC,
            &[Some(Badshah), Some(Sepahi), Some(Gashti), Some(Sepahi)],
        );
        assert!(matches!(result, Err(GameError::AssignmentSize { .. })));
    }

    #[test]
    fn test_incomplete_reported_before_duplicate() {
        let result = validate_assignment(count(3), &ABC, &[Some(Badshah), Some(Badshah), None]);
        assert!(matches!(result, Err(GameError::IncompleteAssignment { .. })));
    }

    #[test]
    fn test_rejects_duplicate_badshah() {
        // Two Badshah in a six player game, everything else filled
        let six = ["A", "B", "C", "D", "E", "F"];
        let result = validate_assignment(
            count(6),
            &six,
            &[
                Some(Badshah),
                Some(Badshah),
                Some(Sepahi),
                Some(Sepahi),
                Some(Dallah),
                Some(Gashti),
            ],
        );
        assert_eq!(result, Err(GameError::DuplicateTitle(Badshah)));
    }

    #[test]
    fn test_accepts_two_sepahi_for_six() {
        let six = ["A", "B", "C", "D", "E", "F"];
        let result = validate_assignment(
            count(6),
            &six,
            &[
                Some(Sepahi),
                Some(Wazir),
                Some(Badshah),
                Some(Sepahi),
                Some(Gashti),
                Some(Dallah),
            ],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_too_many_sepahi_is_count_mismatch() {
        let result = validate_assignment(count(3), &ABC, &[Some(Sepahi), Some(Sepahi), Some(Gashti)]);
        assert_eq!(
            result,
            Err(GameError::CountMismatch {
                title: Badshah,
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_title_outside_config_is_count_mismatch() {
        // Wazir is not part of the three player config
        let result = validate_assignment(count(3), &ABC, &[Some(Badshah), Some(Wazir), Some(Gashti)]);
        assert_eq!(
            result,
            Err(GameError::CountMismatch {
                title: Sepahi,
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_parse_assignment() {
        let parsed = parse_assignment(&names(&["Badshah", "", " Gashti "])).unwrap();
        assert_eq!(parsed, vec![Some(Badshah), None, Some(Gashti)]);

        let result = parse_assignment(&names(&["Badshah", "King"]));
        assert_eq!(result, Err(GameError::UnknownTitle("King".to_string())));
    }

    #[test]
    fn test_blank_selection_reported_before_unknown_title() {
        let mut store = three_player_store();

        let result = store.submit_round(&names(&["", "Joker", "Gashti"]));
        assert_eq!(
            result,
            Err(GameError::IncompleteAssignment {
                player: "Alice".to_string()
            })
        );

        let result = store.submit_round(&names(&["Badshah", "Joker", "Gashti"]));
        assert_eq!(result, Err(GameError::UnknownTitle("Joker".to_string())));
        assert_eq!(counter(&store, "Alice", Badshah), 0);
    }

    #[test]
    fn test_three_player_scenario() {
        let mut store = three_player_store();

        store
            .submit_round(&names(&["Badshah", "Sepahi", "Gashti"]))
            .unwrap();
        assert_eq!(counter(&store, "Alice", Badshah), 1);
        assert_eq!(counter(&store, "Bob", Sepahi), 1);
        assert_eq!(counter(&store, "Cara", Gashti), 1);

        let result = store.submit_round(&names(&["Sepahi", "Sepahi", "Gashti"]));
        assert_eq!(
            result,
            Err(GameError::CountMismatch {
                title: Badshah,
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(counter(&store, "Alice", Sepahi), 0);
        assert_eq!(counter(&store, "Bob", Sepahi), 1);
        assert_eq!(counter(&store, "Cara", Gashti), 1);
    }

    #[test]
    fn test_six_player_round_touches_only_assigned_counters() {
        let mut store = GameStore::in_memory();
        store.select_player_count(6).unwrap();
        store
            .start_game(names(&["A", "B", "C", "D", "E", "F"]))
            .unwrap();

        store
            .submit_round(&names(&[
                "Sepahi", "Badshah", "Sepahi", "Wazir", "Dallah", "Gashti",
            ]))
            .unwrap();

        assert_eq!(counter(&store, "A", Sepahi), 1);
        assert_eq!(counter(&store, "C", Sepahi), 1);
        assert_eq!(counter(&store, "B", Sepahi), 0);
        assert_eq!(counter(&store, "D", Sepahi), 0);
        assert_eq!(counter(&store, "B", Badshah), 1);
        assert_eq!(counter(&store, "A", Badshah), 0);

        let total: u32 = store
            .state()
            .profiles
            .values()
            .flat_map(|p| p.stats.values())
            .sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_submit_without_roster() {
        let mut store = GameStore::in_memory();
        let result = store.submit_round(&names(&["Badshah", "Sepahi", "Gashti"]));
        assert_eq!(result, Err(GameError::NoRoster));
    }
}
