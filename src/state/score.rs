//! Read-only aggregation over the per-title counters.

use crate::types::*;

/// Rounds played is the sum of every title counter
pub fn total_rounds(stats: &TitleCounts) -> u32 {
    stats.values().sum()
}

/// The title held most often. Ties go to the earliest title in canonical
/// order; a player with no rounds has no most common title.
pub fn most_common_title(stats: &TitleCounts) -> Option<Title> {
    let mut best: Option<(Title, u32)> = None;
    for (title, count) in stats {
        if *count == 0 {
            continue;
        }
        match best {
            Some((_, max)) if *count <= max => {}
            _ => best = Some((*title, *count)),
        }
    }
    best.map(|(title, _)| title)
}

/// A player's totals, borrowed from the state
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTotals<'a> {
    pub player_id: &'a PlayerId,
    pub profile: &'a PlayerProfile,
    pub total_rounds: u32,
    pub most_common: Option<Title>,
}

impl<'a> PlayerTotals<'a> {
    fn new(player_id: &'a PlayerId, profile: &'a PlayerProfile) -> Self {
        Self {
            player_id,
            profile,
            total_rounds: total_rounds(&profile.stats),
            most_common: most_common_title(&profile.stats),
        }
    }
}

impl GameState {
    /// Totals for the rostered players, in roster order
    pub fn roster_totals(&self) -> Vec<PlayerTotals<'_>> {
        self.players
            .iter()
            .filter_map(|id| self.profiles.get(id).map(|p| PlayerTotals::new(id, p)))
            .collect()
    }

    /// Totals for every player ever seen, most rounds first, then by name
    pub fn leaderboard(&self) -> Vec<PlayerTotals<'_>> {
        let mut totals: Vec<_> = self
            .profiles
            .iter()
            .map(|(id, p)| PlayerTotals::new(id, p))
            .collect();
        totals.sort_by(|a, b| {
            b.total_rounds
                .cmp(&a.total_rounds)
                .then_with(|| a.profile.name.cmp(&b.profile.name))
        });
        totals
    }
}
