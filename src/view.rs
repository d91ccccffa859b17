//! What the UI should draw, computed from the game state alone.

use crate::protocol::*;
use crate::state::score::PlayerTotals;
use crate::types::*;

pub fn title_option(title: Title) -> TitleOption {
    let theme = title.theme();
    TitleOption {
        title,
        icon: theme.icon.to_string(),
        class: theme.class.to_string(),
        description: theme.description.to_string(),
    }
}

pub fn player_count_options() -> Vec<u8> {
    PlayerCount::all().map(u8::from).collect()
}

/// One input slot per player of the selected count
pub fn name_form(state: &GameState) -> Vec<NameSlot> {
    let slots = state.player_count.map_or(0, |c| c.get());
    (0..slots)
        .map(|slot| NameSlot {
            slot,
            label: format!("Player {}", slot + 1),
            photo: state.photo(slot).cloned(),
        })
        .collect()
}

/// Rows for the rostered players plus the titles they can be given
pub fn round_form(state: &GameState) -> (Vec<RoundRow>, Vec<TitleOption>) {
    let rows = state
        .roster()
        .map(|(slot, id, profile)| RoundRow {
            slot,
            player_id: id.clone(),
            name: profile.map_or_else(|| id.clone(), |p| p.name.clone()),
            photo: state.photo(slot).cloned(),
        })
        .collect();

    let options = state
        .player_count
        .map(|c| c.distinct_titles().into_iter().map(title_option).collect())
        .unwrap_or_default();

    (rows, options)
}

fn stats_card(totals: &PlayerTotals<'_>, photo: Option<&PhotoBlob>) -> StatsCard {
    StatsCard {
        player_id: totals.player_id.clone(),
        name: totals.profile.name.clone(),
        photo: photo.cloned(),
        total_rounds: totals.total_rounds,
        most_common: totals.most_common.map(title_option),
        counts: totals
            .profile
            .stats
            .iter()
            .map(|(title, count)| {
                let theme = title.theme();
                TitleCountView {
                    title: *title,
                    icon: theme.icon.to_string(),
                    class: theme.class.to_string(),
                    count: *count,
                }
            })
            .collect(),
    }
}

/// Photos belong to roster slots, so only rostered players carry one
fn roster_photo<'a>(state: &'a GameState, player_id: &str) -> Option<&'a PhotoBlob> {
    state
        .players
        .iter()
        .position(|id| id == player_id)
        .and_then(|slot| state.photo(slot))
}

/// One card per rostered player, in roster order
pub fn stats_cards(state: &GameState) -> Vec<StatsCard> {
    state
        .roster_totals()
        .iter()
        .map(|totals| stats_card(totals, roster_photo(state, totals.player_id)))
        .collect()
}

/// Cards for every known player, most rounds first
pub fn leaderboard_cards(state: &GameState) -> Vec<StatsCard> {
    state
        .leaderboard()
        .iter()
        .map(|totals| stats_card(totals, roster_photo(state, totals.player_id)))
        .collect()
}

/// The current screen followed by the view it needs
pub fn render_screen(state: &GameState) -> Vec<ServerMessage> {
    let screen = state.current_screen;
    let view = match screen {
        Screen::PlayerCountSection => ServerMessage::PlayerCountOptions {
            counts: player_count_options(),
        },
        Screen::PlayerNamesSection => ServerMessage::NameForm {
            slots: name_form(state),
        },
        Screen::GameSection => {
            let (rows, options) = round_form(state);
            ServerMessage::RoundForm { rows, options }
        }
        Screen::StatsSection => ServerMessage::StatsCards {
            cards: stats_cards(state),
        },
    };

    vec![
        ServerMessage::ScreenChanged {
            screen,
            valid_transitions: GameState::valid_transitions(screen),
        },
        view,
    ]
}
