//! Message dispatch
//!
//! Applies one UI message to the store and returns what the UI should render
//! next. Runs to completion synchronously; the caller holds the store lock.

use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::GameStore;
use crate::types::PhotoBlob;
use crate::view;

fn error_message(e: &GameError) -> ServerMessage {
    ServerMessage::Error {
        code: e.code().to_string(),
        msg: e.to_string(),
    }
}

/// Handle a client message and return the responses, in order
pub fn handle_message(msg: ClientMessage, store: &mut GameStore) -> Vec<ServerMessage> {
    let result = match msg {
        ClientMessage::SelectPlayerCount { count } => store
            .select_player_count(count)
            .map(|_| view::render_screen(store.state())),

        ClientMessage::UploadPhoto { slot, data_url } => PhotoBlob::from_data_url(data_url)
            .and_then(|photo| store.set_player_photo(slot, photo))
            .map(|_| {
                vec![ServerMessage::NameForm {
                    slots: view::name_form(store.state()),
                }]
            }),

        ClientMessage::StartGame { names } => store
            .start_game(names)
            .map(|_| view::render_screen(store.state())),

        ClientMessage::SubmitRound { titles } => store.submit_round(&titles).map(|_| {
            // Fresh, empty form for the next round
            let (rows, options) = view::round_form(store.state());
            vec![
                ServerMessage::RoundLocked,
                ServerMessage::RoundForm { rows, options },
            ]
        }),

        ClientMessage::ShowScreen { screen } => store
            .show_screen(screen)
            .map(|_| view::render_screen(store.state())),

        ClientMessage::NewTable => {
            store.new_table();
            Ok(view::render_screen(store.state()))
        }

        ClientMessage::ResetStats => {
            store.reset();
            Ok(view::render_screen(store.state()))
        }

        ClientMessage::RequestState => Ok(view::render_screen(store.state())),
    };

    let mut responses = match result {
        Ok(responses) => responses,
        Err(e) => {
            tracing::info!("Rejected input: {}", e);
            vec![error_message(&e)]
        }
    };

    if let Some(warning) = store.take_persist_warning() {
        responses.push(ServerMessage::Warning { msg: warning });
    }

    responses
}
