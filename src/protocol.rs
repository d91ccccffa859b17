use crate::types::*;
use serde::{Deserialize, Serialize};

/// Protocol version announced in the welcome message
pub const PROTOCOL_VERSION: &str = "1.0";

/// Input from the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    SelectPlayerCount {
        count: u8,
    },
    /// Photo read by the browser, as a data URL
    UploadPhoto {
        slot: usize,
        data_url: String,
    },
    StartGame {
        names: Vec<String>,
    },
    /// One title name per rostered player, empty string for "not selected"
    SubmitRound {
        titles: Vec<String>,
    },
    ShowScreen {
        screen: Screen,
    },
    /// Seat different players, keeping everyone's counters
    NewTable,
    /// Sent only after the user confirmed the wipe
    ResetStats,
    /// Ask for the current screen and its view again
    RequestState,
}

/// Render notifications and feedback for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        screen: Screen,
    },
    ScreenChanged {
        screen: Screen,
        valid_transitions: Vec<Screen>,
    },
    PlayerCountOptions {
        counts: Vec<u8>,
    },
    /// Render the roster input form, one slot per player
    NameForm {
        slots: Vec<NameSlot>,
    },
    /// Render the round-assignment form
    RoundForm {
        rows: Vec<RoundRow>,
        options: Vec<TitleOption>,
    },
    StatsCards {
        cards: Vec<StatsCard>,
    },
    /// A round was validated and counted
    RoundLocked,
    Error {
        code: String,
        msg: String,
    },
    /// Non-fatal problem, e.g. the state could not be saved
    Warning {
        msg: String,
    },
}

/// A title with its display theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleOption {
    pub title: Title,
    pub icon: String,
    pub class: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSlot {
    pub slot: usize,
    pub label: String,
    pub photo: Option<PhotoBlob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRow {
    pub slot: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub photo: Option<PhotoBlob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleCountView {
    pub title: Title,
    pub icon: String,
    pub class: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsCard {
    pub player_id: PlayerId,
    pub name: String,
    pub photo: Option<PhotoBlob>,
    pub total_rounds: u32,
    pub most_common: Option<TitleOption>,
    pub counts: Vec<TitleCountView>,
}
