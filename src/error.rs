use crate::types::{Screen, Title};

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;

/// Input validation failures. Every one of these leaves the state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Player count must be between 3 and 6, got {0}")]
    InvalidPlayerCount(u8),

    #[error("Select the number of players first")]
    PlayerCountNotSelected,

    #[error("Expected {expected} player names, got {actual}")]
    NameCountMismatch { expected: usize, actual: usize },

    #[error("Please enter all player names")]
    EmptyName { slot: usize },

    #[error("Player name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("No players in the current game")]
    NoRoster,

    #[error("Expected a title for {expected} players, got {actual}")]
    AssignmentSize { expected: usize, actual: usize },

    #[error("Please assign a title to each player ({player} has none)")]
    IncompleteAssignment { player: String },

    #[error("Unknown title '{0}'")]
    UnknownTitle(String),

    #[error("{0} has already been assigned. Each title must be unique (except Sepahi).")]
    DuplicateTitle(Title),

    #[error("Invalid assignment. Expected {expected} {title}(s), but got {actual}")]
    CountMismatch {
        title: Title,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid photo: {0}")]
    InvalidPhoto(String),

    #[error("Photo slot {slot} is outside the {count} player slots")]
    InvalidPhotoSlot { slot: usize, count: usize },

    #[error("Invalid screen transition from {from:?} to {to:?}")]
    InvalidTransition { from: Screen, to: Screen },

    #[error("Cannot show {screen:?}: {reason}")]
    ScreenUnavailable { screen: Screen, reason: &'static str },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl GameError {
    /// Stable code sent to the UI alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidPlayerCount(_) => "INVALID_PLAYER_COUNT",
            GameError::PlayerCountNotSelected => "PLAYER_COUNT_NOT_SELECTED",
            GameError::NameCountMismatch { .. } => "NAME_COUNT_MISMATCH",
            GameError::EmptyName { .. } => "EMPTY_NAME",
            GameError::DuplicateName(_) => "DUPLICATE_NAME",
            GameError::NoRoster => "NO_ROSTER",
            GameError::AssignmentSize { .. } => "ASSIGNMENT_SIZE",
            GameError::IncompleteAssignment { .. } => "INCOMPLETE_ASSIGNMENT",
            GameError::UnknownTitle(_) => "UNKNOWN_TITLE",
            GameError::DuplicateTitle(_) => "DUPLICATE_TITLE",
            GameError::CountMismatch { .. } => "COUNT_MISMATCH",
            GameError::InvalidPhoto(_) => "INVALID_PHOTO",
            GameError::InvalidPhotoSlot { .. } => "INVALID_PHOTO_SLOT",
            GameError::InvalidTransition { .. } => "INVALID_TRANSITION",
            GameError::ScreenUnavailable { .. } => "SCREEN_UNAVAILABLE",
            GameError::InvalidSnapshot(_) => "INVALID_SNAPSHOT",
        }
    }
}

/// Errors reading or writing the durable slot
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}
