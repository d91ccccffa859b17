use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Opaque ID types for type safety
pub type PlayerId = String;

/// Per-title round counters for one player
pub type TitleCounts = BTreeMap<Title, u32>;

/// Storage slot the game state lives in unless configured otherwise
pub const DEFAULT_STATE_KEY: &str = "badshahGashtiState";

/// Schema version of the persisted `GameState`
/// Version 1: players keyed by synthetic id, stats carried on profiles
pub const STATE_SCHEMA_VERSION: u32 = 1;

/// Role titles handed out each round. Declaration order is the canonical
/// order used for display and tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Title {
    Badshah,
    Wazir,
    Sepahi,
    Dallah,
    Gashti,
}

impl Title {
    pub const ALL: [Title; 5] = [
        Title::Badshah,
        Title::Wazir,
        Title::Sepahi,
        Title::Dallah,
        Title::Gashti,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Title::Badshah => "Badshah",
            Title::Wazir => "Wazir",
            Title::Sepahi => "Sepahi",
            Title::Dallah => "Dallah",
            Title::Gashti => "Gashti",
        }
    }

    /// Only Sepahi may be held by more than one player in a round
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Title::Sepahi)
    }

    pub fn theme(&self) -> TitleTheme {
        match self {
            Title::Badshah => TitleTheme {
                icon: "♔",
                class: "badshah",
                description: "The King",
            },
            Title::Wazir => TitleTheme {
                icon: "♜",
                class: "wazir",
                description: "The Advisor",
            },
            Title::Sepahi => TitleTheme {
                icon: "⚔",
                class: "sepahi",
                description: "The Soldier",
            },
            Title::Dallah => TitleTheme {
                icon: "♠",
                class: "dallah",
                description: "The Pimp",
            },
            Title::Gashti => TitleTheme {
                icon: "♥",
                class: "gashti",
                description: "The Whore",
            },
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Title {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Title::ALL
            .iter()
            .find(|t| t.name() == s)
            .copied()
            .ok_or_else(|| GameError::UnknownTitle(s.to_string()))
    }
}

/// Static display metadata for a title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTheme {
    pub icon: &'static str,
    pub class: &'static str,
    pub description: &'static str,
}

/// Number of players at the table, 3 through 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerCount(u8);

impl PlayerCount {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 6;

    pub fn new(count: u8) -> Result<Self, GameError> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(GameError::InvalidPlayerCount(count))
        }
    }

    /// All supported counts, smallest first
    pub fn all() -> impl Iterator<Item = PlayerCount> {
        (Self::MIN..=Self::MAX).map(PlayerCount)
    }

    pub fn get(&self) -> usize {
        self.0 as usize
    }

    /// The titles that must be handed out each round, one per player
    pub fn titles(&self) -> &'static [Title] {
        use Title::*;

        match self.0 {
            3 => &[Badshah, Sepahi, Gashti],
            4 => &[Badshah, Wazir, Dallah, Gashti],
            5 => &[Badshah, Wazir, Sepahi, Dallah, Gashti],
            _ => &[Badshah, Wazir, Sepahi, Sepahi, Dallah, Gashti],
        }
    }

    /// Distinct titles of the config in config order
    pub fn distinct_titles(&self) -> Vec<Title> {
        let mut seen = Vec::new();
        for title in self.titles() {
            if !seen.contains(title) {
                seen.push(*title);
            }
        }
        seen
    }

    /// Expected number of each title per round, in config order
    pub fn expected_counts(&self) -> Vec<(Title, usize)> {
        self.distinct_titles()
            .into_iter()
            .map(|t| (t, self.titles().iter().filter(|x| **x == t).count()))
            .collect()
    }
}

impl TryFrom<u8> for PlayerCount {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerCount> for u8 {
    fn from(count: PlayerCount) -> Self {
        count.0
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    #[default]
    PlayerCountSection,
    PlayerNamesSection,
    GameSection,
    StatsSection,
}

/// Opaque image reference, stored as a data URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoBlob(pub String);

impl PhotoBlob {
    /// Encode raw image bytes as a base64 data URL
    pub fn from_image_bytes(mime: &str, bytes: &[u8]) -> Result<Self, GameError> {
        use base64::Engine;

        let mime = mime.trim();
        if !mime.starts_with("image/") {
            return Err(GameError::InvalidPhoto(format!(
                "unsupported content type '{}'",
                mime
            )));
        }
        if bytes.is_empty() {
            return Err(GameError::InvalidPhoto("image is empty".to_string()));
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(Self(format!("data:{};base64,{}", mime, encoded)))
    }

    /// Accept an image data URL produced by the browser
    pub fn from_data_url(url: String) -> Result<Self, GameError> {
        if url.starts_with("data:image/") && url.contains(',') {
            Ok(Self(url))
        } else {
            Err(GameError::InvalidPhoto(
                "expected an image data URL".to_string(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    #[serde(default)]
    pub stats: TitleCounts,
}

impl PlayerProfile {
    pub fn new(name: String, count: PlayerCount) -> Self {
        let mut profile = Self {
            name,
            stats: TitleCounts::new(),
        };
        profile.ensure_counters(count);
        profile
    }

    /// Add a zero counter for every title of the config the profile lacks
    pub fn ensure_counters(&mut self, count: PlayerCount) {
        for title in count.titles() {
            self.stats.entry(*title).or_insert(0);
        }
    }
}

/// The whole persisted game: roster, photos, per-player counters and the
/// screen the UI was last on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub schema_version: u32,
    pub player_count: Option<PlayerCount>,
    /// Current roster, in seating order
    pub players: Vec<PlayerId>,
    /// Photos keyed by roster slot
    pub player_photos: BTreeMap<usize, PhotoBlob>,
    /// Every player ever seen, with accumulated counters
    pub profiles: BTreeMap<PlayerId, PlayerProfile>,
    pub current_screen: Screen,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            schema_version: STATE_SCHEMA_VERSION,
            player_count: None,
            players: Vec::new(),
            player_photos: BTreeMap::new(),
            profiles: BTreeMap::new(),
            current_screen: Screen::PlayerCountSection,
        }
    }
}

impl GameState {
    pub fn profile(&self, id: &str) -> Option<&PlayerProfile> {
        self.profiles.get(id)
    }

    /// Find a known player by display name
    pub fn find_player_by_name(&self, name: &str) -> Option<&PlayerId> {
        self.profiles
            .iter()
            .find(|(_, p)| p.name == name)
            .map(|(id, _)| id)
    }

    /// Rostered players with their profiles, in roster order
    pub fn roster(&self) -> impl Iterator<Item = (usize, &PlayerId, Option<&PlayerProfile>)> {
        self.players
            .iter()
            .enumerate()
            .map(|(slot, id)| (slot, id, self.profiles.get(id)))
    }

    pub fn photo(&self, slot: usize) -> Option<&PhotoBlob> {
        self.player_photos.get(&slot)
    }

    /// A full roster seated for the selected player count
    pub fn has_roster(&self) -> bool {
        self.player_count
            .is_some_and(|c| !self.players.is_empty() && self.players.len() == c.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_length_matches_player_count() {
        for count in PlayerCount::all() {
            assert_eq!(count.titles().len(), count.get());
            let total: usize = count.expected_counts().iter().map(|(_, n)| n).sum();
            assert_eq!(total, count.get());
        }
    }

    #[test]
    fn test_six_players_have_two_sepahi() {
        let six = PlayerCount::new(6).unwrap();
        let expected = six.expected_counts();
        assert!(expected.contains(&(Title::Sepahi, 2)));
        assert!(expected
            .iter()
            .filter(|(t, _)| *t != Title::Sepahi)
            .all(|(_, n)| *n == 1));
        assert_eq!(expected.len(), 5);
    }

    #[test]
    fn test_player_count_bounds() {
        assert!(PlayerCount::new(2).is_err());
        assert!(PlayerCount::new(7).is_err());
        assert!(PlayerCount::new(0).is_err());
        assert_eq!(PlayerCount::all().count(), 4);
    }

    #[test]
    fn test_player_count_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<PlayerCount>("9").is_err());
        let count: PlayerCount = serde_json::from_str("4").unwrap();
        assert_eq!(count.get(), 4);
    }

    #[test]
    fn test_only_sepahi_repeats() {
        for title in Title::ALL {
            assert_eq!(title.is_repeatable(), title == Title::Sepahi);
        }
    }

    #[test]
    fn test_title_parsing() {
        assert_eq!("Wazir".parse::<Title>().unwrap(), Title::Wazir);
        assert!("wazir".parse::<Title>().is_err());
        assert!("".parse::<Title>().is_err());
    }

    #[test]
    fn test_screen_serializes_as_section_id() {
        let json = serde_json::to_string(&Screen::PlayerNamesSection).unwrap();
        assert_eq!(json, "\"playerNamesSection\"");
    }

    #[test]
    fn test_photo_from_bytes() {
        let photo = PhotoBlob::from_image_bytes("image/png", b"abc").unwrap();
        assert_eq!(photo.as_str(), "data:image/png;base64,YWJj");

        assert!(PhotoBlob::from_image_bytes("text/plain", b"abc").is_err());
        assert!(PhotoBlob::from_image_bytes("image/png", b"").is_err());

        assert!(PhotoBlob::from_data_url("data:image/png;base64,AA==".to_string()).is_ok());
        assert!(PhotoBlob::from_data_url("https://example.com/a.png".to_string()).is_err());
    }

    #[test]
    fn test_partial_state_merges_over_defaults() {
        let state: GameState = serde_json::from_str(r#"{"schemaVersion":1}"#).unwrap();
        assert_eq!(state, GameState::default());
    }
}
