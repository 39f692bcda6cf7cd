use serde::{Deserialize, Serialize};

/// Game mode of a competitive event
///
/// The mode fixes the exact number of players a roster must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "game_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Solo,
    Duo,
    Squad,
    #[serde(rename = "2v2")]
    TwoVsTwo,
    #[serde(rename = "4v4")]
    FourVsFour,
    #[serde(rename = "5v5")]
    FiveVsFive,
}

impl GameMode {
    /// Number of players a valid roster must have for this mode
    ///
    /// Exact, never a minimum: Solo=1, Duo/2v2=2, Squad/4v4=4, 5v5=5.
    pub fn required_players(&self) -> usize {
        match self {
            GameMode::Solo => 1,
            GameMode::Duo | GameMode::TwoVsTwo => 2,
            GameMode::Squad | GameMode::FourVsFour => 4,
            GameMode::FiveVsFive => 5,
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Solo => write!(f, "solo"),
            GameMode::Duo => write!(f, "duo"),
            GameMode::Squad => write!(f, "squad"),
            GameMode::TwoVsTwo => write!(f, "2v2"),
            GameMode::FourVsFour => write!(f, "4v4"),
            GameMode::FiveVsFive => write!(f, "5v5"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_players_per_mode() {
        assert_eq!(GameMode::Solo.required_players(), 1);
        assert_eq!(GameMode::Duo.required_players(), 2);
        assert_eq!(GameMode::TwoVsTwo.required_players(), 2);
        assert_eq!(GameMode::Squad.required_players(), 4);
        assert_eq!(GameMode::FourVsFour.required_players(), 4);
        assert_eq!(GameMode::FiveVsFive.required_players(), 5);
    }

    #[test]
    fn mode_display() {
        assert_eq!(GameMode::Solo.to_string(), "solo");
        assert_eq!(GameMode::TwoVsTwo.to_string(), "2v2");
        assert_eq!(GameMode::FiveVsFive.to_string(), "5v5");
    }
}
