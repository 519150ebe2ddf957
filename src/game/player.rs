use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::One => "Orange",
            Player::Two => "Blue",
        }
    }

    /// Stable index for per-player tables
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Disc color as an RGB triple
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Player::One => (0xef, 0x7d, 0x00),
            Player::Two => (0x00, 0x9a, 0xd4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.other(), Player::One);
    }

    #[test]
    fn test_player_name() {
        assert_eq!(Player::One.name(), "Orange");
        assert_eq!(Player::Two.name(), "Blue");
    }

    #[test]
    fn test_player_index_is_distinct() {
        assert_ne!(Player::One.index(), Player::Two.index());
    }
}
