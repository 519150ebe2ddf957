//! Things that happened during a tick, for logging and side effects.

use serde::{Deserialize, Serialize};

use super::bomb::Movement;
use super::{DiscKind, Player, Position};

/// The fire-and-forget sounds a front-end can attach to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    DiscPlaced,
    DiscGrabbed,
    GameStarted,
    GameWon,
    BombExploded,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::DiscPlaced => "disc-placed",
            SoundCue::DiscGrabbed => "disc-grabbed",
            SoundCue::GameStarted => "game-started",
            SoundCue::GameWon => "game-won",
            SoundCue::BombExploded => "bomb-exploded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Thumb-up held long enough; a fresh game began.
    GameStarted,
    DiscGrabbed {
        player: Player,
    },
    BombToggled {
        player: Player,
        armed: bool,
    },
    /// A disc was released over a column with room and is now falling.
    DiscDropped {
        player: Player,
        target: Position,
        kind: DiscKind,
    },
    DiscSettled {
        player: Player,
        position: Position,
        kind: DiscKind,
    },
    GameWon {
        player: Player,
        positions: Vec<Position>,
    },
    GameDrawn,
    BombExploded {
        player: Player,
        position: Position,
        cleared: Vec<Position>,
    },
    GravityApplied {
        movements: Vec<Movement>,
    },
    /// The post-bomb pause is over.
    InputResumed,
    /// The game-over display ran out; back to the landing screen.
    ReturnedToLanding,
}

impl GameEvent {
    /// Sound to play for this event, if any.
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::GameStarted => Some(SoundCue::GameStarted),
            GameEvent::DiscGrabbed { .. } | GameEvent::BombToggled { .. } => {
                Some(SoundCue::DiscGrabbed)
            }
            GameEvent::DiscDropped { .. } => Some(SoundCue::DiscPlaced),
            GameEvent::GameWon { .. } => Some(SoundCue::GameWon),
            GameEvent::BombExploded { .. } => Some(SoundCue::BombExploded),
            GameEvent::DiscSettled { .. }
            | GameEvent::GameDrawn
            | GameEvent::GravityApplied { .. }
            | GameEvent::InputResumed
            | GameEvent::ReturnedToLanding => None,
        }
    }
}
