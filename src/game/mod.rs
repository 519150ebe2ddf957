//! Core game logic: board, win detection, falling discs, bombs and the
//! controller that drives a game frame by frame.

pub mod animation;
mod board;
pub mod bomb;
mod controller;
mod events;
pub mod layout;
mod player;
mod snapshot;
mod win;

pub use board::{Board, Cell, Disc, DiscKind, Position, DEFAULT_COLS, DEFAULT_ROWS};
pub use controller::{
    ActiveDisc, GameController, GameOutcome, Phase, PreviewDisc, Round, RulesConfig, TimingConfig,
};
pub use events::{GameEvent, SoundCue};
pub use player::Player;
pub use snapshot::GameSnapshot;
pub use win::{check_win, CONNECT};
