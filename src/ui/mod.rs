//! Terminal front-end: a keyboard stand-in for the hand tracker and a canvas
//! view of the game.

mod app;
mod game_view;
mod hand;

pub use app::{viewport_for, App, UiConfig};
pub use hand::SimulatedHand;
