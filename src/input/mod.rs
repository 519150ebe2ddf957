//! Gesture input: the samples the recognizer hands us each frame, the
//! bomb-toggle debounce, and scripted streams for headless play.

mod debounce;
mod gesture;
pub mod script;

pub use debounce::ToggleDebounce;
pub use gesture::{tracked, Gesture, GestureFrame, HandSample};
pub use script::{demo_game, read_json_lines, GestureScript, ScriptedTick};
