//! # Gesture Connect Four
//!
//! Connect Four driven by hand gestures: a closed fist grabs the waiting
//! disc, an open palm drops it, a victory sign arms a bomb and a held
//! thumbs-up starts a game. Discs fall with simple physics, bombs clear
//! their neighbourhood and the columns collapse afterwards.
//!
//! ## Modules
//!
//! - [`game`]: Board, win detection, drop physics, bombs and the frame-driven controller
//! - [`input`]: Gesture samples, the bomb-toggle debounce, scripted input
//! - [`ui`]: Terminal front-end with a keyboard-simulated hand
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod ui;
