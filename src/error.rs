use std::path::PathBuf;

/// Reasons an input was not acted on. None of these change game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("no game in progress")]
    NotPlaying,

    #[error("game is over")]
    GameOver,

    #[error("input suspended while a bomb resolves")]
    InputSuspended,

    #[error("disc is already grabbed")]
    AlreadyGrabbed,

    #[error("hand is too far from the disc to grab it")]
    OutOfReach,

    #[error("no disc is grabbed")]
    NotGrabbed,

    #[error("release was not over a board column")]
    InvalidColumn,

    #[error("column is full")]
    ColumnFull,

    #[error("no bombs left")]
    NoBombs,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
