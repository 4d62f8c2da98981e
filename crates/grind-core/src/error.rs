use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrindError {
    #[error("no routine accepts request kind '{0}'")]
    UnsupportedRoutine(String),

    #[error("character not found: {0}")]
    CharacterNotFound(String),

    #[error("no active routine for character: {0}")]
    RoutineNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("game API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GrindError>;
