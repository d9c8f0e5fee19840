use thiserror::Error;

/// User-facing errors. The core transforms never fail; errors only arise
/// from configuration and file handling at the tool boundary.
#[derive(Error, Debug)]
pub enum SqlprettyError {
    #[error("sqlpretty config error: {0}")]
    Config(String),

    #[error("sqlpretty equivalence error: {0}")]
    Equivalence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SqlprettyError>;
