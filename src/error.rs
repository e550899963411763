use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
