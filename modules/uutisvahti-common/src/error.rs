use thiserror::Error;

#[derive(Error, Debug)]
pub enum UutisvahtiError {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
