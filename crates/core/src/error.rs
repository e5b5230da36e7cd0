use thiserror::Error;

#[derive(Error, Debug)]
pub enum DowntimeError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DowntimeError>;
