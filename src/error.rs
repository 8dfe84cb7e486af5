use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("vote references unknown option {0}")]
    UnknownOption(String),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("a vote can only be started while the kiosk is browsing")]
    NotBrowsing,
}

#[derive(Debug, Error)]
pub enum KioskError {
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error("option {0} is not offered by this kiosk")]
    UnknownOption(String),
    #[error("vote could not be recorded: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("discord error: {0}")]
    Discord(#[from] serenity::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
    #[error("font unavailable: {0}")]
    Font(String),
}
