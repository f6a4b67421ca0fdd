use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransferError>;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to fetch {context}: {message}")]
    Fetch { context: String, message: String },
    #[error("Fetching {0} timed out")]
    Timeout(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Parsing error")]
    Parse,
    #[error("Session error: {0} {1}")]
    Session(String, String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TransferError {
    pub fn fetch(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}

impl From<toml::de::Error> for TransferError {
    fn from(value: toml::de::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<toml::ser::Error> for TransferError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Config(value.to_string())
    }
}
