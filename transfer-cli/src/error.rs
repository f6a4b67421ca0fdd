use content_transfer::TransferError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No catalog given, pass --catalog")]
    CatalogMissing,

    #[error("Could not open {0}")]
    Redirected(String),

    #[error("Loading {0} failed, see the log for details")]
    FetchFailed(String),

    #[error("Nothing is being browsed")]
    NothingBrowsed,

    #[error("{0} is not a selectable row of the current topic")]
    NoSuchRow(String),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
