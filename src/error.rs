use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {message}")]
    Provider { status: String, message: String },
    #[error("provider only accepts coordinates, got address {0:?}")]
    UnsupportedLocation(String),
    #[error("stop spacing must be at least one meter")]
    InvalidSpacing,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
