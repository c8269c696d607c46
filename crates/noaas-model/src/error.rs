use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("service name must not be empty")]
    EmptyName,
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid url `{url}`: scheme `{scheme}` is not http or https")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("incomplete address `{host}:{port}`")]
    IncompleteAddress { host: String, port: u16 },
}
