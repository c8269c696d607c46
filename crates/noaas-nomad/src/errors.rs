use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("invalid scheduler address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    #[error("scheduler request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scheduler rejected {op} with status {status}: {body}")]
    Status {
        op: &'static str,
        status: u16,
        body: String,
    },
}
