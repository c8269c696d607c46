use std::time::Duration;

use thiserror::Error;

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("spawn failed: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("non-zero exit code {code}: {output}")]
    NonZeroExit { code: i32, output: String },
    #[error("killed by signal: {output}")]
    KilledBySignal { output: String },
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
