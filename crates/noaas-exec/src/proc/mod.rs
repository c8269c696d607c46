use std::{ffi::OsString, time::Duration};

use async_trait::async_trait;

use crate::error::ExecResult;

#[cfg(unix)]
mod pipe;

mod process;
pub use process::ProcessRunner;

/// A program invocation handed to a [`CommandRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Wall-clock limit; the child is killed when it is exceeded.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of a finished command: exit code (`None` when killed by a signal)
/// and stdout/stderr interleaved in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub output: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Command execution capability.
///
/// The provisioning pipeline never spawns processes directly; it goes through
/// this trait so the primitive can be replaced (a sandboxing runner, a fake in
/// tests) without touching the pipeline.
#[async_trait]
pub trait CommandRunner: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Run the command to completion and capture its combined output.
    ///
    /// A non-zero exit is *not* an error at this level; callers inspect
    /// [`CommandOutput::code`].
    async fn run(&self, spec: &CommandSpec) -> ExecResult<CommandOutput>;
}
