use std::{sync::Arc, time::Duration};

use tracing::{debug, instrument, warn};

use crate::{
    error::{ExecError, ExecResult},
    proc::{CommandRunner, CommandSpec, ProcessRunner},
};

const DEFAULT_SHELL: &str = "/bin/sh";

/// Script executor settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecConfig {
    /// Kill the script after this long. `None` lets it run to completion.
    pub timeout: Option<Duration>,
}

/// Runs fetched content as `/bin/sh -c <content>`.
///
/// This is a remote-code-execution primitive: see the crate-level docs.
#[derive(Clone)]
pub struct ScriptExecutor {
    runner: Arc<dyn CommandRunner>,
    shell: &'static str,
    cfg: ExecConfig,
}

impl ScriptExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            shell: DEFAULT_SHELL,
            cfg: ExecConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: ExecConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the invocation for `script` without running it.
    pub fn command_for(&self, script: &[u8]) -> CommandSpec {
        CommandSpec::new(self.shell)
            .arg("-c")
            .arg(script_arg(script))
            .with_timeout(self.cfg.timeout)
    }

    /// Execute `script` and return its interleaved stdout/stderr.
    ///
    /// Fails on launch errors, non-zero exit, death by signal or timeout; the
    /// captured output is carried in the error.
    #[instrument(level = "debug", skip_all, fields(runner = self.runner.name(), bytes = script.len()))]
    pub async fn execute(&self, script: &[u8]) -> ExecResult<String> {
        let spec = self.command_for(script);
        let out = self.runner.run(&spec).await?;

        match out.code {
            Some(0) => {
                debug!(bytes = out.output.len(), "script succeeded");
                Ok(out.output_lossy())
            }
            Some(code) => {
                warn!(code, "script exited non-zero");
                Err(ExecError::NonZeroExit {
                    code,
                    output: out.output_lossy(),
                })
            }
            None => {
                warn!("script terminated by signal");
                Err(ExecError::KilledBySignal {
                    output: out.output_lossy(),
                })
            }
        }
    }
}

impl Default for ScriptExecutor {
    fn default() -> Self {
        Self::new(Arc::new(ProcessRunner::new()))
    }
}

#[cfg(unix)]
fn script_arg(script: &[u8]) -> std::ffi::OsString {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(script).to_os_string()
}

#[cfg(not(unix))]
fn script_arg(script: &[u8]) -> std::ffi::OsString {
    String::from_utf8_lossy(script).into_owned().into()
}
