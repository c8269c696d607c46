use std::process::ExitStatus;

use async_trait::async_trait;
use tokio::{
    io::AsyncReadExt,
    process::{Child, Command},
};
use tracing::{debug, trace};

use crate::{
    error::{ExecError, ExecResult},
    proc::{CommandOutput, CommandRunner, CommandSpec},
};

/// Runs commands as local child processes via `tokio::process`.
pub struct ProcessRunner {
    name: &'static str,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self { name: "process" }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
#[async_trait]
impl CommandRunner for ProcessRunner {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, spec: &CommandSpec) -> ExecResult<CommandOutput> {
        use std::process::Stdio;

        let (read_end, write_end) = super::pipe::combined_pipe()?;
        let stderr_end = write_end.try_clone()?;

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(write_end))
            .stderr(Stdio::from(stderr_end))
            .kill_on_drop(true);

        trace!(target: "noaas.exec.proc", program = ?spec.program, "spawn");
        let mut child = cmd.spawn().map_err(ExecError::Spawn)?;
        // The command still holds the parent's copies of the write end; EOF on
        // the read end only arrives once they are closed.
        drop(cmd);

        let mut reader = tokio::fs::File::from_std(std::fs::File::from(read_end));

        let (status, output) = match spec.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, collect(&mut reader, &mut child)).await {
                    Ok(res) => res?,
                    Err(_) => {
                        debug!(target: "noaas.exec.proc", ?limit, "timed out; killing child");
                        let _ = child.kill().await;
                        return Err(ExecError::TimedOut(limit));
                    }
                }
            }
            None => collect(&mut reader, &mut child).await?,
        };

        debug!(target: "noaas.exec.proc", code = ?status.code(), bytes = output.len(), "exited");
        Ok(CommandOutput {
            code: status.code(),
            output,
        })
    }
}

#[cfg(not(unix))]
#[async_trait]
impl CommandRunner for ProcessRunner {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, _spec: &CommandSpec) -> ExecResult<CommandOutput> {
        Err(ExecError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "combined output capture requires a unix platform",
        )))
    }
}

async fn collect(
    reader: &mut tokio::fs::File,
    child: &mut Child,
) -> std::io::Result<(ExitStatus, Vec<u8>)> {
    let mut output = Vec::new();
    reader.read_to_end(&mut output).await?;
    let status = child.wait().await?;
    Ok((status, output))
}
