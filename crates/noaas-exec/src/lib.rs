//! Execution of fetched content as a shell script.
//!
//! # Trust boundary
//!
//! [`ScriptExecutor::execute`] runs caller-supplied bytes through `/bin/sh -c`
//! with the privileges of the current process. There is no sandboxing, no
//! resource limiting and no inspection of the content. Enabling script mode is
//! a direct remote-code-execution capability; any isolation has to be provided
//! by a [`CommandRunner`] implementation or by the environment the service is
//! deployed into.

mod error;
pub use error::{ExecError, ExecResult};

pub mod proc;
pub use proc::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};

mod script;
pub use script::{ExecConfig, ScriptExecutor};

