//! Process execution seam. The builder only sees [`ProcessRunner`], so tests run
//! without an Elixir installation.

use std::process::{Command, Stdio};

use super::{BuildCommand, BuildError};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

pub trait ProcessRunner {
    fn run(&self, command: &BuildCommand) -> Result<ProcessOutput, BuildError>;
}

/// Spawns real processes and waits for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &BuildCommand) -> Result<ProcessOutput, BuildError> {
        tracing::debug!(%command, work_dir = %command.work_dir.display(), "spawning compiler");

        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| BuildError::Spawn {
                program: command.program_name(),
                source,
            })?;

        let output = ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(status = ?output.status, "compiler exited");
        Ok(output)
    }
}
