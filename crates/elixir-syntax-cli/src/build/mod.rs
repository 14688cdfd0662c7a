//! Build delegation to the Elixir toolchain.
//!
//! Nothing is compiled in-process. A [`Builder`] turns a [`BuildRequest`] into one or
//! more [`BuildCommand`]s, hands each to a [`ProcessRunner`] and parses the console
//! output back into [`BuildMessage`]s.
//!
//! # Architecture
//!
//! ```text
//! BuildRequest + CompilerOptions
//!   → Builder::plan     elixirc (per output dir) or mix (per project root)
//!   → ProcessRunner     SystemRunner spawns the process
//!   → parse_output      per-file errors and warnings
//! ```
//!
//! `elixirc` compiles only production sources (`.ex`); tests (`.exs`) need `mix test`.

mod command;
mod options;
mod output;
mod runner;

#[cfg(test)]
mod output_tests;
#[cfg(test)]
mod tests;

use std::path::PathBuf;

use command::{collect_sources, find_mix_projects};
use output::parse_output;

pub use command::{BuildCommand, BuildTarget, Toolchain};
pub use options::CompilerOptions;
pub use output::{BuildMessage, MessageKind};
pub use runner::{ProcessOutput, ProcessRunner, SystemRunner};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid compiler options in '{}': {source}", .path.display())]
    Options {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no output directory given (use --output)")]
    NoOutputDirectory,

    #[error("no .{extension} sources found")]
    NoSources { extension: &'static str },

    #[error("no mix.exs found in any build root")]
    NoMixProject,

    #[error("elixirc cannot compile tests, use --mix")]
    TestsRequireMix,

    #[error("{program} failed{}", exit_suffix(.status))]
    Failed {
        program: String,
        status: Option<i32>,
        messages: Vec<BuildMessage>,
    },
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    }
}

/// What to build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequest {
    pub target: BuildTarget,
    /// Source files or directories; with mix, the project roots.
    pub roots: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Extra directories with compiled dependencies, added to the code path.
    pub code_paths: Vec<PathBuf>,
}

/// Messages from every command that ran, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub commands: Vec<BuildCommand>,
    pub messages: Vec<BuildMessage>,
}

pub struct Builder<R: ProcessRunner> {
    runner: R,
    toolchain: Toolchain,
    options: CompilerOptions,
}

impl<R: ProcessRunner> Builder<R> {
    pub fn new(runner: R, toolchain: Toolchain, options: CompilerOptions) -> Self {
        Self {
            runner,
            toolchain,
            options,
        }
    }

    /// Resolves the request into command lines without running anything.
    pub fn plan(&self, request: &BuildRequest) -> Result<Vec<BuildCommand>, BuildError> {
        if self.options.use_mix {
            let projects = find_mix_projects(&request.roots);
            if projects.is_empty() {
                return Err(BuildError::NoMixProject);
            }
            return Ok(projects
                .iter()
                .map(|root| BuildCommand::mix(&self.toolchain, root, request.target, &self.options))
                .collect());
        }

        if request.target == BuildTarget::Tests {
            return Err(BuildError::TestsRequireMix);
        }
        let output_dir = request
            .output_dir
            .as_deref()
            .ok_or(BuildError::NoOutputDirectory)?;
        let files = collect_sources(&request.roots, request.target)?;
        if files.is_empty() {
            return Err(BuildError::NoSources {
                extension: request.target.extension(),
            });
        }
        tracing::debug!(files = files.len(), output = %output_dir.display(), "planned elixirc build");

        Ok(vec![BuildCommand::elixirc(
            &self.toolchain,
            output_dir,
            &request.code_paths,
            &self.options,
            &files,
        )])
    }

    /// Plans and runs the build, stopping at the first failing command.
    pub fn build(&self, request: &BuildRequest) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();
        for command in self.plan(request)? {
            if !command.work_dir.exists() {
                std::fs::create_dir_all(&command.work_dir).map_err(|source| BuildError::Io {
                    path: command.work_dir.clone(),
                    source,
                })?;
            }

            let output = self.runner.run(&command)?;
            let mut messages = parse_output(&output.stdout);
            messages.extend(parse_output(&output.stderr));

            if !output.success() {
                tracing::warn!(%command, status = ?output.status, "compiler failed");
                return Err(BuildError::Failed {
                    program: command.program_name(),
                    status: output.status,
                    messages,
                });
            }
            report.messages.extend(messages);
            report.commands.push(command);
        }
        Ok(report)
    }
}
