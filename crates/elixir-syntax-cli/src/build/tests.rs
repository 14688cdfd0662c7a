use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use super::{
    BuildCommand, BuildError, BuildRequest, BuildTarget, Builder, CompilerOptions, MessageKind,
    ProcessOutput, ProcessRunner, Toolchain,
};

/// Records commands and answers with a canned output.
struct FakeRunner {
    output: ProcessOutput,
    seen: RefCell<Vec<BuildCommand>>,
}

impl FakeRunner {
    fn new(status: i32, stderr: &str) -> Self {
        Self {
            output: ProcessOutput {
                status: Some(status),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl ProcessRunner for &FakeRunner {
    fn run(&self, command: &BuildCommand) -> Result<ProcessOutput, BuildError> {
        self.seen.borrow_mut().push(command.clone());
        Ok(self.output.clone())
    }
}

fn project() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::write(root.join("lib/a.ex"), "defmodule A do\nend\n").unwrap();
    fs::create_dir_all(root.join("test")).unwrap();
    fs::write(root.join("test/a_test.exs"), "").unwrap();
    (dir, root)
}

#[test]
fn elixirc_build_creates_output_and_collects_warnings() {
    let (_dir, root) = project();
    let output_dir = root.join("_build/ebin");
    let runner = FakeRunner::new(0, "warning: unused alias B\n  lib/a.ex:2\n");
    let builder = Builder::new(&runner, Toolchain::default(), CompilerOptions::default());

    let request = BuildRequest {
        roots: vec![root.join("lib")],
        output_dir: Some(output_dir.clone()),
        ..BuildRequest::default()
    };
    let report = builder.build(&request).unwrap();

    assert!(output_dir.is_dir());
    assert_eq!(report.commands.len(), 1);
    assert_eq!(report.messages.len(), 1);
    assert_eq!(report.messages[0].kind, MessageKind::Warning);
    assert_eq!(report.messages[0].line, Some(2));

    let seen = runner.seen.borrow();
    assert_eq!(seen[0].program_name(), "elixirc");
    assert_eq!(seen[0].work_dir, output_dir);
    assert_eq!(seen[0].args.last(), Some(&root.join("lib/a.ex").into_os_string()));
}

#[test]
fn failing_compiler_returns_messages() {
    let (_dir, root) = project();
    let runner = FakeRunner::new(1, "** (CompileError) lib/a.ex:1: boom\n");
    let builder = Builder::new(&runner, Toolchain::default(), CompilerOptions::default());

    let request = BuildRequest {
        roots: vec![root.clone()],
        output_dir: Some(root.join("out")),
        ..BuildRequest::default()
    };
    let err = builder.build(&request).unwrap_err();
    let BuildError::Failed {
        program,
        status,
        messages,
    } = err
    else {
        panic!("expected a compiler failure");
    };
    assert_eq!(program, "elixirc");
    assert_eq!(status, Some(1));
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, MessageKind::Error);
}

#[test]
fn elixirc_needs_output_directory() {
    let (_dir, root) = project();
    let runner = FakeRunner::new(0, "");
    let builder = Builder::new(&runner, Toolchain::default(), CompilerOptions::default());

    let request = BuildRequest {
        roots: vec![root],
        ..BuildRequest::default()
    };
    assert!(matches!(builder.plan(&request), Err(BuildError::NoOutputDirectory)));
}

#[test]
fn elixirc_cannot_build_tests() {
    let (_dir, root) = project();
    let runner = FakeRunner::new(0, "");
    let builder = Builder::new(&runner, Toolchain::default(), CompilerOptions::default());

    let request = BuildRequest {
        target: BuildTarget::Tests,
        roots: vec![root.clone()],
        output_dir: Some(root.join("out")),
        ..BuildRequest::default()
    };
    assert!(matches!(builder.plan(&request), Err(BuildError::TestsRequireMix)));
}

#[test]
fn no_sources_found() {
    let dir = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new(0, "");
    let builder = Builder::new(&runner, Toolchain::default(), CompilerOptions::default());

    let request = BuildRequest {
        roots: vec![dir.path().to_path_buf()],
        output_dir: Some(dir.path().join("out")),
        ..BuildRequest::default()
    };
    let err = builder.plan(&request).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"no .ex sources found");
}

#[test]
fn mix_runs_per_project_root() {
    let (_dir, root) = project();
    fs::write(root.join("mix.exs"), "").unwrap();
    let runner = FakeRunner::new(0, "");
    let options = CompilerOptions {
        use_mix: true,
        warnings_as_errors: true,
        ..CompilerOptions::default()
    };
    let builder = Builder::new(&runner, Toolchain::default(), options);

    let request = BuildRequest {
        target: BuildTarget::Tests,
        roots: vec![root.clone(), root.join("lib")],
        ..BuildRequest::default()
    };
    builder.build(&request).unwrap();

    let seen = runner.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].work_dir, root);
    insta::assert_snapshot!(seen[0].to_string(), @"elixir mix test --warnings-as-errors");
}

#[test]
fn mix_without_project() {
    let (_dir, root) = project();
    let runner = FakeRunner::new(0, "");
    let options = CompilerOptions {
        use_mix: true,
        ..CompilerOptions::default()
    };
    let builder = Builder::new(&runner, Toolchain::default(), options);

    let request = BuildRequest {
        roots: vec![root],
        ..BuildRequest::default()
    };
    assert!(matches!(builder.build(&request), Err(BuildError::NoMixProject)));
    assert!(runner.seen.borrow().is_empty());
}

#[test]
fn failure_display_names_exit_code() {
    let err = BuildError::Failed {
        program: "mix".to_string(),
        status: Some(2),
        messages: Vec::new(),
    };
    insta::assert_snapshot!(err.to_string(), @"mix failed with exit code 2");

    let err = BuildError::Failed {
        program: "mix".to_string(),
        status: None,
        messages: Vec::new(),
    };
    insta::assert_snapshot!(err.to_string(), @"mix failed (terminated by signal)");
}
