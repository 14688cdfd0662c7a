//! Command-line construction for `elixirc` and `mix`, plus source discovery.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::{BuildError, CompilerOptions};

pub const SOURCE_EXTENSION: &str = "ex";
pub const SCRIPT_EXTENSION: &str = "exs";
pub const MIX_CONFIG_FILE: &str = "mix.exs";

/// Prepends a directory to the code path of the compiling VM.
const ADD_PATH_TO_FRONT_OF_CODE_PATH: &str = "-pa";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildTarget {
    #[default]
    Production,
    Tests,
}

impl BuildTarget {
    /// Extension of the files this target compiles.
    pub fn extension(self) -> &'static str {
        match self {
            BuildTarget::Production => SOURCE_EXTENSION,
            BuildTarget::Tests => SCRIPT_EXTENSION,
        }
    }

    pub fn mix_task(self) -> &'static str {
        match self {
            BuildTarget::Production => "compile",
            BuildTarget::Tests => "test",
        }
    }
}

/// Locations of the Elixir executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub elixir: PathBuf,
    pub elixirc: PathBuf,
    /// The `mix` script, run through `elixir`.
    pub mix: PathBuf,
}

impl Default for Toolchain {
    /// Bare executable names, resolved through `PATH`.
    fn default() -> Self {
        Self {
            elixir: PathBuf::from("elixir"),
            elixirc: PathBuf::from("elixirc"),
            mix: PathBuf::from("mix"),
        }
    }
}

impl Toolchain {
    /// Executables under `<home>/bin` of an Elixir installation.
    pub fn from_home(home: &Path) -> Self {
        let bin = home.join("bin");
        Self {
            elixir: bin.join("elixir"),
            elixirc: bin.join("elixirc"),
            mix: bin.join("mix"),
        }
    }
}

/// A fully resolved process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub work_dir: PathBuf,
}

impl BuildCommand {
    /// `elixirc -pa <out> [-pa <dep>]... [flags] -o <out> <files>...`, run inside the output directory.
    pub fn elixirc(
        toolchain: &Toolchain,
        output_dir: &Path,
        code_paths: &[PathBuf],
        options: &CompilerOptions,
        files: &[PathBuf],
    ) -> Self {
        let mut args: Vec<OsString> = Vec::new();
        for dir in std::iter::once(output_dir).chain(code_paths.iter().map(PathBuf::as_path)) {
            args.push(ADD_PATH_TO_FRONT_OF_CODE_PATH.into());
            args.push(dir.into());
        }
        args.extend(options.flags().into_iter().map(OsString::from));
        args.push("-o".into());
        args.push(output_dir.into());
        args.extend(files.iter().map(OsString::from));

        Self {
            program: toolchain.elixirc.clone(),
            args,
            work_dir: output_dir.to_path_buf(),
        }
    }

    /// `elixir <mix> compile|test [flags]`, run inside the project root.
    pub fn mix(
        toolchain: &Toolchain,
        project_root: &Path,
        target: BuildTarget,
        options: &CompilerOptions,
    ) -> Self {
        let mut args: Vec<OsString> = vec![toolchain.mix.clone().into(), target.mix_task().into()];
        args.extend(options.flags().into_iter().map(OsString::from));

        Self {
            program: toolchain.elixir.clone(),
            args,
            work_dir: project_root.to_path_buf(),
        }
    }

    /// File name of the program, for messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_word(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_word(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn shell_word(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@+,".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Files under `roots` with the target's extension, sorted and deduplicated.
///
/// Directories are walked recursively. A root that is a file is kept only if its
/// extension matches.
pub fn collect_sources(roots: &[PathBuf], target: BuildTarget) -> Result<Vec<PathBuf>, BuildError> {
    let extension = target.extension();
    let mut files = Vec::new();
    for root in roots {
        if root.is_dir() {
            walk(root, extension, &mut files)?;
        } else if has_extension(root, extension) {
            files.push(root.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    let entries = fs::read_dir(dir).map_err(|source| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let path = entry
            .map_err(|source| BuildError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_dir() {
            walk(&path, extension, files)?;
        } else if has_extension(&path, extension) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Roots that are directories containing a `mix.exs`.
pub fn find_mix_projects(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .filter(|root| root.join(MIX_CONFIG_FILE).is_file())
        .cloned()
        .collect()
}
