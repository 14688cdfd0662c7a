//! Delegate compilation to elixirc or mix.

use std::path::{Path, PathBuf};

use crate::build::{
    BuildError, BuildMessage, BuildRequest, BuildTarget, Builder, CompilerOptions, MessageKind,
    SystemRunner, Toolchain,
};

pub struct BuildArgs {
    pub paths: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub code_paths: Vec<PathBuf>,
    pub mix: bool,
    pub tests: bool,
    pub options_file: Option<PathBuf>,
    pub no_docs: bool,
    pub no_debug_info: bool,
    pub warnings_as_errors: bool,
    pub ignore_module_conflict: bool,
    pub elixir_home: Option<PathBuf>,
    pub json: bool,
    pub dry_run: bool,
}

pub fn run(args: BuildArgs) {
    let options = compiler_options(&args).unwrap_or_else(|e| exit_with(&e));
    let toolchain = args
        .elixir_home
        .as_deref()
        .map(Toolchain::from_home)
        .unwrap_or_default();
    let request = build_request(&args);
    let builder = Builder::new(SystemRunner, toolchain, options);

    if args.dry_run {
        let commands = builder.plan(&request).unwrap_or_else(|e| exit_with(&e));
        for command in commands {
            println!("{}", command);
        }
        return;
    }

    match builder.build(&request) {
        Ok(report) => {
            tracing::debug!(commands = report.commands.len(), "build finished");
            print_messages(&report.messages, args.json);
        }
        Err(e) => {
            if let BuildError::Failed { messages, .. } = &e {
                print_messages(messages, args.json);
            }
            exit_with(&e);
        }
    }
}

/// Options file (or defaults) with command-line flags applied on top.
pub fn compiler_options(args: &BuildArgs) -> Result<CompilerOptions, BuildError> {
    let mut options = match &args.options_file {
        Some(path) => CompilerOptions::load(path)?,
        None => CompilerOptions::default(),
    };
    options.use_mix |= args.mix;
    options.attach_docs &= !args.no_docs;
    options.attach_debug_info &= !args.no_debug_info;
    options.warnings_as_errors |= args.warnings_as_errors;
    options.ignore_module_conflict |= args.ignore_module_conflict;
    Ok(options)
}

/// Paths are made absolute: elixirc runs inside the output directory.
pub fn build_request(args: &BuildArgs) -> BuildRequest {
    BuildRequest {
        target: if args.tests {
            BuildTarget::Tests
        } else {
            BuildTarget::Production
        },
        roots: args.paths.iter().map(|p| absolute(p)).collect(),
        output_dir: args.output.as_deref().map(absolute),
        code_paths: args.code_paths.iter().map(|p| absolute(p)).collect(),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn print_messages(messages: &[BuildMessage], json: bool) {
    if json {
        match serde_json::to_string_pretty(messages) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }
    // Progress on stdout, problems on stderr, as the compiler does.
    for message in messages {
        match message.kind {
            MessageKind::Info => println!("{}", message),
            MessageKind::Error | MessageKind::Warning => eprintln!("{}", message),
        }
    }
}

fn exit_with(error: &BuildError) -> ! {
    eprintln!("error: {}", error);
    std::process::exit(1);
}
