//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.
//! The same definition is reused across commands with different visibility
//! (via `.hide(true)`).

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Source file (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .value_parser(value_parser!(PathBuf))
        .help("Elixir source file ('-' for stdin)")
}

/// Inline source text (-s/--source).
pub fn source_text_arg() -> Arg {
    Arg::new("source_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .help("Inline source text")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Include trivia (--raw).
pub fn raw_arg() -> Arg {
    Arg::new("raw")
        .long("raw")
        .action(ArgAction::SetTrue)
        .help("Include trivia (whitespace, comments)")
}

/// Show source positions (--spans).
pub fn spans_arg() -> Arg {
    Arg::new("spans")
        .long("spans")
        .action(ArgAction::SetTrue)
        .help("Show source positions")
}

/// Show the lexical state stack (--states).
pub fn states_arg() -> Arg {
    Arg::new("states")
        .long("states")
        .action(ArgAction::SetTrue)
        .help("Show the lexical state stack after each token")
}

/// Add `column:` to quoted metadata (--columns).
pub fn columns_arg() -> Arg {
    Arg::new("columns")
        .long("columns")
        .action(ArgAction::SetTrue)
        .help("Include columns in quoted metadata")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Output JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output JSON")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON (default: pretty)")
}

/// Parser execution fuel (--exec-fuel).
pub fn exec_fuel_arg() -> Arg {
    Arg::new("exec_fuel")
        .long("exec-fuel")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Parser operation limit (default: unlimited)")
}

/// Parser nesting limit (--recursion-fuel).
pub fn recursion_fuel_arg() -> Arg {
    Arg::new("recursion_fuel")
        .long("recursion-fuel")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Nesting depth limit (default: 512)")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .global(true)
        .help("Verbosity level (-v for debug logs, -vv for trace logs)")
}

/// Files or directories to build (positional, repeatable).
pub fn build_paths_arg() -> Arg {
    Arg::new("paths")
        .value_name("PATH")
        .num_args(1..)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Source files, source directories or mix project roots")
}

/// Output directory for .beam files (-o/--output).
pub fn output_dir_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Output directory for compiled modules (elixirc only)")
}

/// Extra code path (--code-path, repeatable).
pub fn code_path_arg() -> Arg {
    Arg::new("code_path")
        .long("code-path")
        .value_name("DIR")
        .action(ArgAction::Append)
        .value_parser(value_parser!(PathBuf))
        .help("Directory with compiled dependencies, prepended to the code path")
}

/// Elixir installation (--elixir-home).
pub fn elixir_home_arg() -> Arg {
    Arg::new("elixir_home")
        .long("elixir-home")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Elixir installation to use (default: executables on PATH)")
}

/// Compiler options file (--options).
pub fn options_file_arg() -> Arg {
    Arg::new("options_file")
        .long("options")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("JSON file with compiler options (flags below override it)")
}

/// Build tests instead of production sources (--tests).
pub fn tests_arg() -> Arg {
    Arg::new("tests")
        .long("tests")
        .action(ArgAction::SetTrue)
        .help("Build tests (.exs) instead of sources (.ex); requires --mix")
}

/// Delegate to mix (--mix).
pub fn mix_arg() -> Arg {
    Arg::new("mix")
        .long("mix")
        .action(ArgAction::SetTrue)
        .help("Build with mix instead of elixirc")
}

pub fn no_docs_arg() -> Arg {
    Arg::new("no_docs")
        .long("no-docs")
        .action(ArgAction::SetTrue)
        .help("Do not attach documentation to compiled modules")
}

pub fn no_debug_info_arg() -> Arg {
    Arg::new("no_debug_info")
        .long("no-debug-info")
        .action(ArgAction::SetTrue)
        .help("Do not attach debug info to compiled modules")
}

pub fn warnings_as_errors_arg() -> Arg {
    Arg::new("warnings_as_errors")
        .long("warnings-as-errors")
        .action(ArgAction::SetTrue)
        .help("Fail the build on compiler warnings")
}

pub fn ignore_module_conflict_arg() -> Arg {
    Arg::new("ignore_module_conflict")
        .long("ignore-module-conflict")
        .action(ArgAction::SetTrue)
        .help("Do not warn when a module is redefined")
}

/// Print commands without running them (--dry-run).
pub fn dry_run_arg() -> Arg {
    Arg::new("dry_run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("Print the compiler command lines without running them")
}
