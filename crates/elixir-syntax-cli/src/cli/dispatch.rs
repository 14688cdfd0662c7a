//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `from_matches()` pulls the relevant fields, ignoring hidden ones
//! - `From<*Params>` impls bridge dispatch to command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use elixir_syntax::ParseOptions;

use super::ColorChoice;
use crate::commands::build::BuildArgs;
use crate::commands::check::CheckArgs;
use crate::commands::lex::LexArgs;
use crate::commands::quote::QuoteArgs;
use crate::commands::tree::TreeArgs;

pub struct LexParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub states: bool,
    pub json: bool,
    pub compact: bool,
}

impl LexParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            states: m.get_flag("states"),
            json: m.get_flag("json"),
            compact: m.get_flag("compact"),
        }
    }
}

impl From<LexParams> for LexArgs {
    fn from(p: LexParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            states: p.states,
            json: p.json,
            compact: p.compact,
        }
    }
}

pub struct TreeParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub raw: bool,
    pub spans: bool,
    pub color: ColorChoice,
    pub exec_fuel: Option<u32>,
    pub recursion_fuel: Option<u32>,
}

impl TreeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            raw: m.get_flag("raw"),
            spans: m.get_flag("spans"),
            color: parse_color(m),
            exec_fuel: m.get_one::<u32>("exec_fuel").copied(),
            recursion_fuel: m.get_one::<u32>("recursion_fuel").copied(),
        }
    }
}

impl From<TreeParams> for TreeArgs {
    fn from(p: TreeParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            raw: p.raw,
            spans: p.spans,
            color: p.color.colors_diagnostics(),
            parse_options: parse_options(p.exec_fuel, p.recursion_fuel),
        }
    }
}

pub struct QuoteParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub columns: bool,
    pub json: bool,
    pub compact: bool,
    pub color: ColorChoice,
    pub exec_fuel: Option<u32>,
    pub recursion_fuel: Option<u32>,
}

impl QuoteParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            columns: m.get_flag("columns"),
            json: m.get_flag("json"),
            compact: m.get_flag("compact"),
            color: parse_color(m),
            exec_fuel: m.get_one::<u32>("exec_fuel").copied(),
            recursion_fuel: m.get_one::<u32>("recursion_fuel").copied(),
        }
    }
}

impl From<QuoteParams> for QuoteArgs {
    fn from(p: QuoteParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            columns: p.columns,
            json: p.json,
            compact: p.compact,
            color: p.color.colors_diagnostics(),
            parse_options: parse_options(p.exec_fuel, p.recursion_fuel),
        }
    }
}

pub struct CheckParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub strict: bool,
    pub color: ColorChoice,
    pub exec_fuel: Option<u32>,
    pub recursion_fuel: Option<u32>,
    // Note: raw, spans, states, columns, json, compact are parsed but not extracted
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
            exec_fuel: m.get_one::<u32>("exec_fuel").copied(),
            recursion_fuel: m.get_one::<u32>("recursion_fuel").copied(),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            strict: p.strict,
            color: p.color.colors_diagnostics(),
            parse_options: parse_options(p.exec_fuel, p.recursion_fuel),
        }
    }
}

pub struct BuildParams {
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

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            paths: paths(m, "paths"),
            output: m.get_one::<PathBuf>("output").cloned(),
            code_paths: paths(m, "code_path"),
            mix: m.get_flag("mix"),
            tests: m.get_flag("tests"),
            options_file: m.get_one::<PathBuf>("options_file").cloned(),
            no_docs: m.get_flag("no_docs"),
            no_debug_info: m.get_flag("no_debug_info"),
            warnings_as_errors: m.get_flag("warnings_as_errors"),
            ignore_module_conflict: m.get_flag("ignore_module_conflict"),
            elixir_home: m.get_one::<PathBuf>("elixir_home").cloned(),
            json: m.get_flag("json"),
            dry_run: m.get_flag("dry_run"),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            paths: p.paths,
            output: p.output,
            code_paths: p.code_paths,
            mix: p.mix,
            tests: p.tests,
            options_file: p.options_file,
            no_docs: p.no_docs,
            no_debug_info: p.no_debug_info,
            warnings_as_errors: p.warnings_as_errors,
            ignore_module_conflict: p.ignore_module_conflict,
            elixir_home: p.elixir_home,
            json: p.json,
            dry_run: p.dry_run,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    ColorChoice::from_flag(m.get_one::<String>("color").map(String::as_str))
}

fn paths(m: &ArgMatches, id: &str) -> Vec<PathBuf> {
    m.get_many::<PathBuf>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Fuel flags override the defaults only when given.
fn parse_options(exec_fuel: Option<u32>, recursion_fuel: Option<u32>) -> ParseOptions {
    let mut options = ParseOptions::new();
    if exec_fuel.is_some() {
        options = options.exec_fuel(exec_fuel);
    }
    if recursion_fuel.is_some() {
        options = options.recursion_fuel(recursion_fuel);
    }
    options
}
