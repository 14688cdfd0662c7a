//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Unified flags: source commands accept each other's flags without error
//! 2. Help visibility: hidden flags don't appear in --help
//! 3. Params extraction: correct fields are extracted from ArgMatches

use std::path::PathBuf;

use elixir_syntax::ParseOptions;

use super::*;
use crate::cli::commands::{
    build_command, check_command, lex_command, quote_command, tree_command,
};
use crate::commands::build::BuildArgs;
use crate::commands::quote::QuoteArgs;
use crate::commands::tree::TreeArgs;

fn help_text(mut cmd: clap::Command) -> String {
    cmd.render_help().to_string()
}

#[test]
fn lex_extracts_flags() {
    let m = lex_command()
        .try_get_matches_from(["lex", "app.ex", "--states", "--json"])
        .unwrap();
    let params = LexParams::from_matches(&m);
    assert_eq!(params.source_path, Some(PathBuf::from("app.ex")));
    assert!(params.states);
    assert!(params.json);
    assert!(!params.compact);
}

#[test]
fn lex_accepts_tree_flags() {
    let result = lex_command().try_get_matches_from(["lex", "app.ex", "--raw", "--exec-fuel", "10"]);
    assert!(
        result.is_ok(),
        "lex should accept tree flags: {:?}",
        result.err()
    );
}

#[test]
fn tree_extracts_flags() {
    let m = tree_command()
        .try_get_matches_from(["tree", "-s", "a + b", "--raw", "--spans", "--color", "never"])
        .unwrap();
    let params = TreeParams::from_matches(&m);
    assert_eq!(params.source_text.as_deref(), Some("a + b"));
    assert_eq!(params.source_path, None);
    assert!(params.raw);
    assert!(params.spans);
    assert_eq!(params.color, ColorChoice::Never);

    let args: TreeArgs = params.into();
    assert!(!args.color);
    assert_eq!(args.parse_options, ParseOptions::default());
}

#[test]
fn tree_accepts_quote_and_check_flags() {
    let result =
        tree_command().try_get_matches_from(["tree", "app.ex", "--columns", "--strict", "--compact"]);
    assert!(
        result.is_ok(),
        "tree should accept quote/check flags: {:?}",
        result.err()
    );
}

#[test]
fn quote_extracts_flags() {
    let m = quote_command()
        .try_get_matches_from(["quote", "app.ex", "--columns", "--json", "--compact"])
        .unwrap();
    let params = QuoteParams::from_matches(&m);
    assert!(params.columns);
    assert!(params.json);
    assert!(params.compact);
}

#[test]
fn fuel_flags_override_defaults() {
    let m = quote_command()
        .try_get_matches_from(["quote", "app.ex", "--exec-fuel", "100", "--recursion-fuel", "8"])
        .unwrap();
    let args: QuoteArgs = QuoteParams::from_matches(&m).into();
    assert_eq!(args.parse_options.exec_fuel, Some(100));
    assert_eq!(args.parse_options.recursion_fuel, Some(8));

    let m = quote_command()
        .try_get_matches_from(["quote", "app.ex", "--exec-fuel", "100"])
        .unwrap();
    let args: QuoteArgs = QuoteParams::from_matches(&m).into();
    assert_eq!(
        args.parse_options.recursion_fuel,
        ParseOptions::default().recursion_fuel
    );
}

#[test]
fn invalid_fuel_is_rejected() {
    let result = check_command().try_get_matches_from(["check", "app.ex", "--exec-fuel", "lots"]);
    assert!(result.is_err());
}

#[test]
fn check_extracts_flags() {
    let m = check_command()
        .try_get_matches_from(["check", "-", "--strict", "--json"])
        .unwrap();
    let params = CheckParams::from_matches(&m);
    assert_eq!(params.source_path, Some(PathBuf::from("-")));
    assert!(params.strict);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn check_help_hides_unrelated_flags() {
    let help = help_text(check_command());
    assert!(help.contains("--strict"));
    assert!(!help.contains("--raw"));
    assert!(!help.contains("--columns"));
    assert!(!help.contains("--states"));
}

#[test]
fn quote_help_shows_own_flags() {
    let help = help_text(quote_command());
    assert!(help.contains("--columns"));
    assert!(help.contains("--json"));
    assert!(!help.contains("--spans"));
}

#[test]
fn build_extracts_flags() {
    let m = build_command()
        .try_get_matches_from([
            "build",
            "lib",
            "src",
            "-o",
            "out",
            "--code-path",
            "deps/a",
            "--code-path",
            "deps/b",
            "--no-docs",
            "--warnings-as-errors",
            "--dry-run",
        ])
        .unwrap();
    let params = BuildParams::from_matches(&m);
    assert_eq!(params.paths, [PathBuf::from("lib"), PathBuf::from("src")]);
    assert_eq!(params.output, Some(PathBuf::from("out")));
    assert_eq!(
        params.code_paths,
        [PathBuf::from("deps/a"), PathBuf::from("deps/b")]
    );
    assert!(params.no_docs);
    assert!(!params.no_debug_info);
    assert!(params.warnings_as_errors);
    assert!(params.dry_run);
    assert!(!params.mix);

    let args: BuildArgs = params.into();
    assert!(args.options_file.is_none());
}

#[test]
fn build_requires_paths() {
    let result = build_command().try_get_matches_from(["build", "--mix"]);
    assert!(result.is_err());
}

#[test]
fn verbose_is_global() {
    let m = build_cli()
        .try_get_matches_from(["exsyntax", "lex", "-s", "x", "-vv"])
        .unwrap();
    let (name, sub) = m.subcommand().unwrap();
    assert_eq!(name, "lex");
    assert_eq!(sub.get_count("verbose"), 2);
}

#[test]
fn subcommand_is_required() {
    assert!(build_cli().try_get_matches_from(["exsyntax"]).is_err());
}

#[test]
fn color_flag_values() {
    assert_eq!(ColorChoice::from_flag(Some("always")), ColorChoice::Always);
    assert_eq!(ColorChoice::from_flag(Some("never")), ColorChoice::Never);
    assert_eq!(ColorChoice::from_flag(Some("auto")), ColorChoice::Auto);
    assert_eq!(ColorChoice::from_flag(None), ColorChoice::Auto);
}

#[test]
fn auto_color_follows_stderr() {
    assert!(ColorChoice::Auto.resolve(true));
    assert!(!ColorChoice::Auto.resolve(false));
    assert!(ColorChoice::Always.resolve(false));
    assert!(!ColorChoice::Never.resolve(true));
}
