//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`.
//! The source commands (lex/tree/quote/check) accept each other's flags,
//! with the ones they ignore hidden from `--help`.

use clap::{Arg, Command};

use super::args::*;

/// Flags understood by at least one source command.
fn source_command_args() -> [Arg; 10] {
    [
        raw_arg(),
        spans_arg(),
        states_arg(),
        columns_arg(),
        strict_arg(),
        json_arg(),
        compact_arg(),
        color_arg(),
        exec_fuel_arg(),
        recursion_fuel_arg(),
    ]
}

/// Add every source command flag not already on `cmd`, hidden.
fn with_hidden_source_command_args(cmd: Command) -> Command {
    source_command_args().into_iter().fold(cmd, |cmd, arg| {
        if cmd.get_arguments().any(|a| a.get_id() == arg.get_id()) {
            cmd
        } else {
            cmd.arg(arg.hide(true))
        }
    })
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("exsyntax")
        .about("Lex, parse and quote Elixir source; delegate builds to elixirc or mix")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(lex_command())
        .subcommand(tree_command())
        .subcommand(quote_command())
        .subcommand(check_command())
        .subcommand(build_command())
}

/// Show the token stream.
pub fn lex_command() -> Command {
    let cmd = Command::new("lex")
        .about("Show the token stream of a source file")
        .override_usage(
            "\
  exsyntax lex <SOURCE>
  exsyntax lex -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  exsyntax lex lib/app.ex              # kinds, text and spans
  exsyntax lex lib/app.ex --states     # with the lexical state stack
  exsyntax lex -s '~r/a/i' --json      # inline source as JSON"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(states_arg())
        .arg(json_arg())
        .arg(compact_arg());

    with_hidden_source_command_args(cmd)
}

/// Show the syntax tree.
pub fn tree_command() -> Command {
    let cmd = Command::new("tree")
        .about("Show the syntax tree of a source file")
        .override_usage(
            "\
  exsyntax tree <SOURCE>
  exsyntax tree -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  exsyntax tree lib/app.ex             # syntax tree
  exsyntax tree lib/app.ex --raw       # include whitespace and comments
  exsyntax tree -s 'a |> b' --spans    # inline source with positions"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(raw_arg())
        .arg(spans_arg())
        .arg(color_arg())
        .arg(exec_fuel_arg())
        .arg(recursion_fuel_arg());

    with_hidden_source_command_args(cmd)
}

/// Print the quoted form.
pub fn quote_command() -> Command {
    let cmd = Command::new("quote")
        .about("Print the quoted form of a source file")
        .override_usage(
            "\
  exsyntax quote <SOURCE>
  exsyntax quote -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  exsyntax quote -s '1 + 2'            # {:+, [line: 1], [1, 2]}
  exsyntax quote lib/app.ex --columns  # with column metadata
  exsyntax quote lib/app.ex --json     # as JSON"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(columns_arg())
        .arg(json_arg())
        .arg(compact_arg())
        .arg(color_arg())
        .arg(exec_fuel_arg())
        .arg(recursion_fuel_arg());

    with_hidden_source_command_args(cmd)
}

/// Validate syntax.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Check a source file for syntax errors")
        .override_usage(
            "\
  exsyntax check <SOURCE>
  exsyntax check -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  exsyntax check lib/app.ex            # errors only
  exsyntax check lib/app.ex --strict   # warnings fail too
  cat lib/app.ex | exsyntax check -    # from stdin"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(strict_arg())
        .arg(color_arg())
        .arg(exec_fuel_arg())
        .arg(recursion_fuel_arg());

    with_hidden_source_command_args(cmd)
}

/// Compile with elixirc or mix.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Compile with elixirc or mix")
        .override_usage(
            "\
  exsyntax build <PATH>... -o <DIR>
  exsyntax build --mix [--tests] <PROJECT>...",
        )
        .after_help(
            r#"EXAMPLES:
  exsyntax build lib -o _build/ebin                 # elixirc on every .ex under lib
  exsyntax build lib -o out --code-path deps/ebin   # with compiled dependencies
  exsyntax build --mix .                            # mix compile
  exsyntax build --mix --tests .                    # mix test
  exsyntax build lib -o out --dry-run               # print the command line"#,
        )
        .arg(build_paths_arg())
        .arg(output_dir_arg())
        .arg(code_path_arg())
        .arg(mix_arg())
        .arg(tests_arg())
        .arg(options_file_arg())
        .arg(no_docs_arg())
        .arg(no_debug_info_arg())
        .arg(warnings_as_errors_arg())
        .arg(ignore_module_conflict_arg())
        .arg(elixir_home_arg())
        .arg(json_arg())
        .arg(dry_run_arg())
}
