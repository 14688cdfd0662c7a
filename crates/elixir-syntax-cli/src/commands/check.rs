use std::path::PathBuf;

use elixir_syntax::ParseOptions;

use super::source::{load_source_or_exit, parse_or_exit, print_diagnostics};

pub struct CheckArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub strict: bool,
    pub color: bool,
    pub parse_options: ParseOptions,
}

pub fn run(args: CheckArgs) {
    let source = load_source_or_exit(args.source_text.as_deref(), args.source_path.as_deref());
    let parse = parse_or_exit(&source, args.parse_options);

    let diagnostics = parse.diagnostics();
    let is_valid = if args.strict {
        !diagnostics.has_errors() && !diagnostics.has_warnings()
    } else {
        !diagnostics.has_errors()
    };

    if !is_valid {
        print_diagnostics(&parse, &source, args.color);
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
