//! Show the syntax tree of a source file.

use std::path::PathBuf;

use elixir_syntax::ParseOptions;

use super::source::{load_source_or_exit, parse_or_exit, print_diagnostics};

pub struct TreeArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub raw: bool,
    pub spans: bool,
    pub color: bool,
    pub parse_options: ParseOptions,
}

pub fn run(args: TreeArgs) {
    let source = load_source_or_exit(args.source_text.as_deref(), args.source_path.as_deref());
    let parse = parse_or_exit(&source, args.parse_options);

    // The tree is complete even with errors, so print both.
    print_diagnostics(&parse, &source, args.color);
    let output = parse
        .printer()
        .with_trivia(args.raw)
        .with_spans(args.spans)
        .dump();
    print!("{}", output);
}
