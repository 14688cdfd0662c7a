//! Print the quoted form of a source file.

use std::path::PathBuf;

use elixir_syntax::{ParseOptions, QuoteOptions, Quoter};

use super::source::{load_source_or_exit, parse_or_exit, print_diagnostics};

pub struct QuoteArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub columns: bool,
    pub json: bool,
    pub compact: bool,
    pub color: bool,
    pub parse_options: ParseOptions,
}

pub fn run(args: QuoteArgs) {
    let source = load_source_or_exit(args.source_text.as_deref(), args.source_path.as_deref());
    let parse = parse_or_exit(&source, args.parse_options);

    // Error nodes have no quoted form.
    if parse.diagnostics().has_errors() {
        print_diagnostics(&parse, &source, args.color);
        std::process::exit(1);
    }

    let quoter = Quoter::new(&source.text, QuoteOptions::default().columns(args.columns));
    let term = quoter.quote_file(&parse.file()).unwrap_or_else(|e| {
        eprintln!("error: {}: {}", source.name, e);
        std::process::exit(1);
    });

    if !args.json {
        println!("{}", term);
        return;
    }

    let json = if args.compact {
        serde_json::to_string(&term)
    } else {
        serde_json::to_string_pretty(&term)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
