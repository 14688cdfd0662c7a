//! Show the token stream, optionally with the lexical state after each token.

use std::fmt::Write;
use std::path::PathBuf;

use elixir_syntax::parser::lexer::{LexicalState, Lexer, StateStack};
use serde::Serialize;

use super::source::load_source_or_exit;

pub struct LexArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub states: bool,
    pub json: bool,
    pub compact: bool,
}

#[derive(Debug, Serialize)]
pub struct TokenRow {
    pub kind: String,
    pub text: String,
    pub start: u32,
    pub end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateStack>,
}

pub fn run(args: LexArgs) {
    let source = load_source_or_exit(args.source_text.as_deref(), args.source_path.as_deref());
    let rows = token_rows(&source.text, args.states);

    if !args.json {
        print!("{}", format_rows(&rows));
        return;
    }

    let json = if args.compact {
        serde_json::to_string(&rows)
    } else {
        serde_json::to_string_pretty(&rows)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn token_rows(source: &str, with_states: bool) -> Vec<TokenRow> {
    let mut lexer = Lexer::new(source);
    let mut rows = Vec::new();
    while let Some(token) = lexer.next() {
        rows.push(TokenRow {
            kind: format!("{:?}", token.kind),
            text: token.text(source).to_string(),
            start: token.span.start().into(),
            end: token.span.end().into(),
            state: with_states.then(|| lexer.state().clone()),
        });
    }
    rows
}

/// One line per token: `Kind "text" start..end`, then the state stack when present.
pub fn format_rows(rows: &[TokenRow]) -> String {
    let mut out = String::new();
    for row in rows {
        write!(out, "{} {:?} {}..{}", row.kind, row.text, row.start, row.end)
            .expect("String write never fails");
        if let Some(stack) = &row.state {
            let states: Vec<String> = stack.as_slice().iter().map(state_label).collect();
            write!(out, " [{}]", states.join(", ")).expect("String write never fails");
        }
        out.push('\n');
    }
    out
}

fn state_label(state: &LexicalState) -> String {
    match state {
        LexicalState::Group(group) => format!("{:?}({:?})", group.kind, group.terminator),
        LexicalState::SigilOpen { .. } => "SigilOpen".to_string(),
        other => format!("{:?}", other),
    }
}
