//! Loading and parsing the source a command works on.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use elixir_syntax::{Parse, ParseOptions};

/// Source text plus the name diagnostics refer to it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

/// Load source from inline text, stdin (`-`) or a file.
pub fn load_source(source_text: Option<&str>, source_path: Option<&Path>) -> Result<Source, String> {
    if let Some(text) = source_text {
        return Ok(Source {
            name: "<inline>".to_string(),
            text: text.to_owned(),
        });
    }

    let Some(path) = source_path else {
        return Err("source is required: use positional argument or -s/--source".to_string());
    };

    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        return Ok(Source {
            name: "<stdin>".to_string(),
            text: buf,
        });
    }

    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    Ok(Source {
        name: path.display().to_string(),
        text,
    })
}

/// Like [`load_source`], exiting on failure.
pub fn load_source_or_exit(source_text: Option<&str>, source_path: Option<&Path>) -> Source {
    load_source(source_text, source_path).unwrap_or_else(|msg| {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    })
}

/// Parse, exiting when the parser runs out of fuel.
pub fn parse_or_exit(source: &Source, options: ParseOptions) -> Parse {
    elixir_syntax::parse_with(&source.text, options).unwrap_or_else(|e| {
        eprintln!("error: {}: {}", source.name, e);
        std::process::exit(1);
    })
}

/// Render diagnostics (suppressed cascades removed) to stderr.
pub fn print_diagnostics(parse: &Parse, source: &Source, color: bool) {
    let diagnostics = parse.diagnostics();
    if diagnostics.is_empty() {
        return;
    }
    eprint!(
        "{}",
        diagnostics
            .printer(&source.text)
            .path(&source.name)
            .colored(color)
            .render()
    );
}
