mod build;
mod cli;
mod commands;

use cli::{BuildParams, CheckParams, LexParams, QuoteParams, TreeParams, build_cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this")
    };
    init_tracing(m.get_count("verbose"));

    match name {
        "lex" => {
            let params = LexParams::from_matches(m);
            commands::lex::run(params.into());
        }
        "tree" => {
            let params = TreeParams::from_matches(m);
            commands::tree::run(params.into());
        }
        "quote" => {
            let params = QuoteParams::from_matches(m);
            commands::quote::run(params.into());
        }
        "check" => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        "build" => {
            let params = BuildParams::from_matches(m);
            commands::build::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbosity))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn directive_for_verbosity(verbosity: u8) -> &'static str {
    // Targets are module paths: the library and this binary.
    match verbosity {
        0 => "warn",
        1 => "elixir_syntax=debug,exsyntax=debug",
        _ => "elixir_syntax=trace,exsyntax=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::directive_for_verbosity;

    #[test]
    fn verbosity_directives() {
        assert_eq!(directive_for_verbosity(0), "warn");
        assert_eq!(directive_for_verbosity(1), "elixir_syntax=debug,exsyntax=debug");
        assert_eq!(directive_for_verbosity(3), "elixir_syntax=trace,exsyntax=trace");
    }
}
