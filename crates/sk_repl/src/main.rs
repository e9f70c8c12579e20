//! Asterisk interpreter CLI

mod config;
mod repl;
mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sk_interpreter::{Error, Session};
use sk_parser::{
    lexer::Lexer,
    parser::{parse_program, ParseError},
};

use crate::config::ReplConfig;
use crate::repl::Repl;
use crate::report::report_error;

#[derive(Parser)]
#[command(name = "asterisk", version, about = "Asterisk - a tiny scripting language")]
struct Cli {
    /// Source file to run; starts the REPL when omitted
    src: Option<PathBuf>,

    /// Start the REPL even when a source file is given
    #[arg(long)]
    repl: bool,

    /// Print the tokens or AST of the source file instead of running it
    #[arg(long, value_enum, requires = "src")]
    dump: Option<Dump>,

    /// History file for the REPL (default: ~/.asterisk_history)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Do not load or save REPL history
    #[arg(long)]
    no_history: bool,

    /// Show how long each REPL input took to run
    #[arg(long)]
    timing: bool,

    /// Log debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Dump {
    Tokens,
    Ast,
}

fn main() {
    let cli = Cli::parse();
    install_tracing(cli.verbose);

    let succeeded = match (&cli.src, cli.dump) {
        (Some(src), Some(dump)) => dump_file(src, dump),
        (Some(src), None) if !cli.repl => run_file(src),
        _ => {
            let config = ReplConfig::new(cli.history, cli.no_history, cli.timing);
            start_repl(config)
        }
    };

    if !succeeded {
        process::exit(1);
    }
}

fn install_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(err) => {
            eprintln!("Error: could not read {}: {}", path.display(), err);
            None
        }
    }
}

fn run_file(path: &Path) -> bool {
    let Some(source) = read_source(path) else {
        return false;
    };
    let name = path.display().to_string();
    debug!(file = %name, "running");

    let mut session = Session::stdout();
    match session.run(&source) {
        Ok(_) => true,
        Err(error) => {
            if report_error(&name, &source, &error).is_err() {
                eprintln!("Error: {}", error.diagnostic());
            }
            false
        }
    }
}

fn dump_file(path: &Path, dump: Dump) -> bool {
    let Some(source) = read_source(path) else {
        return false;
    };
    let name = path.display().to_string();

    let result = match dump {
        Dump::Tokens => Lexer::new(&source)
            .tokenize()
            .map_err(ParseError::from)
            .map(|tokens| {
                for token in tokens {
                    println!("{:?} @ {}", token.value, token.span.location());
                }
            }),
        Dump::Ast => parse_program(&source).map(|program| {
            for statement in &program.statements {
                println!("{}", statement);
            }
        }),
    };

    match result {
        Ok(()) => true,
        Err(error) => {
            let error = Error::from(error);
            if report_error(&name, &source, &error).is_err() {
                eprintln!("Error: {}", error.diagnostic());
            }
            false
        }
    }
}

fn start_repl(config: ReplConfig) -> bool {
    let result = Repl::new(config).and_then(|mut repl| repl.run());

    match result {
        Ok(()) => true,
        Err(err) => {
            eprintln!("Error: {}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use crate::{Cli, Dump};

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_arguments() {
        let cli = Cli::parse_from(["asterisk", "prog.sk", "--dump", "ast"]);
        assert_eq!(cli.src.as_deref(), Some(std::path::Path::new("prog.sk")));
        assert_eq!(cli.dump, Some(Dump::Ast));
        assert!(!cli.repl);

        let cli = Cli::parse_from(["asterisk", "--no-history", "--timing", "-v"]);
        assert!(cli.src.is_none());
        assert!(cli.no_history);
        assert!(cli.timing);
        assert!(cli.verbose);

        assert!(Cli::try_parse_from(["asterisk", "--dump", "tokens"]).is_err());
    }
}
