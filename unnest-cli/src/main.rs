//! Command-line interface for unnest
//! Flattens nested TEST_CASE / SUBCASE declarations into one plain TEST_CASE per leaf.
//!
//! Usage:
//!   unnest `<path>` `<line>`                 - Print the flattened declaration starting at `<line>`
//!   unnest `<path>` --all                    - Print every declaration of the file, flattened
//!   unnest `<path>` [`<line>`|--all] --in-place - Rewrite the file instead of printing
//!
//! Markers and the output format come from the embedded defaults, `./unnest.toml` if present,
//! `--config <file>`, and finally the command-line flags, in that order.

mod commands;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{Request, Target};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let request = request_from(&matches);
    if let Err(err) = commands::run(&request) {
        eprintln!("error: {}", err);
        let context = err.source_context();
        if !context.is_empty() {
            eprintln!();
            eprint!("{}", context);
        }
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("unnest")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Flatten nested TEST_CASE/SUBCASE declarations into independent test cases")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the source file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("line")
                .help("1-based line number where the declaration starts")
                .required_unless_present("all")
                .conflicts_with("all")
                .value_parser(value_parser!(u64).range(1..))
                .index(2),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .short('a')
                .help("Flatten every declaration in the file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("in-place")
                .long("in-place")
                .short('i')
                .help("Write the result back to the file instead of printing it")
                .conflicts_with("format")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: text, json, names or tree (default: from configuration)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("declaration")
                .long("declaration")
                .help("Declaration marker (default: TEST_CASE)"),
        )
        .arg(
            Arg::new("nested")
                .long("nested")
                .help("Nested-block marker (default: SUBCASE)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline progress to stderr")
                .action(ArgAction::SetTrue),
        )
}

fn request_from(matches: &ArgMatches) -> Request {
    let path = matches
        .get_one::<PathBuf>("path")
        .expect("path is a required argument")
        .clone();
    let target = if matches.get_flag("all") {
        Target::All
    } else {
        let line = *matches
            .get_one::<u64>("line")
            .expect("line is required unless --all is given");
        Target::Line(line as usize)
    };

    Request {
        path,
        target,
        in_place: matches.get_flag("in-place"),
        format: matches.get_one::<String>("format").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        declaration: matches.get_one::<String>("declaration").cloned(),
        nested: matches.get_one::<String>("nested").cloned(),
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose { "unnest=debug" } else { "unnest=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }

    #[test]
    fn parses_line_request() {
        let matches = cli()
            .try_get_matches_from(["unnest", "test.cpp", "12", "--format", "names"])
            .unwrap();
        let request = request_from(&matches);
        assert_eq!(request.target, Target::Line(12));
        assert_eq!(request.format.as_deref(), Some("names"));
        assert!(!request.in_place);
    }

    #[test]
    fn line_and_all_conflict() {
        let result = cli().try_get_matches_from(["unnest", "test.cpp", "12", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn line_zero_is_rejected() {
        let result = cli().try_get_matches_from(["unnest", "test.cpp", "0"]);
        assert!(result.is_err());
    }
}
