//! Command-line interface for haml-parser
//! Parses Haml templates and prints their AST, or just checks that they parse.
//!
//! Usage:
//!   hamlp parse `<path>` [--format `<format>`] [--config `<file>`]  - Print the AST
//!   hamlp check `<path>`                                          - Report syntax errors only
//!
//! Set `HAMLP_LOG` (e.g. `HAMLP_LOG=haml_parser=debug`) to see parser tracing on stderr.

use clap::{Arg, ArgAction, Command};
use haml_parser::haml::config::Loader;
use haml_parser::haml::error::format_source_context;
use haml_parser::haml::formats::{serialize, Format};
use haml_parser::{Ast, Parser, ParserOptions, SyntaxError};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let matches = Command::new("hamlp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse Haml templates into an AST")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a template and print its AST")
                .arg(
                    Arg::new("path")
                        .help("Path to the haml file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: json, yaml or treeviz (default from config)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                )
                .arg(
                    Arg::new("line-numbers")
                        .long("line-numbers")
                        .action(ArgAction::SetTrue)
                        .help("Show line numbers in treeviz output"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse a template and report syntax errors")
                .arg(
                    Arg::new("path")
                        .help("Path to the haml file")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = required(parse_matches, "path");
            handle_parse_command(
                path,
                parse_matches.get_one::<String>("format").map(String::as_str),
                parse_matches.get_one::<String>("config").map(String::as_str),
                parse_matches.get_flag("line-numbers"),
            );
        }
        Some(("check", check_matches)) => {
            handle_check_command(required(check_matches, "path"));
        }
        _ => unreachable!(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HAMLP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn required<'m>(matches: &'m clap::ArgMatches, name: &str) -> &'m str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| fail(&format!("Missing argument: {}", name)))
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: Option<&str>, config: Option<&str>, linum: bool) {
    let mut loader = Loader::new();
    if let Some(config) = config {
        loader = loader.with_file(config);
    }
    let config = loader
        .build()
        .unwrap_or_else(|e| fail(&format!("Invalid configuration: {}", e)));

    let format = match format {
        Some(name) => name.parse::<Format>().unwrap_or_else(|e| fail(&e.to_string())),
        None => config.output.format,
    };
    let mut options = config.output.render_options();
    options.show_line_numbers |= linum;

    let ast = parse_file(path);
    let output = serialize(&ast, format, options).unwrap_or_else(|e| fail(&e.to_string()));
    println!("{}", output.trim_end());
}

/// Handle the check command
fn handle_check_command(path: &str) {
    let ast = parse_file(path);
    println!("{}: ok ({} nodes)", path, ast.len() - 1);
}

fn parse_file(path: &str) -> Ast {
    let source = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Error reading file: {}", e)));

    Parser::new(ParserOptions::new().with_filename(path))
        .parse(&source)
        .unwrap_or_else(|err| report(&source, err))
}

fn report(source: &str, err: SyntaxError) -> ! {
    eprintln!("Syntax error: {}", err);
    eprint!("{}", format_source_context(source, err.lineno));
    std::process::exit(1);
}
