//! Command-line interface for hvitt
//! Tokenizes a source file with rules read from a rule-description file and prints the tokens.
//!
//! Usage:
//!   hvitt `<rules>` [`<input>`] [--config `<toml>`] [--indent-unit `<unit>`] [--no-trim] [--raw]
//!         [--format token-simple|token-json]
//!
//! Without `<input>`, the source is read from standard input.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

use hvitt::config::Loader;
use hvitt::{Pipeline, RuleLoader, Token, TokenSource};

fn main() {
    env_logger::init();

    let matches = Command::new("hvitt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize indentation-sensitive text with runtime-configured rules")
        .arg(
            Arg::new("rules")
                .help("Path to the rule-description file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("input")
                .help("Path to the source file (defaults to standard input)")
                .index(2),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Settings file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("indent-unit")
                .long("indent-unit")
                .help("Whitespace making up one indentation level"),
        )
        .arg(
            Arg::new("no-trim")
                .long("no-trim")
                .help("Keep blank lines at the start and end of the input")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Print scanner output without collapsing or structure checks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: token-simple or token-json")
                .default_value("token-simple"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let rules_path = matches
        .get_one::<String>("rules")
        .context("rules path is required")?;
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("token-simple");
    if format != "token-simple" && format != "token-json" {
        bail!(
            "Format '{}' not supported. Available formats: token-simple, token-json",
            format
        );
    }

    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(unit) = matches.get_one::<String>("indent-unit") {
        loader = loader.set_override("structure.indent_unit", unit.as_str())?;
    }
    if matches.get_flag("no-trim") {
        loader = loader.set_override("collapse.trim", false)?;
    }
    if matches.get_flag("raw") {
        loader = loader
            .set_override("collapse.enabled", false)?
            .set_override("structure.enabled", false)?;
    }
    let settings = loader.build().context("Error loading settings")?;

    let rules_file =
        File::open(rules_path).with_context(|| format!("Error reading rules file {}", rules_path))?;
    let rules = RuleLoader::load(BufReader::new(rules_file))
        .with_context(|| format!("Error in rules file {}", rules_path))?;
    let pipeline = Pipeline::from_rules(rules, settings)?;

    let input: Box<dyn BufRead> = match matches.get_one::<String>("input") {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Error reading input file {}", path))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let source = pipeline.lex(input)?;
    let tokens = source
        .tokens()
        .collect::<Result<Vec<Token>, _>>()?;

    let output = match format {
        "token-json" => serde_json::to_string_pretty(&tokens)?,
        _ => tokens
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    println!("{}", output);
    Ok(())
}
