
use std::fs;
use std::io::{self, Read};

use anyhow::{anyhow, bail, Context, Result};
use clap::{App, Arg, ArgMatches};
use log::{debug, LevelFilter};

use whilelang::parser::{Error, ParseError, Parser};
use whilelang::tokenize;

fn read_source(matches: &ArgMatches) -> Result<String> {
    if let Some(source) = matches.value_of("expr") {
        return Ok(source.to_string())
    }

    match matches.value_of("input") {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Couldn't read {}", path)),
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s).context("Couldn't read stdin")?;
            Ok(s)
        },
    }
}

fn select_parser(matches: &ArgMatches) -> Result<Parser> {
    match matches.value_of("automaton").unwrap_or("fixed") {
        "fixed" => Ok(Parser::new()),
        "generated" => Parser::generated().context("Couldn't build the LR(1) automaton"),
        other => bail!("Unknown automaton '{}'", other),
    }
}

/*
 * Prefixes an input error with its line and column, and says
 * what the automaton was expecting.
 */
fn located(error: Error, source: &str, parser: &Parser) -> anyhow::Error {
    let hint = match &error {
        Error::Parse(ParseError::UnexpectedToken { state, .. }) => {
            let expected: Vec<String> = parser.expected(*state).iter().map(|k| format!("{:?}", k)).collect();
            format!(" (expected {})", expected.join(" or "))
        },
        _ => String::new(),
    };

    match error.location(source) {
        Some(loc) => anyhow!("{}: {}{}", loc, error, hint),
        None => anyhow!("{}{}", error, hint),
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let parser = select_parser(matches)?;

    if matches.is_present("dump-table") {
        print!("{}", parser.table());
        return Ok(())
    }

    let source = read_source(matches)?;
    let tokens = tokenize(&source).map_err(|e| located(e.into(), &source, &parser))?;
    debug!("{} tokens", tokens.len());

    if matches.is_present("tokens") {
        for token in &tokens {
            println!("{}", token);
        }
        return Ok(())
    }

    let trace = matches.is_present("trace");
    let program = parser
        .parse_observed(&tokens, &mut |step| if trace { println!("{}", step) })
        .map_err(|e| located(e.into(), &source, &parser))?;

    print!("{}", program);
    Ok(())
}

fn main() {
    let matches = App::new("whilelang")
        .version("1.0")
        .about("Parses while-loop programs over roman numerals with a shift-reduce automaton")
        .arg(Arg::with_name("input")
            .help("The source file (stdin if omitted)")
            .index(1))
        .arg(Arg::with_name("expr")
            .short("e")
            .long("expr")
            .takes_value(true)
            .conflicts_with("input")
            .help("Parse the given source text instead of a file"))
        .arg(Arg::with_name("tokens")
            .long("tokens")
            .help("Only print the tokens"))
        .arg(Arg::with_name("automaton")
            .long("automaton")
            .takes_value(true)
            .possible_values(&["fixed", "generated"])
            .default_value("fixed")
            .help("The fixed LALR(1) table, or a LR(1) table built from the grammar"))
        .arg(Arg::with_name("dump-table")
            .long("dump-table")
            .help("Print the ACTION/GOTO table and exit"))
        .arg(Arg::with_name("trace")
            .long("trace")
            .help("Print every move of the automaton"))
        .arg(Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .help("Debug logging (RUST_LOG also works)"))
        .get_matches();

    let mut logger = env_logger::Builder::from_default_env();
    if matches.is_present("verbose") {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let success = match run(&matches) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("{:#}", e);
            false
        }
    };

    std::process::exit(if success {0} else {1});
}
