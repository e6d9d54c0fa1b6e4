use std::{fs, process};

use anyhow::Context;
use clap::{crate_version, App, Arg, ErrorKind};
use minicc::{lexer, parser::Parser};

const USAGE: &str = "Supported Syntax: minicc <code.c>";

fn cli() -> App<'static, 'static> {
    App::new("minicc")
        .version(crate_version!())
        .about("lexer and parser front end for a small C-like language")
        .arg(
            Arg::with_name("SOURCE")
                .help("the source file to compile")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("tokens")
                .long("tokens")
                .help("print every token with its position"),
        )
        .arg(
            Arg::with_name("parse")
                .long("parse")
                .help("parse the tokens and print the syntax tree"),
        )
}

fn main() -> anyhow::Result<()> {
    let matches = match cli().get_matches_safe() {
        Ok(matches) => matches,
        Err(e) if e.kind == ErrorKind::HelpDisplayed || e.kind == ErrorKind::VersionDisplayed => {
            e.exit()
        }
        Err(_) => {
            println!("Unsupported syntax!");
            println!("{}", USAGE);
            process::exit(1);
        }
    };

    // SOURCE is required, clap already rejected its absence
    let path = matches.value_of("SOURCE").unwrap_or_default();
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read source file {}", path))?;

    let tokens = lexer::lex(&source).with_context(|| format!("failed to lex {}", path))?;

    if matches.is_present("tokens") {
        for token in &tokens {
            println!("{}\t{:?}\t{}", token.position, token.kind, token);
        }
    }

    if matches.is_present("parse") {
        let statements = Parser::new(&tokens)
            .parse_program()
            .with_context(|| format!("failed to parse {}", path))?;
        for statement in &statements {
            println!("{}", statement);
        }
    }

    Ok(())
}
