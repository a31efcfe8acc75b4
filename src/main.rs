use std::fs;
use std::io::{self, BufRead};
use std::path::Path;
use std::path::PathBuf;

use arith::eval::{evaluate, polish_notation};
use arith::lex::SingleTokenError;
use arith::{Ast, Lexer, parse_expression};
use clap::Parser;
use clap::Subcommand;
use miette::IntoDiagnostic;
use miette::WrapErr;

#[derive(Parser, Debug)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Tokenize { filename: PathBuf },
    Parse { filename: PathBuf },
    Eval { filename: PathBuf },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    match args.command {
        None => repl()?,
        Some(Commands::Tokenize { filename }) => {
            let file_contents = read_source(&filename)?;

            for token in Lexer::new(filename.to_str(), &file_contents) {
                let token = match token {
                    Ok(token) => token,
                    Err(e) => {
                        if let Some(single_token_error) = e.downcast_ref::<SingleTokenError>() {
                            eprintln!(
                                "Error: Unexpected character: {}",
                                single_token_error.token
                            );
                            eprintln!("{e:?}");

                            std::process::exit(65);
                        }
                        return Err(e);
                    }
                };
                println!("{token}");
            }
        }
        Some(Commands::Parse { filename }) => {
            let file_contents = read_source(&filename)?;
            let expr = parse_source(filename.to_str(), &file_contents)?;
            println!("{expr}");
        }
        Some(Commands::Eval { filename }) => {
            let file_contents = read_source(&filename)?;
            let expr = parse_source(filename.to_str(), &file_contents)?;
            println!("{}", evaluate(&expr));
        }
    }
    Ok(())
}

fn read_source(filename: &Path) -> miette::Result<String> {
    fs::read_to_string(filename)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading `{}` failed", filename.display()))
}

fn parse_source<'de>(filename: Option<&'de str>, whole: &'de str) -> miette::Result<Ast<'de>> {
    let tokens = Lexer::new(filename, whole).collect::<Result<Vec<_>, _>>()?;
    arith::Parser::new(filename, &tokens, whole).parse()
}

// Reads lines until EOF; a bad line is reported and the loop keeps going.
fn repl() -> miette::Result<()> {
    for line in io::stdin().lock().lines() {
        let line = line.into_diagnostic().wrap_err("reading stdin failed")?;
        match parse_expression(&line) {
            Ok(expr) => {
                let postfix = polish_notation(&expr)
                    .iter()
                    .map(|token| token.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{postfix}");
                println!("{}", evaluate(&expr));
            }
            Err(e) => eprintln!("{e:?}"),
        }
    }
    Ok(())
}
