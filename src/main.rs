use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::BufRead;
use std::path::PathBuf;

use ksexpr::config::OutputFormat;
use ksexpr::diagnostics::{render_error, ExprError};
use ksexpr::Config;

#[derive(Parser)]
#[command(name = "ksexprc", version, about = "Lower binary-format schema expressions to host engine source")]
struct Cli {
    /// Path to a ksexpr.toml (default: discovered from the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the target source for each expression (reads stdin lines when none are given)
    Lower {
        exprs: Vec<String>,
    },
    /// Print the parsed expression tree
    Ast {
        expr: String,
    },
    /// Print the token stream
    Tokens {
        expr: String,
    },
    /// Print the variable declarations sent to the engine
    Vars {
        expr: String,
    },
}

#[derive(Serialize)]
struct Lowered<'a> {
    source: &'a str,
    target: &'a str,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn fail(source: &str, err: &ExprError) -> ! {
    render_error(source, "<expr>", err);
    std::process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: could not serialize output: {e}");
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, ExprError> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let cwd = std::env::current_dir().map_err(|e| {
                ExprError::config(format!("could not read current directory: {e}"), PathBuf::from("."))
            })?;
            Config::discover(&cwd)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(err) => fail("", &err),
    };
    let json = cli.json || config.output.format == OutputFormat::Json;

    match cli.command {
        Commands::Lower { exprs } => {
            let sources = if exprs.is_empty() {
                let mut lines = Vec::new();
                for line in std::io::stdin().lock().lines() {
                    match line {
                        Ok(line) if line.trim().is_empty() => {}
                        Ok(line) => lines.push(line),
                        Err(e) => {
                            eprintln!("error: could not read stdin: {e}");
                            std::process::exit(1);
                        }
                    }
                }
                lines
            } else {
                exprs
            };

            let mut failed = false;
            for source in &sources {
                match ksexpr::compile_to_target(source) {
                    Ok(target) if json => print_json(&Lowered { source: source.as_str(), target: &target }),
                    Ok(target) => println!("{target}"),
                    Err(err) => {
                        render_error(source, "<expr>", &err);
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
        Commands::Ast { expr } => match ksexpr::parse(&expr) {
            Ok(tree) if json => print_json(&tree),
            Ok(tree) => println!("{}", ksexpr::pretty::to_sexpr(&tree)),
            Err(err) => fail(&expr, &err),
        },
        Commands::Tokens { expr } => {
            let tokens = ksexpr::lexer::tokenize(&expr);
            if json {
                print_json(&tokens);
            } else {
                for tok in &tokens {
                    println!("{:>6}  {:<16} {:?}", tok.pos().to_string(), format!("{:?}", tok.kind), tok.literal);
                }
            }
        }
        Commands::Vars { expr } => {
            let tree = match ksexpr::parse(&expr) {
                Ok(tree) => tree,
                Err(err) => fail(&expr, &err),
            };
            let decls = config.variables.declare(ksexpr::free_variables(&tree));
            if json {
                print_json(&decls);
            } else {
                for decl in &decls {
                    println!("{decl}");
                }
            }
        }
    }
}
