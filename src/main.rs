#![allow(nonstandard_style)]

mod error_handling;
mod evaluating;
mod parsing;
mod scanning;
mod session;

use parsing::*;
use session::*;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Interactive two-operand calculator.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Evaluate this calculation once and exit, e.g. `2 ^ 8`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, allow_negative_numbers = true)]
    expression: Vec<String>,

    /// Skip the greeting and menu
    #[arg(long)]
    no_banner: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Evaluates a single calculation line against a fresh session.
fn evaluate_once(line: &str) -> error_handling::Result<String> {
    let mut session = Session::new(std::io::empty(), std::io::sink());
    let calculation = tokenize(line).and_then(|request| session.calculate(&request))?;
    Ok(format!("{} = {}", calculation.expression, format_number(calculation.result)))
}

fn one_shot(line: &str) -> ExitCode {
    match evaluate_once(line) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.expression.is_empty() {
        return one_shot(&cli.expression.join(" "));
    }

    let mut session = Session::new(std::io::stdin().lock(), std::io::stdout());
    let outcome = if cli.no_banner {
        session.run()
    } else {
        session.greet().and_then(|_| session.run())
    };
    tracing::debug!(state = ?session.state(), "session ended");

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
