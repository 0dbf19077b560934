use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vally::Validator;
use vally::cli::{self, CheckOptions, CheckResult, CliError};
use vally::output::to_json;

#[derive(ClapParser)]
#[command(name = "vally")]
#[command(about = "Vally - validate JSON values with boolean validation expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON value against an expression
    Check {
        /// The validation expression, e.g. "required() && email()"
        expr: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the report as JSON
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax and function names, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the token stream of an expression
    Tokens {
        expr: String,
    },

    /// Print the rewritten expression and its syntax tree as JSON
    Ast {
        expr: String,

        /// Field reference to inject (defaults to .Value)
        #[arg(short, long)]
        field: Option<String>,
    },

    /// List the builtin functions
    Functions,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vally=warn")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            expr,
            input,
            pretty,
            syntax_only,
        } => run_check(expr, input, pretty, syntax_only),
        Commands::Tokens { expr } => {
            for token in cli::tokens(&expr) {
                println!("{}", token);
            }
            Ok(())
        }
        Commands::Ast { expr, field } => cli::ast(&expr, field.as_deref()).and_then(|out| {
            println!("{}", out.rewritten);
            println!("{}", to_json(&out.ast, true)?);
            Ok(())
        }),
        Commands::Functions => {
            print!("{}", cli::functions_text(Validator::with_builtins().registry()));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    expr: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        expr,
        input,
        syntax_only,
    };

    let validator = Validator::with_builtins();
    match cli::execute_check(&validator, &options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Validated(report) => {
            println!("{}", report.to_json(pretty)?);
            if !report.valid {
                eprint!("{}", report.to_text());
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
