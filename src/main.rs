use clap::{Parser as ClapParser, Subcommand};
use flux_syntax::cli::{self, CliError, ParseCommandOptions};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "flux")]
#[command(about = "Flux - scan and parse Flux query scripts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a script and print its syntax tree as JSON
    Parse {
        /// Script text, @file, or - for stdin (reads stdin if omitted)
        script: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Keep going after an error and report every error found
        #[arg(short, long)]
        recover: bool,

        /// Stop after this many errors when recovering
        #[arg(long, default_value_t = 64)]
        max_errors: usize,
    },

    /// Print the token stream of a script
    Tokens {
        /// Script text, @file, or - for stdin (reads stdin if omitted)
        script: Option<String>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            script,
            pretty,
            recover,
            max_errors,
        } => run_parse(script, pretty, recover, max_errors),
        Commands::Tokens { script } => run_tokens(script),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr, and only when RUST_LOG asks for them.
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

fn read_script(script: Option<String>) -> Result<String, CliError> {
    match script.as_deref() {
        Some("-") => read_stdin(),
        Some(arg) => cli::load_script(arg),
        None if !atty::is(atty::Stream::Stdin) => read_stdin(),
        None => Err(CliError::NoInput),
    }
}

fn read_stdin() -> Result<String, CliError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn run_parse(
    script: Option<String>,
    pretty: bool,
    recover: bool,
    max_errors: usize,
) -> Result<(), CliError> {
    let options = ParseCommandOptions {
        script: read_script(script)?,
        pretty,
        recover,
        max_errors,
    };

    let json = cli::execute_parse(&options)?;
    println!("{}", json);
    Ok(())
}

fn run_tokens(script: Option<String>) -> Result<(), CliError> {
    let script = read_script(script)?;
    for line in cli::execute_tokens(&script) {
        println!("{}", line);
    }
    Ok(())
}
