use clap::{Parser as ClapParser, Subcommand};
use sqlface::cli::{self, CheckOptions, CheckResult, CliError, RunOptions};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "sqlface")]
#[command(about = "SqlFace - A select language over named in-memory sources")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a script without running it
    Check {
        /// The SqlFace script to validate
        script: String,

        /// Print the canonical statements and the syntax tree
        #[arg(long)]
        ast: bool,

        /// Pretty-print the syntax tree
        #[arg(short, long)]
        pretty: bool,
    },

    /// Run a script against the sources of a sources file
    Run {
        /// The SqlFace script (reads from stdin if not provided)
        script: Option<String>,

        /// JSON file declaring sources and their records
        #[arg(short, long)]
        sources: PathBuf,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'sqlface docs' to list categories)
        category: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check { script, ast, pretty } => run_check(script, ast, pretty),
        Commands::Run {
            script,
            sources,
            pretty,
        } => run_script(script, sources, pretty).await,
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check(script: String, ast: bool, pretty: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        script,
        ast,
        pretty,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Ast { rendered, tree } => {
            println!("{}", rendered);
            println!("{}", tree);
        }
    }
    Ok(())
}

async fn run_script(script: Option<String>, sources: PathBuf, pretty: bool) -> Result<(), CliError> {
    let script = match script {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoScript),
    };

    let output = cli::execute_run(&RunOptions { script, sources }).await?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}
