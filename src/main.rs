use clap::{Parser as ClapParser, Subcommand};
use promscope::cli::{self, CliError, RewriteOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "promscope")]
#[command(about = "Promscope - rewrite PromQL queries so every selector is scoped to a tenant namespace")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a query so every metric selector carries the namespace label
    Rewrite {
        /// The query to rewrite (reads from stdin if not provided)
        query: Option<String>,

        /// Namespace value to enforce
        #[arg(short, long)]
        namespace: String,

        /// Scope label to constrain instead of "namespace"
        #[arg(long)]
        label: Option<String>,

        /// Emit the result as a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Validate query syntax without rewriting
    Check {
        /// The query to validate (reads from stdin if not provided)
        query: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Rewrite {
            query,
            namespace,
            label,
            json,
        } => run_rewrite(query, namespace, label, json),
        Commands::Check { query } => run_check(query),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_query(arg: Option<String>) -> Result<String, CliError> {
    match arg {
        Some(query) => Ok(query),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(buffer.trim().to_string())
        }
        None => Err(CliError::NoQuery),
    }
}

fn run_rewrite(
    query: Option<String>,
    namespace: String,
    label: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let options = RewriteOptions {
        query: read_query(query)?,
        namespace,
        label,
    };

    if json {
        let report = cli::rewrite_report(&options)?;
        println!("{}", serde_json::to_string(&report).unwrap());
    } else {
        println!("{}", cli::execute_rewrite(&options)?);
    }
    Ok(())
}

fn run_check(query: Option<String>) -> Result<(), CliError> {
    cli::execute_check(&read_query(query)?)?;
    println!("Syntax is valid");
    Ok(())
}
