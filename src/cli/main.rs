use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use term_dictionary_sdk::cli::OutputFormat;
use term_dictionary_sdk::cli::commands::{CommonArgs, filter, terms};

/// Infer a term dictionary from a delimited file and filter its entities
#[derive(Parser, Debug)]
#[command(name = "term-dictionary", version, about)]
struct Cli {
    /// TOML file with dictionary settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Header label of the entity key column
    #[arg(long, global = true)]
    key_column: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Show info-level logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct FileArg {
    /// Delimited source file
    file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every inferred term
    Terms(FileArg),
    /// Find terms whose name contains a substring
    Search {
        #[command(flatten)]
        source: FileArg,
        substring: String,
        /// Only return numeric terms
        #[arg(long)]
        numeric: bool,
    },
    /// Print per-entity values of the given terms
    Values {
        #[command(flatten)]
        source: FileArg,
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Count the distinct values of a numeric term
    Summary {
        #[command(flatten)]
        source: FileArg,
        term: String,
    },
    /// Print the rows matching a filter
    Filter {
        #[command(flatten)]
        source: FileArg,
        /// Filter JSON, `@path` to read it from a file, or `-` for stdin
        #[arg(long)]
        filter: Option<String>,
    },
}

fn init_tracing(cli: &Cli) {
    // off unless --verbose; RUST_LOG refines the verbose level
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let common = |file: &FileArg| CommonArgs {
        file: file.file.clone(),
        config: cli.config.clone(),
        key_column: cli.key_column.clone(),
    };

    let output = match &cli.command {
        Commands::Terms(source) => terms::handle_terms(&common(source), cli.format)?,
        Commands::Search {
            source,
            substring,
            numeric,
        } => terms::handle_search(&common(source), substring, *numeric, cli.format)?,
        Commands::Values { source, terms: ids } => {
            terms::handle_values(&common(source), ids, cli.format)?
        }
        Commands::Summary { source, term } => {
            terms::handle_summary(&common(source), term, cli.format)?
        }
        Commands::Filter {
            source,
            filter: expression,
        } => filter::handle_filter(&common(source), expression.as_deref(), cli.format)?,
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
