use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use opac_resolver::catalog::WebOpacTransport;
use opac_resolver::config::{get_config, load_config, Config};
use opac_resolver::extract::extract_identifier;
use opac_resolver::parser::parse_response;
use opac_resolver::{ui, BookQuery, SearchCascade};

/// Resolve marketplace book listings against a legacy WebOPAC library catalog
#[derive(Parser, Debug)]
#[command(name = "opac-resolver")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find a book's library catalog record from its ISBN or title", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog site id, overriding the configured default
    #[arg(long, global = true)]
    site_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a book against the live catalog
    Resolve {
        /// ISBN-13 or ISBN-10, separators allowed
        #[arg(long)]
        isbn: Option<String>,

        /// Raw title text as scraped from the marketplace page
        #[arg(long)]
        title: Option<String>,

        /// Raw author text as scraped from the marketplace page
        #[arg(long)]
        author: Option<String>,

        /// Free page text to scan for an identifier when --isbn is absent
        #[arg(long)]
        text: Option<String>,
    },

    /// Parse a saved catalog response body without touching the network
    Parse {
        /// Path to the saved response body
        file: PathBuf,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("opac_resolver={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_output_format(requested: OutputFormat) -> OutputFormat {
    match requested {
        OutputFormat::Auto => {
            if ui::is_terminal() {
                OutputFormat::Table
            } else {
                OutputFormat::Json
            }
        }
        other => other,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => get_config(),
    };
    let site_id = cli
        .site_id
        .clone()
        .unwrap_or_else(|| config.catalog.site_id.clone());
    let format = resolve_output_format(cli.output);

    match cli.command {
        Commands::Resolve {
            isbn,
            title,
            author,
            text,
        } => run_resolve(&config, &site_id, format, isbn, title, author, text).await,
        Commands::Parse { file } => run_parse(&config, &site_id, format, &file),
    }
}

async fn run_resolve(
    config: &Config,
    site_id: &str,
    format: OutputFormat,
    isbn: Option<String>,
    title: Option<String>,
    author: Option<String>,
    text: Option<String>,
) -> Result<()> {
    // Direct --isbn input may still carry separators; free text needs a
    // full scan. Either way the catalog only sees a validated identifier.
    let identifier = isbn
        .as_deref()
        .and_then(extract_identifier)
        .or_else(|| text.as_deref().and_then(extract_identifier));

    let mut query = BookQuery::new();
    if let Some(identifier) = identifier {
        query = query.identifier(identifier);
    }
    if let Some(title) = title {
        query = query.title(title);
    }
    if let Some(author) = author {
        query = query.author(author);
    }

    let transport = Arc::new(WebOpacTransport::new(config));
    let cascade = SearchCascade::new(transport, site_id);
    let result = cascade.resolve(&query).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print!(
            "{}",
            ui::render_result(&result, &config.catalog.host, site_id, ui::is_terminal())
        ),
    }
    Ok(())
}

fn run_parse(config: &Config, site_id: &str, format: OutputFormat, file: &PathBuf) -> Result<()> {
    let body = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let page = parse_response(&body);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "total_count": page.total_count,
                "extracted_count": page.records.len(),
                "records": page.records,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!(
                "catalog total: {}, extracted: {}",
                page.total_count,
                page.records.len()
            );
            if !page.records.is_empty() {
                println!(
                    "{}",
                    ui::records_table(&page.records, &config.catalog.host, site_id)
                );
            }
        }
    }
    Ok(())
}
