use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use url_reader::core::ReaderError;

mod cli;

#[derive(Parser)]
#[command(name = "url-reader")]
#[command(about = "Read files, trees and glob searches from source-control hosts")]
#[command(version)]
struct Cli {
    /// Path to config.yaml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a single file
    Read {
        /// Web URL of the file
        url: String,
        /// Etag from a previous read
        #[arg(long)]
        etag: Option<String>,
        /// Write the file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Snapshot a directory tree
    Tree {
        /// Web URL of the directory
        url: String,
        /// Commit id from a previous read
        #[arg(long)]
        etag: Option<String>,
        /// Copy the tree into this directory instead of listing it
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List files matching the glob in the URL's path
    Search {
        /// Web URL whose path is a glob, e.g. .../blob/main/**/*.md
        url: String,
        /// Commit id from a previous search
        #[arg(long)]
        etag: Option<String>,
    },
    /// Store an access token for a host in the OS keychain
    Login {
        /// Host the token is for, e.g. github.com
        host: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Read { url, etag, output } => cli::read::run(config, url, etag, output).await,
        Commands::Tree { url, etag, out } => cli::tree::run(config, url, etag, out).await,
        Commands::Search { url, etag } => cli::search::run(config, url, etag).await,
        Commands::Login { host } => cli::login::run(host).await,
    };

    // Handle result and exit codes
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(ReaderError::NotModified) => {
            // Etag matched, nothing new to report
            eprintln!("Not modified");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("\n{}", url_reader::core::error_help::format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
