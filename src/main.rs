//! Bookstore - CLI catalog and inventory manager
//!
//! One-shot command processor: opens the SQLite catalog, optionally seeds
//! it from a csv export, runs a single command and exits.

use bookstore::commands::{self, Command};
use bookstore::{seed, BookStore};
use clap::Parser;
use std::path::{Path, PathBuf};

/// The seed file the original catalog export ships under.
const DEFAULT_SEED_FILE: &str = "book-data.csv";

/// Bookstore catalog manager - search, list, buy and delete books
#[derive(Parser, Debug)]
#[command(name = "bookstore")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    /// Seed the catalog from a semicolon-delimited csv file before running
    /// the command (default: book-data.csv in the working directory, if any)
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Command words: search {keywords...} | list | buy {bookId} {count} | delete {bookId}
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

/// Returns the default database path: ~/.local/share/bookstore/bookstore.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookstore")
        .join("bookstore.db")
        .to_string_lossy()
        .to_string()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
        }
    }

    let mut store = match BookStore::open(&db_path) {
        Ok(store) => {
            log::info!("Opened catalog database: {}", db_path.display());
            store
        }
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = store.migrate() {
        log::error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    seed_catalog(&mut store, args.seed.as_deref());

    // All command outcomes print a message and exit cleanly; only the
    // environment failures above elevate the exit code.
    match Command::parse(&args.command).and_then(|command| commands::run(&mut store, command)) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => println!("{}", e),
    }
}

/// Seed from the requested file, or from book-data.csv when present.
/// First-or-create semantics make this safe to repeat on every start.
fn seed_catalog(store: &mut BookStore, requested: Option<&Path>) {
    let path = match requested {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_SEED_FILE);
            if !default.exists() {
                return;
            }
            default
        }
    };

    match seed::seed_from_file(store, &path) {
        Ok(report) => log::info!(
            "Seeded catalog from {}: {} inserted, {} already present, {} cells defaulted",
            path.display(),
            report.inserted,
            report.skipped_existing,
            report.defaulted_fields
        ),
        Err(e) => {
            println!("Unable to read csv data!");
            log::error!("Seeding from {} failed: {}", path.display(), e);
        }
    }
}
