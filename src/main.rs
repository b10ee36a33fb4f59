use clap::Parser;
use kycflow::application::service::WorkflowService;
use kycflow::domain::ports::{EventBusBox, PartyDirectoryBox, RequestStoreBox};
use kycflow::infrastructure::in_memory::{InMemoryPartyDirectory, InMemoryRequestStore};
use kycflow::interfaces::csv::action_reader::ActionReader;
use kycflow::interfaces::json::event_writer::JsonLineEventBus;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input actions CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries only the event stream.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let requests = open_request_store(cli.db_path.as_deref())?;
    let directory: PartyDirectoryBox = Box::new(InMemoryPartyDirectory::demo().await);
    let events: EventBusBox = Box::new(JsonLineEventBus::new(io::stdout()));
    let service = WorkflowService::new(requests, directory, events);

    // Process submitted actions
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ActionReader::new(file);
    for action_result in reader.actions() {
        match action_result {
            Ok(action) => {
                if let Err(e) = service.apply(action).await {
                    eprintln!("Error processing action: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading action: {}", e);
            }
        }
    }

    Ok(())
}

// Use persistent storage (RocksDB) when a database path is given
#[cfg(feature = "storage-rocksdb")]
fn open_request_store(db_path: Option<&Path>) -> Result<RequestStoreBox> {
    use kycflow::infrastructure::rocksdb::RocksDbRequestStore;

    match db_path {
        Some(path) => {
            let store = RocksDbRequestStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        None => Ok(Box::new(InMemoryRequestStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_request_store(db_path: Option<&Path>) -> Result<RequestStoreBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryRequestStore::new()))
}
