//! docvault command-line tool.
//!
//! Provides the `docvault` binary for working with a docvault data directory
//! offline: add, list and remove documents, print confirmed orders, and
//! inspect the stored snapshot.
//!
//! Uses the same `PersistenceService` as the HTTP server, so every change is
//! flushed to the snapshot slot exactly as a server request would. `status`
//! only reads the slot and never rewrites it.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};

use docvault_core::{DocumentId, DocumentRecord, MimeType};
use docvault_storage::{
    snapshot, FileKeyValue, KeyValueStore, PersistenceService, SnapshotFormat, SqliteStore,
    StorageError, SNAPSHOT_KEY,
};

/// docvault document store tools.
#[derive(Parser)]
#[command(name = "docvault", about = "docvault document store tools")]
struct Cli {
    /// Directory holding the snapshot slot.
    #[arg(short, long, default_value = "docvault-data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Add a JPEG, PNG or PDF file.
    Add {
        /// Path to the file.
        path: PathBuf,
    },
    /// List stored documents.
    List,
    /// Remove a document by ID (succeeds if it does not exist).
    Remove {
        /// Document ID as printed by `add` or `list`.
        id: String,
    },
    /// Print confirmed orders as JSON.
    Orders,
    /// Show snapshot format, size and record counts.
    Status,
}

/// Errors mapped to exit codes: 1 = input error, 3 = storage error.
#[derive(Debug)]
enum CliError {
    Input(String),
    Storage(StorageError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Input(_) => 1,
            CliError::Storage(_) => 3,
        }
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        CliError::Storage(err)
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Storage(StorageError::Io(err))
    }
}

fn main() {
    let cli = Cli::parse();
    let stdout = io::stdout();

    let exit_code = match run(cli, &mut stdout.lock()) {
        Ok(()) => 0,
        Err(err) => {
            match &err {
                CliError::Input(msg) => eprintln!("Error: {}", msg),
                CliError::Storage(err) => eprintln!("Storage error: {}", err),
            }
            err.exit_code()
        }
    };
    process::exit(exit_code);
}

type Service = PersistenceService<FileKeyValue>;

/// Dispatches one parsed command, writing its output to `out`.
fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    if let Commands::Status = cli.command {
        return run_status(&cli.data_dir, out);
    }

    let mut service = open_service(&cli.data_dir)?;
    match cli.command {
        Commands::Add { path } => run_add(&mut service, &path, out),
        Commands::List => run_list(&mut service, out),
        Commands::Remove { id } => run_remove(&mut service, id),
        Commands::Orders => run_orders(&mut service, out),
        Commands::Status => Ok(()),
    }
}

fn open_service(data_dir: &Path) -> Result<Service, CliError> {
    let slot = FileKeyValue::open(data_dir)?;
    let mut service = PersistenceService::new(slot);
    service.initialize()?;
    Ok(service)
}

/// Execute the add subcommand.
fn run_add(service: &mut Service, path: &Path, out: &mut impl Write) -> Result<(), CliError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::Input(format!("'{}' has no file name", path.display())))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let mime = MimeType::from_extension(ext).map_err(|e| CliError::Input(e.to_string()))?;
    let bytes = std::fs::read(path)
        .map_err(|e| CliError::Input(format!("cannot read '{}': {}", path.display(), e)))?;

    let doc = DocumentRecord::from_upload(name, mime.as_str(), &STANDARD.encode(&bytes))
        .map_err(|e| CliError::Input(e.to_string()))?;
    service.add_document(&doc)?;
    writeln!(out, "{}", doc.id)?;
    Ok(())
}

/// Execute the list subcommand.
fn run_list(service: &mut Service, out: &mut impl Write) -> Result<(), CliError> {
    let docs = service.list_documents()?;
    if docs.is_empty() {
        writeln!(out, "no documents")?;
        return Ok(());
    }
    for doc in docs {
        let size = doc
            .decoded_len()
            .map(|n| format!("{} B", n))
            .unwrap_or_else(|| "invalid".to_string());
        writeln!(out, "{}\t{}\t{}\t{}", doc.id, doc.mime_type, size, doc.name)?;
    }
    Ok(())
}

/// Execute the remove subcommand.
fn run_remove(service: &mut Service, id: String) -> Result<(), CliError> {
    service.delete_document(&DocumentId(id))?;
    Ok(())
}

/// Execute the orders subcommand.
fn run_orders(service: &mut Service, out: &mut impl Write) -> Result<(), CliError> {
    let orders = service.list_orders()?;
    let json = serde_json::to_string_pretty(&orders)
        .map_err(|e| CliError::Storage(StorageError::Serialization(e)))?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Execute the status subcommand.
///
/// Reads the slot directly instead of initializing a service, so the format
/// shown is the one on disk and a legacy snapshot is not upgraded.
fn run_status(data_dir: &Path, out: &mut impl Write) -> Result<(), CliError> {
    let slot = FileKeyValue::open(data_dir)?;
    let stored = slot.get(SNAPSHOT_KEY)?.filter(|text| !text.is_empty());

    writeln!(out, "data dir:  {}", slot.dir().display())?;
    let (documents, orders) = match stored {
        Some(text) => {
            let format = SnapshotFormat::detect(&text)?;
            writeln!(
                out,
                "snapshot:  {} ({} bytes encoded)",
                format.as_str(),
                text.len()
            )?;
            let store = SqliteStore::from_snapshot(&snapshot::open(&text)?)?;
            (store.document_count()?, store.order_count()?)
        }
        None => {
            writeln!(out, "snapshot:  absent")?;
            (0, 0)
        }
    };
    writeln!(out, "documents: {}", documents)?;
    writeln!(out, "orders:    {}", orders)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_storage::codec;

    fn cli(dir: &Path, command: Commands) -> Cli {
        Cli {
            data_dir: dir.to_path_buf(),
            command,
        }
    }

    fn run_captured(dir: &Path, command: Commands) -> (Result<(), CliError>, String) {
        let mut out = Vec::new();
        let result = run(cli(dir, command), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_global_data_dir_after_subcommand() {
        let parsed = Cli::try_parse_from(["docvault", "remove", "a-1", "--data-dir", "vault"]).unwrap();
        assert_eq!(parsed.data_dir, PathBuf::from("vault"));
        assert!(matches!(parsed.command, Commands::Remove { ref id } if id == "a-1"));
    }

    #[test]
    fn add_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, b"hello").unwrap();

        let (result, _) = run_captured(&dir.path().join("data"), Commands::Add { path: file });
        let err = result.unwrap_err();
        assert!(matches!(err, CliError::Input(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn add_list_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let file = dir.path().join("a.png");
        std::fs::write(&file, [0x89, b'P', b'N', b'G']).unwrap();

        let (result, printed) = run_captured(&data, Commands::Add { path: file });
        result.unwrap();
        let id = printed.trim().to_string();
        assert!(id.starts_with("a.png-"));

        let (result, listing) = run_captured(&data, Commands::List);
        result.unwrap();
        assert!(listing.contains(&id));
        assert!(listing.contains("image/png\t4 B\ta.png"));

        let (result, _) = run_captured(&data, Commands::Remove { id: "missing".into() });
        result.unwrap();
        let (result, _) = run_captured(&data, Commands::Remove { id });
        result.unwrap();

        let (_, listing) = run_captured(&data, Commands::List);
        assert_eq!(listing.trim(), "no documents");
    }

    #[test]
    fn status_reports_absent_without_creating_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let (result, printed) = run_captured(dir.path(), Commands::Status);
        result.unwrap();
        assert!(printed.contains("snapshot:  absent"));
        assert!(printed.contains("documents: 0"));

        let slot = FileKeyValue::open(dir.path()).unwrap();
        assert_eq!(slot.get(SNAPSHOT_KEY).unwrap(), None);
    }

    #[test]
    fn status_reports_legacy_and_leaves_it_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SqliteStore::empty().unwrap();
        store
            .insert_document(&DocumentRecord::from_upload("a.png", "image/png", "QQ==").unwrap())
            .unwrap();
        let legacy = codec::encode(&store.export_snapshot().unwrap());
        let mut slot = FileKeyValue::open(dir.path()).unwrap();
        slot.set(SNAPSHOT_KEY, &legacy).unwrap();

        let (result, printed) = run_captured(dir.path(), Commands::Status);
        result.unwrap();
        assert!(printed.contains("snapshot:  legacy"));
        assert!(printed.contains("documents: 1"));
        assert!(printed.contains("orders:    0"));
        assert_eq!(slot.get(SNAPSHOT_KEY).unwrap().as_deref(), Some(legacy.as_str()));
    }

    #[test]
    fn status_reports_v1_after_a_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let (result, _) = run_captured(dir.path(), Commands::Remove { id: "x".into() });
        result.unwrap();

        let (result, printed) = run_captured(dir.path(), Commands::Status);
        result.unwrap();
        assert!(printed.contains("snapshot:  v1"));
    }

    #[test]
    fn unreadable_snapshot_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = FileKeyValue::open(dir.path()).unwrap();
        slot.set(SNAPSHOT_KEY, "v9:whatever").unwrap();

        let (result, _) = run_captured(dir.path(), Commands::Status);
        assert_eq!(result.unwrap_err().exit_code(), 3);
        let (result, _) = run_captured(dir.path(), Commands::List);
        assert_eq!(result.unwrap_err().exit_code(), 3);
    }
}
