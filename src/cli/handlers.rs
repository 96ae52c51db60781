use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::entity::{Note, NoteId, UserId};
use crate::error::{NoteError, Result};
use crate::http;
use crate::storage::SqliteStore;

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed, e.g. when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_existing(database: &Path) -> Result<SqliteStore> {
    if !database.exists() {
        return Err(NoteError::Storage(format!(
            "database {} does not exist",
            database.display()
        )));
    }
    SqliteStore::open(database)
}

fn print_note(note: &Note) {
    let id = note.id.map(|id| id.to_string()).unwrap_or_default();
    let visibility = if note.private { "private" } else { "public" };
    let name = note.name.as_deref().unwrap_or("(untitled)");
    println!("  {:>4} [{}] owner:{} {}", id, visibility, note.owner, name);
}

pub fn handle_serve(
    config: Option<PathBuf>,
    bind: Option<String>,
    database: Option<PathBuf>,
    log_level: Option<String>,
) -> Result<()> {
    let config = ServerConfig::load(config.as_deref())?.with_overrides(bind, database, log_level);
    init_tracing(&config.log_level);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(http::serve(config))
}

pub fn handle_get(id: NoteId, database: PathBuf, json: bool) -> Result<()> {
    let store = open_existing(&database)?;
    let note = Note::find_by_id(&store, id)?.ok_or(NoteError::NotFound(id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        print_note(&note);
        if let Some(created) = note.create_time {
            println!("  created: {}", created.to_rfc3339());
        }
        println!();
        println!("{}", note.content);
    }

    Ok(())
}

pub fn handle_list(owner: i64, database: PathBuf, json: bool) -> Result<()> {
    let store = open_existing(&database)?;
    let notes = Note::find_by_owner(&store, UserId(owner))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
    } else if notes.is_empty() {
        println!("No notes found.");
    } else {
        println!("Notes:\n");
        for note in &notes {
            print_note(note);
        }
    }

    Ok(())
}

pub fn handle_delete(id: NoteId, database: PathBuf) -> Result<()> {
    let store = open_existing(&database)?;
    let note = Note::find_by_id(&store, id)?.ok_or(NoteError::NotFound(id))?;

    if !note.delete(&store)? {
        return Err(NoteError::NotFound(id));
    }
    println!("Deleted note {}", id);

    Ok(())
}
