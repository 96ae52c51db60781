pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod identity;
pub mod storage;

pub use config::ServerConfig;
pub use entity::{Note, NoteId, UserId};
pub use error::{NoteError, Result};
pub use storage::{NoteGateway, SqliteStore};
