//! Read-only access to part records.
//!
//! The panel never writes to the store. Implementations:
//!
//! - [`MemoryStore`]: in-process records, built directly or loaded from a
//!   JSON snapshot. Used by tests and the CLI.
//! - [`SqliteStore`]: a read-only SQLite database.

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryStore, StoreSnapshot};
pub use sqlite::SqliteStore;

use crate::model::{Attachment, Part, PartId, ParameterRow};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcome of a part lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum PartLookup {
    Found(Part),
    NotFound,
}

impl PartLookup {
    pub fn into_option(self) -> Option<Part> {
        match self {
            PartLookup::Found(part) => Some(part),
            PartLookup::NotFound => None,
        }
    }
}

impl From<Option<Part>> for PartLookup {
    fn from(part: Option<Part>) -> Self {
        part.map_or(PartLookup::NotFound, PartLookup::Found)
    }
}

/// Read access to parts and their related records.
///
/// Ordering returned by implementations is a hint only; the collectors
/// impose their own ordering.
pub trait PartStore: Send + Sync {
    fn find_part(&self, id: PartId) -> Result<PartLookup>;

    /// All attachments belonging to `part`.
    fn attachments(&self, part: PartId) -> Result<Vec<Attachment>>;

    /// All parameters belonging to `part`, each joined with its template.
    fn parameters(&self, part: PartId) -> Result<Vec<ParameterRow>>;
}
