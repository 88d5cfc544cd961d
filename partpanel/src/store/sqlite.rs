//! SQLite-backed part store.
//!
//! Opens the host database read-only. [`SCHEMA`] describes the tables the
//! queries expect; the host is responsible for creating and filling them.

use super::{PartLookup, PartStore, Result, StoreError};
use crate::config::ConfigProvider;
use crate::model::{
    Attachment, Parameter, ParameterRow, Part, PartId, StoredFile, Template, TemplateId,
};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS parts (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    full_name TEXT,
    description TEXT NOT NULL DEFAULT '',
    active INTEGER NOT NULL DEFAULT 1,
    url TEXT,
    thumbnail TEXT
);

CREATE TABLE IF NOT EXISTS part_attachments (
    id INTEGER PRIMARY KEY,
    part_id INTEGER NOT NULL REFERENCES parts(id) ON DELETE CASCADE,
    comment TEXT NOT NULL DEFAULT '',
    link TEXT,
    file_name TEXT,
    file_url TEXT
);

CREATE INDEX IF NOT EXISTS idx_part_attachments_part_id
    ON part_attachments(part_id);

CREATE TABLE IF NOT EXISTS part_parameter_templates (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    units TEXT
);

CREATE TABLE IF NOT EXISTS part_parameters (
    id INTEGER PRIMARY KEY,
    part_id INTEGER NOT NULL REFERENCES parts(id) ON DELETE CASCADE,
    template_id INTEGER REFERENCES part_parameter_templates(id),
    name TEXT,
    units TEXT,
    data TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_part_parameters_part_id
    ON part_parameters(part_id);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open an existing database without write access.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::info!("Opened part database {:?}", path);
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn get_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn read_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?")?;
        let value = stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }
}

fn part_from_row(row: &Row<'_>) -> rusqlite::Result<Part> {
    Ok(Part {
        id: PartId(row.get(0)?),
        name: row.get(1)?,
        full_name: row.get(2)?,
        description: row.get(3)?,
        active: row.get(4)?,
        url: row.get(5)?,
        thumbnail: row.get(6)?,
    })
}

fn attachment_from_row(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    let file_name: Option<String> = row.get(4)?;
    let file_url: Option<String> = row.get(5)?;
    let file = match (file_name, file_url) {
        (None, None) => None,
        (name, url) => Some(StoredFile {
            name: name.unwrap_or_default(),
            url,
        }),
    };

    Ok(Attachment {
        id: row.get(0)?,
        part: PartId(row.get(1)?),
        comment: row.get(2)?,
        link: row.get(3)?,
        file,
    })
}

fn parameter_row_from_row(row: &Row<'_>) -> rusqlite::Result<ParameterRow> {
    let template_id: Option<i64> = row.get(6)?;
    let template = match template_id {
        Some(id) => Some(Template {
            id: TemplateId(id),
            name: row.get(7)?,
            units: row.get(8)?,
        }),
        None => None,
    };

    Ok(ParameterRow {
        parameter: Parameter {
            id: row.get(0)?,
            part: PartId(row.get(1)?),
            name: row.get(2)?,
            units: row.get(3)?,
            value: row.get(4)?,
            template: row.get::<_, Option<i64>>(5)?.map(TemplateId),
        },
        template,
    })
}

impl PartStore for SqliteStore {
    fn find_part(&self, id: PartId) -> Result<PartLookup> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, full_name, description, active, url, thumbnail
             FROM parts
             WHERE id = ?",
        )?;

        let part = stmt.query_row(params![id.0], part_from_row).optional()?;
        Ok(part.into())
    }

    fn attachments(&self, part: PartId) -> Result<Vec<Attachment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, part_id, comment, link, file_name, file_url
             FROM part_attachments
             WHERE part_id = ?
             ORDER BY id",
        )?;

        let attachments = stmt
            .query_map(params![part.0], attachment_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(attachments)
    }

    fn parameters(&self, part: PartId) -> Result<Vec<ParameterRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.part_id, p.name, p.units, p.data, p.template_id,
                    t.id, t.name, t.units
             FROM part_parameters p
             LEFT JOIN part_parameter_templates t ON t.id = p.template_id
             WHERE p.part_id = ?
             ORDER BY COALESCE(t.name, ''), p.id",
        )?;

        let rows = stmt
            .query_map(params![part.0], parameter_row_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl ConfigProvider for SqliteStore {
    fn get_setting(&self, key: &str) -> Option<String> {
        match self.read_setting(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read setting {}: {}", key, e);
                None
            }
        }
    }
}
