//! SQLite-backed catalog handle.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{ffi, Connection, ErrorCode};
use tracing::debug;

use super::{schema, CatalogError, DATE_FORMAT};

/// SQLite-backed catalog.
///
/// One connection shared behind a mutex. Open it once at startup and hand
/// it to whoever needs it; call [`SqliteCatalog::close`] on shutdown.
pub struct SqliteCatalog {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open the catalog at `path`, creating the file and tables if needed.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| {
            CatalogError::StorageUnavailable(format!("{}: {}", path.display(), e))
        })?;
        schema::initialize(&conn)?;
        debug!(path = %path.display(), "Catalog opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CatalogError::StorageUnavailable(e.to_string()))?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Close the underlying connection, reporting any error SQLite returns.
    pub fn close(self) -> Result<(), CatalogError> {
        const OP: &str = "catalog.close";
        let conn = self.conn.into_inner().map_err(|_| poisoned(OP))?;
        conn.close().map_err(|(_, e)| storage_error(OP, e))?;
        debug!("Catalog closed");
        Ok(())
    }

    pub(super) fn lock(&self, op: &'static str) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn.lock().map_err(|_| poisoned(op))
    }
}

fn poisoned(op: &'static str) -> CatalogError {
    CatalogError::Storage {
        op,
        message: "connection mutex poisoned".to_string(),
    }
}

pub(super) fn storage_error(op: &'static str, err: rusqlite::Error) -> CatalogError {
    CatalogError::Storage {
        op,
        message: err.to_string(),
    }
}

/// Map a failed write, turning unique-constraint violations into `AlreadyExists`.
pub(super) fn write_error(op: &'static str, err: rusqlite::Error, subject: &str) -> CatalogError {
    if is_unique_violation(&err) {
        CatalogError::AlreadyExists(format!("{}: {}", op, subject))
    } else {
        storage_error(op, err)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(super) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored date. Only the leading `YYYY-MM-DD` is read, so values
/// carrying a time of day still parse.
pub(super) fn parse_stored_date(op: &'static str, raw: &str) -> Result<NaiveDate, CatalogError> {
    let prefix = raw.get(..10).ok_or_else(|| {
        CatalogError::DataCorruption(format!("{}: stored date '{}' is too short", op, raw))
    })?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).map_err(|e| {
        CatalogError::DataCorruption(format!("{}: stored date '{}': {}", op, raw, e))
    })
}

/// Entities rebuilt from joined rows, keyed by id, in order of first appearance.
pub(super) struct Grouped<T> {
    items: Vec<T>,
    index: HashMap<i64, usize>,
}

impl<T> Grouped<T> {
    pub(super) fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Get the entity for `id`, building it with `make` the first time it is seen.
    pub(super) fn get_or_try_insert<E>(
        &mut self,
        id: i64,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, E> {
        let pos = match self.index.get(&id) {
            Some(&pos) => pos,
            None => {
                self.items.push(make()?);
                let pos = self.items.len() - 1;
                self.index.insert(id, pos);
                pos
            }
        };
        Ok(&mut self.items[pos])
    }

    pub(super) fn into_vec(self) -> Vec<T> {
        self.items
    }
}
