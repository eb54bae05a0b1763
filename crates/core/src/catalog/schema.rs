//! Catalog schema bootstrap.

use rusqlite::Connection;

use super::CatalogError;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS movies (
        id INTEGER NOT NULL PRIMARY KEY,
        title TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL,
        date TEXT NOT NULL,
        rating INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS actors (
        id INTEGER NOT NULL PRIMARY KEY,
        name TEXT NOT NULL,
        gender TEXT,
        birthDate TEXT
    );

    -- Movie/actor links. No key and no foreign keys: ids are checked by callers.
    CREATE TABLE IF NOT EXISTS relations (
        movie_id INTEGER NOT NULL,
        actor_id INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_relations_movie ON relations(movie_id);
    CREATE INDEX IF NOT EXISTS idx_relations_actor ON relations(actor_id);
"#;

/// Create the catalog tables if they are missing. Existing rows are untouched.
pub(super) fn initialize(conn: &Connection) -> Result<(), CatalogError> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| CatalogError::Schema(e.to_string()))
}
