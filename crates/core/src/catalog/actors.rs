//! Actor storage.

use rusqlite::params;
use tracing::debug;

use super::sqlite::{format_date, parse_stored_date, storage_error, write_error, Grouped};
use super::{Actor, ActorChanges, ActorRepository, CatalogError, NewActor, SqliteCatalog};

struct ActorRow {
    id: i64,
    name: String,
    gender: Option<String>,
    birth_date: Option<String>,
    movie_title: String,
}

impl ActorRepository for SqliteCatalog {
    fn create_actor(&self, actor: &NewActor) -> Result<i64, CatalogError> {
        const OP: &str = "actors.create";
        let conn = self.lock(OP)?;

        conn.execute(
            "INSERT INTO actors (name, gender, birthDate) VALUES (?1, ?2, ?3)",
            params![&actor.name, &actor.gender, actor.birth_date.map(format_date)],
        )
        .map_err(|e| write_error(OP, e, &format!("actor '{}'", actor.name)))?;

        let id = conn.last_insert_rowid();
        debug!(id, name = %actor.name, "Actor created");
        Ok(id)
    }

    fn update_actor(&self, id: i64, changes: &ActorChanges) -> Result<i64, CatalogError> {
        const OP: &str = "actors.update";
        let conn = self.lock(OP)?;

        let updated = conn
            .execute(
                "UPDATE actors SET
                    name = COALESCE(?1, name),
                    gender = COALESCE(?2, gender),
                    birthDate = COALESCE(?3, birthDate)
                 WHERE id = ?4",
                params![
                    &changes.name,
                    &changes.gender,
                    changes.birth_date.map(format_date),
                    id,
                ],
            )
            .map_err(|e| {
                let subject = changes.name.as_deref().unwrap_or_default();
                write_error(OP, e, &format!("actor '{}'", subject))
            })?;

        if updated == 0 {
            return Err(CatalogError::NotFound(format!("actor {}", id)));
        }

        debug!(id, "Actor updated");
        Ok(id)
    }

    fn delete_actor(&self, id: i64) -> Result<(), CatalogError> {
        const OP: &str = "actors.delete";
        let mut conn = self.lock(OP)?;
        let tx = conn.transaction().map_err(|e| storage_error(OP, e))?;

        let removed = tx
            .execute("DELETE FROM actors WHERE id = ?1", params![id])
            .map_err(|e| storage_error(OP, e))?;
        if removed == 0 {
            return Err(CatalogError::NotFound(format!("actor {}", id)));
        }

        let links = tx
            .execute("DELETE FROM relations WHERE actor_id = ?1", params![id])
            .map_err(|e| storage_error(OP, e))?;

        tx.commit().map_err(|e| storage_error(OP, e))?;
        debug!(id, links, "Actor deleted");
        Ok(())
    }

    fn actors(&self) -> Result<Vec<Actor>, CatalogError> {
        const OP: &str = "actors.all";
        let conn = self.lock(OP)?;

        // Inner joins: actors without a linked movie are left out, and so are
        // relation rows whose movie no longer exists.
        let mut stmt = conn
            .prepare(
                "SELECT a.id, a.name, a.gender, a.birthDate, m.title
                 FROM actors a
                 JOIN relations r ON r.actor_id = a.id
                 JOIN movies m ON m.id = r.movie_id
                 ORDER BY a.id, r.rowid",
            )
            .map_err(|e| storage_error(OP, e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ActorRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    gender: row.get(2)?,
                    birth_date: row.get(3)?,
                    movie_title: row.get(4)?,
                })
            })
            .map_err(|e| storage_error(OP, e))?;

        let mut actors = Grouped::new();
        for row in rows {
            let row = row.map_err(|e| storage_error(OP, e))?;
            let actor = actors.get_or_try_insert(row.id, || -> Result<Actor, CatalogError> {
                Ok(Actor {
                    id: row.id,
                    name: row.name.clone(),
                    gender: row.gender.clone(),
                    birth_date: row
                        .birth_date
                        .as_deref()
                        .map(|raw| parse_stored_date(OP, raw))
                        .transpose()?,
                    movies: Vec::new(),
                })
            })?;

            if !actor.movies.contains(&row.movie_title) {
                actor.movies.push(row.movie_title);
            }
        }

        Ok(actors.into_vec())
    }
}
