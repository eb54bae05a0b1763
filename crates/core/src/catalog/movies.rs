//! Movie storage: writes, sorted listing and fragment search.

use rusqlite::{params, Connection, Params};
use tracing::debug;

use super::sqlite::{format_date, parse_stored_date, storage_error, write_error, Grouped};
use super::{
    ActorRef, CatalogError, FragmentType, Movie, MovieChanges, MovieRepository, NewMovie, SortKey,
    SqliteCatalog,
};

// Every listing selects the same joined columns so one row reader serves all of them.
const SORTED_BY_TITLE: &str = "
    SELECT m.id, m.title, m.description, m.date, m.rating, a.id, a.name, a.gender
    FROM movies m
    LEFT JOIN relations r ON r.movie_id = m.id
    LEFT JOIN actors a ON a.id = r.actor_id
    ORDER BY m.title ASC, m.id, r.rowid";

const SORTED_BY_DATE: &str = "
    SELECT m.id, m.title, m.description, m.date, m.rating, a.id, a.name, a.gender
    FROM movies m
    LEFT JOIN relations r ON r.movie_id = m.id
    LEFT JOIN actors a ON a.id = r.actor_id
    ORDER BY m.date ASC, m.id, r.rowid";

const SORTED_BY_RATING: &str = "
    SELECT m.id, m.title, m.description, m.date, m.rating, a.id, a.name, a.gender
    FROM movies m
    LEFT JOIN relations r ON r.movie_id = m.id
    LEFT JOIN actors a ON a.id = r.actor_id
    ORDER BY m.rating DESC, m.id, r.rowid";

const SEARCH_BY_TITLE: &str = "
    SELECT m.id, m.title, m.description, m.date, m.rating, a.id, a.name, a.gender
    FROM movies m
    LEFT JOIN relations r ON r.movie_id = m.id
    LEFT JOIN actors a ON a.id = r.actor_id
    WHERE m.title LIKE ?1
    ORDER BY m.id, r.rowid";

const SEARCH_BY_ACTOR: &str = "
    SELECT m.id, m.title, m.description, m.date, m.rating, a.id, a.name, a.gender
    FROM movies m
    LEFT JOIN relations r ON r.movie_id = m.id
    LEFT JOIN actors a ON a.id = r.actor_id
    WHERE m.id IN (
        SELECT lr.movie_id
        FROM relations lr
        JOIN actors la ON la.id = lr.actor_id
        WHERE la.name LIKE ?1
    )
    ORDER BY m.id, r.rowid";

/// One flat row of a movie listing; actor columns are NULL for actor-less movies.
struct MovieRow {
    id: i64,
    title: String,
    description: String,
    date: String,
    rating: i64,
    actor_id: Option<i64>,
    actor_name: Option<String>,
    actor_gender: Option<String>,
}

impl MovieRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            date: row.get(3)?,
            rating: row.get(4)?,
            actor_id: row.get(5)?,
            actor_name: row.get(6)?,
            actor_gender: row.get(7)?,
        })
    }
}

/// Run a listing query and fold its joined rows into movies.
fn load_movies<P: Params>(
    conn: &Connection,
    op: &'static str,
    sql: &str,
    params: P,
) -> Result<Vec<Movie>, CatalogError> {
    let mut stmt = conn.prepare(sql).map_err(|e| storage_error(op, e))?;
    let rows = stmt
        .query_map(params, MovieRow::from_row)
        .map_err(|e| storage_error(op, e))?;

    let mut movies = Grouped::new();
    for row in rows {
        let row = row.map_err(|e| storage_error(op, e))?;
        let movie = movies.get_or_try_insert(row.id, || -> Result<Movie, CatalogError> {
            Ok(Movie {
                id: row.id,
                title: row.title.clone(),
                description: row.description.clone(),
                release_date: parse_stored_date(op, &row.date)?,
                rating: row.rating,
                actors: Vec::new(),
            })
        })?;

        if let (Some(actor_id), Some(name)) = (row.actor_id, row.actor_name) {
            if !movie.actors.iter().any(|a| a.id == actor_id) {
                movie.actors.push(ActorRef {
                    id: actor_id,
                    name,
                    gender: row.actor_gender,
                });
            }
        }
    }

    Ok(movies.into_vec())
}

impl MovieRepository for SqliteCatalog {
    fn create_movie(&self, movie: &NewMovie) -> Result<i64, CatalogError> {
        const OP: &str = "movies.create";
        let conn = self.lock(OP)?;

        conn.execute(
            "INSERT INTO movies (title, description, date, rating) VALUES (?1, ?2, ?3, ?4)",
            params![
                &movie.title,
                &movie.description,
                format_date(movie.release_date),
                movie.rating,
            ],
        )
        .map_err(|e| write_error(OP, e, &format!("movie '{}'", movie.title)))?;

        let id = conn.last_insert_rowid();
        debug!(id, title = %movie.title, "Movie created");
        Ok(id)
    }

    fn update_movie(&self, id: i64, changes: &MovieChanges) -> Result<i64, CatalogError> {
        const OP: &str = "movies.update";
        let conn = self.lock(OP)?;

        let updated = conn
            .execute(
                "UPDATE movies SET
                    title = COALESCE(?1, title),
                    description = COALESCE(?2, description),
                    date = COALESCE(?3, date),
                    rating = COALESCE(?4, rating)
                 WHERE id = ?5",
                params![
                    &changes.title,
                    &changes.description,
                    changes.release_date.map(format_date),
                    changes.rating,
                    id,
                ],
            )
            .map_err(|e| {
                let subject = changes.title.as_deref().unwrap_or_default();
                write_error(OP, e, &format!("movie '{}'", subject))
            })?;

        if updated == 0 {
            return Err(CatalogError::NotFound(format!("movie {}", id)));
        }

        debug!(id, "Movie updated");
        Ok(id)
    }

    fn delete_movie(&self, id: i64) -> Result<(), CatalogError> {
        const OP: &str = "movies.delete";
        let mut conn = self.lock(OP)?;
        let tx = conn.transaction().map_err(|e| storage_error(OP, e))?;

        let removed = tx
            .execute("DELETE FROM movies WHERE id = ?1", params![id])
            .map_err(|e| storage_error(OP, e))?;
        if removed == 0 {
            return Err(CatalogError::NotFound(format!("movie {}", id)));
        }

        let links = tx
            .execute("DELETE FROM relations WHERE movie_id = ?1", params![id])
            .map_err(|e| storage_error(OP, e))?;

        tx.commit().map_err(|e| storage_error(OP, e))?;
        debug!(id, links, "Movie deleted");
        Ok(())
    }

    fn movies_sorted(&self, sort: SortKey) -> Result<Vec<Movie>, CatalogError> {
        const OP: &str = "movies.sorted";
        let conn = self.lock(OP)?;

        let sql = match sort {
            SortKey::Title => SORTED_BY_TITLE,
            SortKey::Date => SORTED_BY_DATE,
            SortKey::Rating => SORTED_BY_RATING,
        };
        load_movies(&conn, OP, sql, [])
    }

    fn movies_by_fragment(
        &self,
        fragment_type: FragmentType,
        fragment: &str,
    ) -> Result<Vec<Movie>, CatalogError> {
        const OP: &str = "movies.by_fragment";
        let conn = self.lock(OP)?;
        let pattern = format!("%{}%", fragment);

        let sql = match fragment_type {
            FragmentType::Title => SEARCH_BY_TITLE,
            FragmentType::Actor => SEARCH_BY_ACTOR,
        };
        load_movies(&conn, OP, sql, params![pattern])
    }
}
