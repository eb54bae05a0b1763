//! Movie/actor linkage.

use rusqlite::params;
use tracing::{debug, warn};

use super::sqlite::storage_error;
use super::{CatalogError, RelationManager, SqliteCatalog};

impl RelationManager for SqliteCatalog {
    fn create_rule(&self, movie_id: i64, actor_ids: &[i64]) -> Result<(), CatalogError> {
        const OP: &str = "relations.create_rule";
        let mut conn = self.lock(OP)?;
        let tx = conn.transaction().map_err(|e| storage_error(OP, e))?;

        let mut inserted = 0;
        {
            // Existing pairs (and repeats within `actor_ids`) are skipped.
            let mut stmt = tx
                .prepare(
                    "INSERT INTO relations (movie_id, actor_id)
                     SELECT ?1, ?2
                     WHERE NOT EXISTS (
                         SELECT 1 FROM relations WHERE movie_id = ?1 AND actor_id = ?2
                     )",
                )
                .map_err(|e| storage_error(OP, e))?;

            for &actor_id in actor_ids {
                match stmt.execute(params![movie_id, actor_id]) {
                    Ok(n) => inserted += n,
                    Err(e) => {
                        // Dropping the transaction rolls back the earlier inserts.
                        warn!(movie_id, actor_id, error = %e, "Relation insert failed, rolling back");
                        return Err(storage_error(OP, e));
                    }
                }
            }
        }

        tx.commit().map_err(|e| storage_error(OP, e))?;
        debug!(movie_id, requested = actor_ids.len(), inserted, "Relations created");
        Ok(())
    }
}
