//! Movie and actor catalog.
//!
//! Movies and actors live in their own tables and are linked many-to-many
//! through a `relations` table. Reads join across the three tables and
//! rebuild nested entities from the flat rows.

mod actors;
mod movies;
mod relations;
mod schema;
mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

/// Movie storage.
pub trait MovieRepository: Send + Sync {
    /// Insert a movie and return its generated id.
    ///
    /// Fails with `AlreadyExists` when the title is taken.
    fn create_movie(&self, movie: &NewMovie) -> Result<i64, CatalogError>;

    /// Apply the given changes to a movie, keeping fields that are `None`.
    fn update_movie(&self, id: i64, changes: &MovieChanges) -> Result<i64, CatalogError>;

    /// Remove a movie together with its relation rows.
    fn delete_movie(&self, id: i64) -> Result<(), CatalogError>;

    /// List every movie, actors attached, in the requested order.
    ///
    /// Movies without actors are included.
    fn movies_sorted(&self, sort: SortKey) -> Result<Vec<Movie>, CatalogError>;

    /// Search movies by a substring of the title or of a linked actor's name.
    ///
    /// Matching uses SQLite `LIKE`, which ignores ASCII case only.
    fn movies_by_fragment(
        &self,
        fragment_type: FragmentType,
        fragment: &str,
    ) -> Result<Vec<Movie>, CatalogError>;
}

/// Actor storage.
pub trait ActorRepository: Send + Sync {
    /// Insert an actor and return its generated id. Names are not unique.
    fn create_actor(&self, actor: &NewActor) -> Result<i64, CatalogError>;

    /// Apply the given changes to an actor, keeping fields that are `None`.
    fn update_actor(&self, id: i64, changes: &ActorChanges) -> Result<i64, CatalogError>;

    /// Remove an actor together with its relation rows.
    fn delete_actor(&self, id: i64) -> Result<(), CatalogError>;

    /// List actors that are linked to at least one movie, with movie titles.
    fn actors(&self) -> Result<Vec<Actor>, CatalogError>;
}

/// Movie/actor linkage.
pub trait RelationManager: Send + Sync {
    /// Link every actor in `actor_ids` to `movie_id` atomically.
    ///
    /// Either all links exist afterwards or none were written. Pairs that
    /// are already linked are skipped. Ids are not checked for existence.
    fn create_rule(&self, movie_id: i64, actor_ids: &[i64]) -> Result<(), CatalogError>;
}

/// The full catalog surface.
pub trait Catalog: MovieRepository + ActorRepository + RelationManager {}

impl<T: MovieRepository + ActorRepository + RelationManager> Catalog for T {}
