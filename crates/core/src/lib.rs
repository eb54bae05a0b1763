pub mod catalog;
pub mod config;

pub use catalog::{
    Actor, ActorChanges, ActorRef, ActorRepository, Catalog, CatalogError, FieldChanges,
    FragmentType, Movie, MovieChanges, MovieRepository, NewActor, NewMovie, RelationManager,
    SortKey, SqliteCatalog,
};
pub use config::{
    config_path_from_env, load_config, load_config_from_str, validate_config, Config,
    ConfigError, Environment, SanitizedConfig, ServerConfig, StorageConfig,
};
