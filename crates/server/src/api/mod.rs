pub mod actors;
pub mod error;
pub mod handlers;
pub mod movies;
pub mod routes;

pub use routes::create_router;
