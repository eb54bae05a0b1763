//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router over a catalog stored in a temporary
//! directory, so every test gets an isolated database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use cinema_core::{
    Catalog, Config, Environment, NewActor, NewMovie, ServerConfig, SqliteCatalog, StorageConfig,
};
use cinema_server::{api::create_router, state::AppState};

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("Invalid test date")
}

/// Test fixture with direct access to the catalog behind the router.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The catalog the router serves, for seeding and inspection
    pub catalog: Arc<SqliteCatalog>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            env: Environment::Local,
            storage: StorageConfig {
                path: db_path.clone(),
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
                timeout_secs: 5,
            },
        };

        let catalog = Arc::new(SqliteCatalog::open(&db_path).expect("Failed to open catalog"));
        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn Catalog>,
        ));
        let router = create_router(state);

        Self {
            router,
            catalog,
            temp_dir,
        }
    }

    /// Insert a movie directly and return its id.
    pub fn seed_movie(&self, title: &str, release_date: &str, rating: i64) -> i64 {
        use cinema_core::MovieRepository;
        self.catalog
            .create_movie(&NewMovie {
                title: title.to_string(),
                description: format!("About {}", title),
                release_date: date(release_date),
                rating,
            })
            .expect("Failed to seed movie")
    }

    /// Insert an actor directly and return its id.
    pub fn seed_actor(&self, name: &str) -> i64 {
        use cinema_core::ActorRepository;
        self.catalog
            .create_actor(&NewActor {
                name: name.to_string(),
                gender: None,
                birth_date: None,
            })
            .expect("Failed to seed actor")
    }

    /// Link actors to a movie directly.
    pub fn link(&self, movie_id: i64, actor_ids: &[i64]) {
        use cinema_core::RelationManager;
        self.catalog
            .create_rule(movie_id, actor_ids)
            .expect("Failed to link actors");
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PATCH request with JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> TestResponse {
        self.request("PATCH", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
