//! Common test utilities for Dalali server integration tests using testcontainers
//!
//! Each test starts its own PostgreSQL container with the workspace
//! migrations applied, so tests never share rows and can run in parallel.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestApp, TestPostgres};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn test_with_postgres() {
//!     let pg = TestPostgres::start().await.expect("Failed to start PostgreSQL");
//!     sqlx::query("SELECT 1").execute(pg.pool()).await.expect("Query failed");
//!
//!     let app = TestApp::new(pg.pool_clone());
//!     let (status, _) = app.get("/health", None).await;
//!     assert!(status.is_success());
//! }
//! ```

#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use dalali_server::{
    api,
    auth::{Actor, JwtKeys, Role, TokenType},
    config::Config,
    models::BookingStatus,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tower::ServiceExt;
use tracing::{debug, info};
use uuid::Uuid;

// ============================================================================
// PostgreSQL Test Container
// ============================================================================

/// PostgreSQL test container wrapper
///
/// Provides a PostgreSQL container with migrations pre-applied, ready for testing.
pub struct TestPostgres {
    _container: ContainerAsync<Postgres>,
    pool: PgPool,
}

impl TestPostgres {
    /// Start a new PostgreSQL container with migrations applied
    pub async fn start() -> Result<Self> {
        Self::start_with_options(PostgresOptions::default()).await
    }

    pub async fn start_with_options(options: PostgresOptions) -> Result<Self> {
        info!("Starting PostgreSQL test container...");

        let container = Postgres::default()
            .with_tag(&options.version)
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?;
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .await
            .context("Failed to get container port")?;

        let connection_string =
            format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        debug!("PostgreSQL connection: {}", connection_string);

        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(Duration::from_secs(options.acquire_timeout_secs))
            .connect(&connection_string)
            .await
            .context("Failed to connect to PostgreSQL")?;

        dalali_server::db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("Migrations completed successfully");

        Ok(Self {
            _container: container,
            pool,
        })
    }

    /// Get a reference to the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a clone of the database pool
    pub fn pool_clone(&self) -> PgPool {
        self.pool.clone()
    }
}

/// Configuration options for PostgreSQL test container
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    /// PostgreSQL version/tag (default: "16-alpine")
    pub version: String,
    /// Maximum number of connections in the pool (default: 10)
    pub max_connections: u32,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: u64,
}

impl Default for PostgresOptions {
    fn default() -> Self {
        Self {
            version: "16-alpine".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

// ============================================================================
// Test Data Helpers
// ============================================================================

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Inserts rows directly, bypassing the API.
pub struct TestDataHelper<'a> {
    pool: &'a PgPool,
}

impl<'a> TestDataHelper<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, username: &str, role: Role) -> Result<Actor> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, role) \
             VALUES ($1, $2, 'not-a-real-hash', $3) RETURNING id",
        )
        .bind(username)
        .bind(format!("{}@dalali.test", username))
        .bind(role)
        .fetch_one(self.pool)
        .await
        .context("Failed to create user")?;
        Ok(Actor::new(id, role))
    }

    /// A house listed by `seller` at 500000.00 with the given daily rate.
    pub async fn create_property(&self, seller: &Actor, price_per_day: Option<&str>) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO properties (seller_id, title, price, price_per_day, location) \
             VALUES ($1, 'Two bedroom house', 500000.00, $2::numeric, 'Arusha') RETURNING id",
        )
        .bind(seller.user_id)
        .bind(price_per_day)
        .fetch_one(self.pool)
        .await
        .context("Failed to create property")?;
        Ok(id)
    }

    pub async fn insert_booking(
        &self,
        property_id: Uuid,
        requester: &Actor,
        start: NaiveDate,
        end: NaiveDate,
        status: BookingStatus,
    ) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO bookings (property_id, requester_id, start_date, end_date, status, total_price) \
             VALUES ($1, $2, $3, $4, $5, 0) RETURNING id",
        )
        .bind(property_id)
        .bind(requester.user_id)
        .bind(start)
        .bind(end)
        .bind(status)
        .fetch_one(self.pool)
        .await
        .context("Failed to insert booking")?;
        Ok(id)
    }

    pub async fn create_image(&self, property_id: Uuid, is_primary: bool) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO property_images (property_id, image_url, is_primary) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(property_id)
        .bind(format!("https://images.dalali.test/{}.jpg", Uuid::new_v4()))
        .bind(is_primary)
        .fetch_one(self.pool)
        .await
        .context("Failed to create image")?;
        Ok(id)
    }

    pub async fn primary_images(&self, property_id: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar("SELECT id FROM property_images WHERE property_id = $1 AND is_primary")
            .bind(property_id)
            .fetch_all(self.pool)
            .await
            .context("Failed to read primary images")
    }

    /// Make the next `count` row writes on `property_images` fail with
    /// SQLSTATE 40001. The counter is a sequence, so rolled-back attempts
    /// still consume it.
    pub async fn fail_image_writes(&self, count: u32) -> Result<()> {
        let statements = [
            "CREATE SEQUENCE IF NOT EXISTS image_write_attempts".to_string(),
            "SELECT setval('image_write_attempts', 1, false)".to_string(),
            format!(
                "CREATE OR REPLACE FUNCTION fail_image_writes() RETURNS trigger AS $$ \
                 BEGIN \
                     IF nextval('image_write_attempts') <= {} THEN \
                         RAISE EXCEPTION 'injected serialization failure' \
                             USING ERRCODE = 'serialization_failure'; \
                     END IF; \
                     RETURN COALESCE(NEW, OLD); \
                 END $$ LANGUAGE plpgsql",
                count
            ),
            "DROP TRIGGER IF EXISTS fail_image_writes ON property_images".to_string(),
            "CREATE TRIGGER fail_image_writes BEFORE INSERT OR UPDATE OR DELETE ON property_images \
             FOR EACH ROW EXECUTE FUNCTION fail_image_writes()"
                .to_string(),
        ];
        for statement in statements {
            sqlx::query(&statement)
                .execute(self.pool)
                .await
                .context("Failed to install image write failures")?;
        }
        Ok(())
    }

    pub async fn booking_status(&self, booking_id: Uuid) -> Result<BookingStatus> {
        sqlx::query_scalar("SELECT status FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_one(self.pool)
            .await
            .context("Failed to read booking status")
    }
}

// ============================================================================
// HTTP Test Application
// ============================================================================

/// The full router, driven in-process with `oneshot`.
pub struct TestApp {
    router: Router,
    keys: JwtKeys,
}

impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        let config = Config::default();
        let keys = JwtKeys::new(&config.auth);
        let router = api::create_router(pool, keys.clone(), &config);
        Self { router, keys }
    }

    /// Access token for `actor`.
    pub fn token(&self, actor: &Actor) -> String {
        self.keys
            .issue(actor.user_id, "test-user", actor.role, TokenType::Access)
            .expect("Failed to issue token")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, "dalali-tests");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

/// Initialize tracing for tests
///
/// Call this at the start of tests to see log output. Uses the `RUST_LOG`
/// environment variable for filtering.
pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,dalali_server=debug,sqlx=warn,testcontainers=info")
        }))
        .with_test_writer()
        .try_init();
}
