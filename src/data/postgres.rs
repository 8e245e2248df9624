use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::CreateUser;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::{PgPoolOptions, PgRow}};
use tracing::{debug, info, instrument};

const INSERT_USER: &str = "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id";

/// Owns the process-wide Postgres connection pool.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Opens the pool. At least one connection is established before returning, so an
    /// unreachable database surfaces here rather than on the first request.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!(max_connections, "Connected to the database");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Waits for checked-out connections to be returned, then closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}

/// `users.id` may be declared `integer`/`serial` or `bigint`/`bigserial`; sqlx decodes
/// each only into its exact width.
fn decode_id(row: &PgRow) -> Result<i64, sqlx::Error> {
    row.try_get::<i64, _>("id")
        .or_else(|_| row.try_get::<i32, _>("id").map(i64::from))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert_user(&self, user: &CreateUser) -> Result<i64> {
        let row = sqlx::query(INSERT_USER)
            .bind(&user.name)
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        let id = decode_id(&row).map_err(|e| DomainError::Storage(e.to_string()))?;
        debug!(user_id = id, "User row inserted");
        Ok(id)
    }
}
