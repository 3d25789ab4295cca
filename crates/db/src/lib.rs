use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

pub mod filter;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::MySqlPool;

/// Connection and pool settings for the item catalog database.
#[derive(Clone)]
pub struct PoolSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Upper bound on concurrently open connections.
    pub max_connections: u32,
    /// How long a request may wait in the pool queue for a connection.
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password);

        if self.database.is_empty() {
            options
        } else {
            options.database(&self.database)
        }
    }

    fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Create a connection pool and open the first connection eagerly.
pub async fn create_pool(settings: &PoolSettings) -> Result<DbPool, sqlx::Error> {
    settings
        .pool_options()
        .connect_with(settings.connect_options())
        .await
}

/// Create a pool that only connects when a query first needs a connection.
pub fn create_lazy_pool(settings: &PoolSettings) -> DbPool {
    settings
        .pool_options()
        .connect_lazy_with(settings.connect_options())
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
